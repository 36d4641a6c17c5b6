//! Typed records produced by the findings pipeline and a tolerant JSONL reader.
//!
//! Each line of `post_process_findings.jsonl` is one geocoded observation; each
//! line of `documents.jsonl` describes the paper the observations came from.

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use thiserror::Error;

use crate::map::GeoPoint;

/// Identifier of the document an observation was extracted from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parasite recorded on a host at a (possibly geocoded) place.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub document_id: DocumentId,
    #[serde(default)]
    pub parasite_species: String,
    #[serde(default)]
    pub host_species: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, rename = "confidence_score", deserialize_with = "label_or_number")]
    pub confidence: String,
}

impl Observation {
    /// Map position, present only when both coordinates are valid degrees.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) =>
            {
                Some(GeoPoint::new(lat, lng))
            }
            _ => None,
        }
    }

    /// Short multi-line description used for marker tooltips.
    pub fn tooltip(&self) -> String {
        let mut text = format!(
            "{}\non {}",
            display_or_unknown(&self.parasite_species),
            display_or_unknown(&self.host_species)
        );
        let place = match (self.area.trim(), self.country.trim()) {
            ("", "") => String::new(),
            ("", country) => country.to_string(),
            (area, "") => area.to_string(),
            (area, country) => format!("{area}, {country}"),
        };
        if !place.is_empty() {
            text.push('\n');
            text.push_str(&place);
        }
        if !self.confidence.trim().is_empty() {
            text.push_str(&format!("\nconfidence: {}", self.confidence.trim()));
        }
        text
    }
}

/// Source paper metadata.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub reference_paper: String,
}

/// Errors raised while reading JSONL inputs.
#[derive(Debug, Error)]
pub enum ObservationError {
    /// The input file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Reading a line failed part way through the file.
    #[error("Failed to read line {line} of {source_name}: {source}")]
    Read {
        source_name: String,
        line: usize,
        source: std::io::Error,
    },
}

/// Load geocoded observations, skipping lines that do not parse.
pub fn load_jsonl(path: &Path) -> Result<Vec<Observation>, ObservationError> {
    let reader = open_reader(path)?;
    parse_jsonl(reader, &path.display().to_string())
}

/// Load document records, skipping lines that do not parse.
pub fn load_documents_jsonl(path: &Path) -> Result<Vec<Document>, ObservationError> {
    let reader = open_reader(path)?;
    parse_jsonl(reader, &path.display().to_string())
}

/// Parse one JSON value per line from any reader.
///
/// Blank lines are ignored and malformed lines are logged and dropped; only
/// I/O failures abort the read.
pub fn parse_jsonl<T, R>(reader: R, source_name: &str) -> Result<Vec<T>, ObservationError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ObservationError::Read {
            source_name: source_name.to_string(),
            line: index + 1,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(trimmed) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                tracing::warn!("Skipping line {} of {source_name}: {err}", index + 1);
            }
        }
    }
    tracing::info!(
        "Loaded {} record(s) from {source_name} ({skipped} skipped)",
        records.len()
    );
    Ok(records)
}

fn open_reader(path: &Path) -> Result<BufReader<File>, ObservationError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ObservationError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn display_or_unknown(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() { "unknown" } else { trimmed }
}

/// The pipeline writes confidence as a label, but older runs emitted numbers.
fn label_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text,
        Some(Raw::Number(value)) => value.to_string(),
        None => String::new(),
    })
}
