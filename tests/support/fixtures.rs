use parasite_atlas::observations::{DocumentId, Observation};

pub fn observation(parasite: &str, host: &str, lat: f64, lng: f64) -> Observation {
    Observation {
        document_id: DocumentId(1),
        parasite_species: parasite.to_string(),
        host_species: host.to_string(),
        country: "France".to_string(),
        latitude: Some(lat),
        longitude: Some(lng),
        ..Observation::default()
    }
}

pub fn in_document(mut observation: Observation, document: u64) -> Observation {
    observation.document_id = DocumentId(document);
    observation
}

/// Four observations sharing one grid cell at precision 3, each with its own parasite.
pub fn oyster_bed() -> Vec<Observation> {
    vec![
        observation("Bonamia ostreae", "Ostrea edulis", 44.6601, -1.1701),
        observation("Marteilia refringens", "Ostrea edulis", 44.6602, -1.1702),
        observation("Perkinsus olseni", "Ruditapes decussatus", 44.6603, -1.1699),
        observation("Mikrocytos mackini", "Crassostrea gigas", 44.6599, -1.1698),
    ]
}

/// Deterministic scatter of `count` observations over `cells` distinct cells.
pub fn scatter(count: usize, cells: usize) -> Vec<Observation> {
    (0..count)
        .map(|i| {
            let cell = i % cells;
            let lat = 30.0 + (cell / 50) as f64 * 0.05 + (i % 7) as f64 * 0.00004;
            let lng = -10.0 + (cell % 50) as f64 * 0.05 + (i % 5) as f64 * 0.00004;
            observation(&format!("Parasite {}", i % 23), &format!("Host {}", i % 11), lat, lng)
        })
        .collect()
}
