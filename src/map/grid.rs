use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::geo::{GeoPoint, MapProjector};
use super::spread::SpreadLayoutEngine;
use super::{ClusterDefinition, ClusterMember};
use crate::observations::Observation;
use crate::settings::{GridSettings, SettingsError};

/// Grid cell identity: both coordinates scaled by `10^precision` and rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterKey {
    lat_cell: i64,
    lng_cell: i64,
    precision: u32,
}

impl ClusterKey {
    pub fn from_point(point: GeoPoint, precision: u32) -> Self {
        let scale = 10_f64.powi(precision as i32);
        Self {
            lat_cell: (point.lat * scale).round() as i64,
            lng_cell: (point.lng * scale).round() as i64,
            precision,
        }
    }

    /// Stable byte encoding used to seed layout jitter.
    pub fn seed_bytes(&self) -> [u8; 20] {
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&self.lat_cell.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.lng_cell.to_le_bytes());
        bytes[16..].copy_from_slice(&self.precision.to_le_bytes());
        bytes
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.precision as usize;
        let scale = 10_f64.powi(self.precision as i32);
        write!(
            f,
            "{:.digits$},{:.digits$}",
            self.lat_cell as f64 / scale,
            self.lng_cell as f64 / scale
        )
    }
}

/// Observations that fell into one grid cell, before layout.
#[derive(Clone, Debug)]
pub struct GridBucket {
    pub key: ClusterKey,
    pub center: GeoPoint,
    pub observations: Vec<Arc<Observation>>,
}

/// Partitions geolocated observations into coordinate-grid buckets.
#[derive(Clone, Debug)]
pub struct GridClusterer {
    precision: u32,
}

impl GridClusterer {
    pub fn new(settings: GridSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            precision: settings.precision,
        })
    }

    /// Bucket observations by rounded coordinates.
    ///
    /// Buckets come out in first-seen order and keep their members in input
    /// order. Observations without a full coordinate pair are dropped.
    pub fn bucket(&self, observations: &[Arc<Observation>]) -> Vec<GridBucket> {
        let mut index_by_key: HashMap<ClusterKey, usize> = HashMap::new();
        let mut buckets: Vec<(ClusterKey, Vec<Arc<Observation>>, f64, f64)> = Vec::new();
        for observation in observations {
            let Some(point) = observation.coordinates() else {
                continue;
            };
            let key = ClusterKey::from_point(point, self.precision);
            let slot = *index_by_key.entry(key).or_insert_with(|| {
                buckets.push((key, Vec::new(), 0.0, 0.0));
                buckets.len() - 1
            });
            let entry = &mut buckets[slot];
            entry.1.push(Arc::clone(observation));
            entry.2 += point.lat;
            entry.3 += point.lng;
        }
        buckets
            .into_iter()
            .map(|(key, members, sum_lat, sum_lng)| {
                let count = members.len() as f64;
                GridBucket {
                    key,
                    center: GeoPoint::new(sum_lat / count, sum_lng / count),
                    observations: members,
                }
            })
            .collect()
    }

    /// Bucket observations and lay out each bucket's members around its centroid.
    pub fn build_clusters(
        &self,
        observations: &[Arc<Observation>],
        projector: &impl MapProjector,
        spread: &SpreadLayoutEngine,
    ) -> Vec<ClusterDefinition> {
        self.bucket(observations)
            .into_iter()
            .map(|bucket| {
                let positions =
                    spread.layout(&bucket.key, bucket.center, &bucket.observations, projector);
                let members = bucket
                    .observations
                    .into_iter()
                    .zip(positions)
                    .map(|(observation, spread)| ClusterMember {
                        observation,
                        spread,
                    })
                    .collect();
                ClusterDefinition {
                    key: bucket.key,
                    center: bucket.center,
                    members,
                }
            })
            .collect()
    }
}
