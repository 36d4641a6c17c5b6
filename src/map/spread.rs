//! Deterministic ring layout for the members of a spread cluster.
//!
//! Offsets are a pure function of the cluster key, the ordered member list and
//! the zoom level. Randomness comes from ChaCha8 streams seeded with blake3
//! digests of that content. Both algorithms are fixed, so the same inputs give
//! bit-identical draws in every process and on every platform.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::geo::{GeoPoint, MapProjector, PixelOffset};
use super::grid::ClusterKey;
use crate::observations::Observation;
use crate::settings::{SettingsError, SpreadSettings};

const CLUSTER_SEED_DOMAIN: &[u8] = b"parasite_atlas.spread.cluster";
const MEMBER_SEED_DOMAIN: &[u8] = b"parasite_atlas.spread.member";

/// Ring slot assigned to a member index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingSlot {
    pub ring: usize,
    pub position: usize,
    /// Members sharing this ring (the last ring holds the remainder).
    pub ring_count: usize,
}

/// Seeded random perturbation of one member's slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberJitter {
    /// Radians added to the slot angle.
    pub angle: f64,
    /// Fraction added to the ring radius.
    pub radial: f64,
}

/// Computes spread offsets and positions for cluster members.
#[derive(Clone, Debug)]
pub struct SpreadLayoutEngine {
    settings: SpreadSettings,
}

impl SpreadLayoutEngine {
    pub fn new(settings: SpreadSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &SpreadSettings {
        &self.settings
    }

    /// Ring and in-ring position for member `index` of a cluster with `count` members.
    pub fn ring_slot(&self, index: usize, count: usize) -> RingSlot {
        let capacity = self.settings.ring_capacity;
        let ring = index / capacity;
        let ring_start = ring * capacity;
        RingSlot {
            ring,
            position: index - ring_start,
            ring_count: (count - ring_start).min(capacity),
        }
    }

    /// Unjittered radius of `ring` at `zoom`.
    ///
    /// The base radius is scaled linearly with zoom and clamped to the pixel
    /// range before the per-ring multiplier, so outer rings always sit further out.
    pub fn ring_radius(&self, ring: usize, zoom: f64) -> f64 {
        let s = &self.settings;
        let scaled = s.base_radius_px * (zoom / s.reference_zoom);
        let clamped = scaled.clamp(s.min_radius_px, s.max_radius_px);
        clamped * (ring + 1) as f64
    }

    /// Pixel offsets from the centroid for each member, in member order.
    pub fn pixel_offsets(
        &self,
        key: &ClusterKey,
        members: &[impl AsRef<Observation>],
        zoom: f64,
    ) -> Vec<PixelOffset> {
        let count = members.len();
        if count <= 1 {
            return vec![PixelOffset::ZERO; count];
        }
        let rotation = self.rotation(key);
        members
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let slot = self.ring_slot(index, count);
                let jitter = self.member_jitter(key, member.as_ref(), index);
                let angle = rotation
                    + TAU * slot.position as f64 / slot.ring_count as f64
                    + jitter.angle;
                let radius = self.ring_radius(slot.ring, zoom) * (1.0 + jitter.radial);
                PixelOffset::from_polar(radius, angle)
            })
            .collect()
    }

    /// Geographic spread position for each member.
    ///
    /// Single-member clusters stay exactly on the centroid.
    pub fn layout(
        &self,
        key: &ClusterKey,
        center: GeoPoint,
        members: &[impl AsRef<Observation>],
        projector: &impl MapProjector,
    ) -> Vec<GeoPoint> {
        if members.len() <= 1 {
            return vec![center; members.len()];
        }
        let origin = projector.project(center);
        self.pixel_offsets(key, members, projector.zoom())
            .into_iter()
            .map(|offset| projector.unproject(origin.offset(offset)))
            .collect()
    }

    /// Angle of the first slot, shared by every ring of the cluster.
    pub fn rotation(&self, key: &ClusterKey) -> f64 {
        TAU * cluster_rng(key).random::<f64>()
    }

    /// Jitter for member `index`, drawn from a stream keyed on the cluster and the member.
    pub fn member_jitter(
        &self,
        key: &ClusterKey,
        member: &Observation,
        index: usize,
    ) -> MemberJitter {
        let mut rng = member_rng(key, member, index);
        MemberJitter {
            angle: symmetric(rng.random(), self.settings.angle_jitter_rad),
            radial: symmetric(rng.random(), self.settings.radial_jitter),
        }
    }
}

/// Map a unit draw in `[0, 1)` onto `[-limit, limit)`.
fn symmetric(unit: f64, limit: f64) -> f64 {
    limit * (2.0 * unit - 1.0)
}

fn cluster_rng(key: &ClusterKey) -> ChaCha8Rng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CLUSTER_SEED_DOMAIN);
    hasher.update(&key.seed_bytes());
    ChaCha8Rng::from_seed(*hasher.finalize().as_bytes())
}

fn member_rng(key: &ClusterKey, member: &Observation, index: usize) -> ChaCha8Rng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(MEMBER_SEED_DOMAIN);
    hasher.update(&key.seed_bytes());
    for part in [&member.parasite_species, &member.host_species] {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hasher.update(&(index as u64).to_le_bytes());
    ChaCha8Rng::from_seed(*hasher.finalize().as_bytes())
}
