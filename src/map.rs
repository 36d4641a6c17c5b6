//! Marker clustering and spiderfy engine.
//!
//! Observations are bucketed on a rounded coordinate grid, each bucket's members
//! get a deterministic ring layout around the centroid, and the renderer keeps
//! markers on a [`MarkerSurface`] in sync with the data, the zoom level and the
//! shared [`SelectionStore`].

use std::sync::Arc;

use crate::observations::Observation;

/// Expand/collapse state machine and easing.
pub mod animation;
/// Geographic and pixel coordinates plus the projector seam.
pub mod geo;
/// Coordinate-grid bucketing.
pub mod grid;
/// Highlight, pin and marker styling rules.
pub mod highlight;
/// Web Mercator projector.
pub mod projection;
/// Live cluster orchestration over a marker surface.
pub mod renderer;
/// Selection, display mode and the shared selection store.
pub mod selection;
/// Deterministic spread layout.
pub mod spread;

pub use animation::{AnimationController, ClusterMotion, MotionPhase, TickOutcome};
pub use geo::{GeoPoint, MapProjector, PixelOffset, PixelPoint};
pub use grid::{ClusterKey, GridBucket, GridClusterer};
pub use highlight::{GuideStyle, MarkerStyle, SelectionHighlighter};
pub use projection::WebMercator;
pub use renderer::{ClusterRenderer, GuideId, LiveCluster, MarkerId, MarkerSpec, MarkerSurface};
pub use selection::{DisplayMode, MarkerRole, Selection, SelectionStore};
pub use spread::SpreadLayoutEngine;

/// One grid cell's observations with their spread positions.
///
/// Always holds at least one member; members keep input order.
#[derive(Clone, Debug)]
pub struct ClusterDefinition {
    pub key: ClusterKey,
    /// Arithmetic mean of the raw member coordinates.
    pub center: GeoPoint,
    pub members: Vec<ClusterMember>,
}

impl ClusterDefinition {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether hovering can spread this cluster out.
    pub fn is_interactive(&self) -> bool {
        self.members.len() > 1
    }

    pub fn spread_positions(&self) -> Vec<GeoPoint> {
        self.members.iter().map(|member| member.spread).collect()
    }
}

#[derive(Clone, Debug)]
pub struct ClusterMember {
    pub observation: Arc<Observation>,
    /// Fully expanded position; equals the centroid for single-member clusters.
    pub spread: GeoPoint,
}
