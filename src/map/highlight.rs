use egui::{Color32, Stroke};

use super::ClusterDefinition;
use super::selection::{MarkerRole, Selection};
use crate::colors::{species_color, with_opacity};
use crate::observations::Observation;
use crate::settings::{MarkerSettings, MarkerTier};

/// Visual parameters for one point marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill: Color32,
    pub stroke: Stroke,
}

/// Visual parameters for a centroid-to-member guide line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideStyle {
    pub stroke: Stroke,
}

/// Highlight, pin and styling decisions derived from the current selection.
#[derive(Clone, Debug)]
pub struct SelectionHighlighter {
    markers: MarkerSettings,
}

impl SelectionHighlighter {
    pub fn new(markers: MarkerSettings) -> Self {
        Self { markers }
    }

    /// Whether an observation is drawn at full weight.
    ///
    /// Without a selection everything is highlighted.
    pub fn is_highlighted(&self, observation: &Observation, selection: &Selection) -> bool {
        match selection {
            Selection::None => true,
            Selection::Parasite(species) => same_species(&observation.parasite_species, species),
            Selection::Host(species) => same_species(&observation.host_species, species),
            Selection::Document(id) => observation.document_id == *id,
        }
    }

    /// A multi-member cluster with a highlighted member under an active selection stays open.
    pub fn is_pinned(&self, cluster: &ClusterDefinition, selection: &Selection) -> bool {
        selection.is_active()
            && cluster.members.len() > 1
            && cluster
                .members
                .iter()
                .any(|member| self.is_highlighted(&member.observation, selection))
    }

    pub fn marker_style(
        &self,
        observation: &Observation,
        role: MarkerRole,
        selection: &Selection,
    ) -> MarkerStyle {
        let tier = self.tier(self.is_highlighted(observation, selection));
        let (species, extra) = match role {
            MarkerRole::Parasite => (&observation.parasite_species, 0.0),
            MarkerRole::Host => (&observation.host_species, self.markers.host_radius_extra),
        };
        let base = species_color(species);
        MarkerStyle {
            radius: tier.radius + extra,
            fill: with_opacity(base, tier.fill_opacity),
            stroke: Stroke::new(
                tier.stroke_width,
                with_opacity(Color32::WHITE, tier.stroke_opacity),
            ),
        }
    }

    pub fn guide_style(&self) -> GuideStyle {
        GuideStyle {
            stroke: Stroke::new(
                self.markers.guide_width,
                with_opacity(Color32::LIGHT_GRAY, self.markers.guide_opacity),
            ),
        }
    }

    fn tier(&self, highlighted: bool) -> &MarkerTier {
        if highlighted {
            &self.markers.highlighted
        } else {
            &self.markers.dimmed
        }
    }
}

fn same_species(candidate: &str, selected: &str) -> bool {
    candidate.trim().to_lowercase() == selected.trim().to_lowercase()
}
