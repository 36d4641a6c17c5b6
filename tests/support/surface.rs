use std::collections::BTreeMap;

use parasite_atlas::map::{GeoPoint, GuideId, GuideStyle, MarkerId, MarkerSpec, MarkerSurface};

/// Surface call, in the order the renderer made it.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    AddMarker(MarkerId),
    MoveMarker(MarkerId, GeoPoint),
    RemoveMarker(MarkerId),
    AddGuide(GuideId),
    RemoveGuide(GuideId),
}

/// In-memory surface that panics when asked to touch a marker or guide it does not hold.
///
/// Ids are never reused, so any call naming a removed id is a stale update.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    pub markers: BTreeMap<MarkerId, MarkerSpec>,
    pub guides: BTreeMap<GuideId, (GeoPoint, GeoPoint)>,
    pub events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn position(&self, id: MarkerId) -> GeoPoint {
        self.markers
            .get(&id)
            .unwrap_or_else(|| panic!("no live marker {id:?}"))
            .position
    }

    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn moves(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SurfaceEvent::MoveMarker(..)))
            .count()
    }
}

impl MarkerSurface for RecordingSurface {
    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.markers.insert(id, spec);
        self.events.push(SurfaceEvent::AddMarker(id));
        id
    }

    fn move_marker(&mut self, id: MarkerId, position: GeoPoint) {
        let spec = self
            .markers
            .get_mut(&id)
            .unwrap_or_else(|| panic!("stale move of marker {id:?}"));
        spec.position = position;
        self.events.push(SurfaceEvent::MoveMarker(id, position));
    }

    fn remove_marker(&mut self, id: MarkerId) {
        assert!(
            self.markers.remove(&id).is_some(),
            "stale removal of marker {id:?}"
        );
        self.events.push(SurfaceEvent::RemoveMarker(id));
    }

    fn add_guide(&mut self, from: GeoPoint, to: GeoPoint, _style: GuideStyle) -> GuideId {
        self.next_id += 1;
        let id = GuideId(self.next_id);
        self.guides.insert(id, (from, to));
        self.events.push(SurfaceEvent::AddGuide(id));
        id
    }

    fn remove_guide(&mut self, id: GuideId) {
        assert!(
            self.guides.remove(&id).is_some(),
            "stale removal of guide {id:?}"
        );
        self.events.push(SurfaceEvent::RemoveGuide(id));
    }
}
