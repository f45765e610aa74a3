use serde::{Deserialize, Serialize};
use shared::{FlyTo, GeoPoint};

/// Opaque identity of a live map surface, used to anchor route overlays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapHandle(pub String);

impl MapHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The rendered map, as seen by the planner.
///
/// Tiles, panning and zooming stay inside the map library; the planner only
/// recentres it and pins the device location.
pub trait MapSurface {
    fn handle(&self) -> MapHandle;
    fn fly_to(&mut self, command: FlyTo);
    fn place_location_marker(&mut self, at: GeoPoint);
}

/// Sole writer of the map surface.
pub struct ViewController<M> {
    map: M,
    zoom: u8,
    animate: bool,
}

impl<M: MapSurface> ViewController<M> {
    pub fn new(map: M, zoom: u8, animate: bool) -> Self {
        Self { map, zoom, animate }
    }

    pub fn fly_to(&mut self, target: GeoPoint) -> FlyTo {
        let command = FlyTo {
            target,
            zoom: self.zoom,
            animate: self.animate,
        };
        tracing::debug!(?command, "flying map view");
        self.map.fly_to(command);
        command
    }

    pub fn mark_location(&mut self, at: GeoPoint) {
        self.map.place_location_marker(at);
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}
