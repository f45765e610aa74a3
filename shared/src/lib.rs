use serde::{Deserialize, Serialize};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Geodetic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when latitude is within ±90° and longitude within ±180°.
    pub fn in_bounds(self) -> bool {
        (-MAX_LATITUDE..=MAX_LATITUDE).contains(&self.lat)
            && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Start,
    End,
}

/// The pair of route endpoints currently chosen by the user.
///
/// Values are never edited in place: every update produces a new selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSelection {
    pub start: Option<GeoPoint>,
    pub end: Option<GeoPoint>,
}

impl RouteSelection {
    pub const fn empty() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub fn with_start(self, point: GeoPoint) -> Self {
        Self {
            start: Some(point),
            ..self
        }
    }

    pub fn with_end(self, point: GeoPoint) -> Self {
        Self {
            end: Some(point),
            ..self
        }
    }

    /// Both endpoints, only when the selection is ready for routing.
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.start.zip(self.end)
    }

    pub fn phase(&self) -> SelectionPhase {
        match (self.start.is_some(), self.end.is_some()) {
            (false, false) => SelectionPhase::Empty,
            (true, false) => SelectionPhase::StartSet,
            (false, true) => SelectionPhase::EndSet,
            (true, true) => SelectionPhase::BothSet,
        }
    }
}

/// Slot occupancy of a [`RouteSelection`].
///
/// Always derived from the selection, never stored next to it. `EndSet` can
/// only be reached through manual coordinate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    Empty,
    StartSet,
    EndSet,
    BothSet,
}

/// Outcome of the one-shot device location query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeolocationState {
    /// Not requested yet, or the request is still in flight.
    #[default]
    Pending,
    Located { coordinates: GeoPoint },
    Failed { error: String },
}

impl GeolocationState {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn coordinates(&self) -> Option<GeoPoint> {
        match self {
            Self::Located { coordinates } => Some(*coordinates),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewState {
    pub center: GeoPoint,
    pub zoom_level: u8,
}

/// Animated recentre command sent to the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlyTo {
    pub target: GeoPoint,
    pub zoom: u8,
    pub animate: bool,
}
