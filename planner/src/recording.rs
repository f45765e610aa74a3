//! In-memory map, routing engine and geolocation adapters.
//!
//! They log what the planner asks of its collaborators instead of drawing
//! anything, which is what the replay binary and the integration tests need.

use std::{cell::RefCell, rc::Rc};

use serde::Serialize;
use shared::{FlyTo, GeoPoint};

use crate::{
    error::GeolocationError,
    geolocation::GeolocationPort,
    overlay::RoutingEngine,
    view::{MapHandle, MapSurface},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    FlyTo(FlyTo),
    LocationMarker { at: GeoPoint },
    RenderRoute { map: MapHandle, start: GeoPoint, end: GeoPoint },
    ClearRoute { map: MapHandle },
}

/// Ordered log shared by the recording adapters of one session.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        tracing::trace!(?call, "recorded");
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn renders(&self) -> Vec<(GeoPoint, GeoPoint)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::RenderRoute { start, end, .. } => Some((*start, *end)),
                _ => None,
            })
            .collect()
    }

    pub fn clears(&self) -> usize {
        self.count(|call| matches!(call, Call::ClearRoute { .. }))
    }

    pub fn flights(&self) -> Vec<FlyTo> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::FlyTo(command) => Some(*command),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|call| pred(call)).count()
    }
}

pub struct RecordingMap {
    handle: MapHandle,
    log: CallLog,
}

impl RecordingMap {
    pub fn new(handle: MapHandle, log: CallLog) -> Self {
        Self { handle, log }
    }
}

impl MapSurface for RecordingMap {
    fn handle(&self) -> MapHandle {
        self.handle.clone()
    }

    fn fly_to(&mut self, command: FlyTo) {
        self.log.push(Call::FlyTo(command));
    }

    fn place_location_marker(&mut self, at: GeoPoint) {
        self.log.push(Call::LocationMarker { at });
    }
}

pub struct RecordingEngine {
    log: CallLog,
}

impl RecordingEngine {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl RoutingEngine for RecordingEngine {
    fn render(&mut self, map: &MapHandle, start: GeoPoint, end: GeoPoint) {
        self.log.push(Call::RenderRoute {
            map: map.clone(),
            start,
            end,
        });
    }

    fn clear(&mut self, map: &MapHandle) {
        self.log.push(Call::ClearRoute { map: map.clone() });
    }
}

/// Geolocation port that answers with a canned result.
#[derive(Debug, Clone)]
pub struct FixedGeolocation(pub Result<GeoPoint, GeolocationError>);

impl GeolocationPort for FixedGeolocation {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        self.0.clone()
    }
}
