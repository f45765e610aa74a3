//! Headless replay of UI interaction sequences.

use serde::{Deserialize, Serialize};
use shared::{GeoPoint, GeolocationState, RouteSelection};

use crate::{
    click::ClickOutcome,
    config::SessionConfig,
    error::{GeolocationError, GeolocationErrorKind, LocateError},
    geolocation::GeolocationPort,
    recording::{Call, CallLog, FixedGeolocation, RecordingEngine, RecordingMap},
    session::RouteSession,
    view::MapHandle,
};

const REPLAY_MAP: &str = "replay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Click { lat: f64, lon: f64 },
    SetStart { lat: String, lon: String },
    SetEnd { lat: String, lon: String },
    Reset,
    ShowMyLocation,
    /// The pending device location query answers at this point.
    GeolocationResolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedPosition {
    Located(GeoPoint),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Outcome of the device location query; none means the device has no
    /// geolocation support.
    #[serde(default)]
    pub geolocation: Option<ScriptedPosition>,
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub event: ScriptEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickOutcome>,
    /// Why a manual entry left the selection untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<String>,
    pub selection: RouteSelection,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub selection: RouteSelection,
    pub geolocation: GeolocationState,
    /// Messages the UI would have shown to the user.
    pub notices: Vec<String>,
    pub calls: Vec<Call>,
}

impl ScriptedPosition {
    fn into_result(self) -> Result<GeoPoint, GeolocationError> {
        match self {
            Self::Located(point) => Ok(point),
            Self::Failed(reason) => Err(GeolocationError::new(
                GeolocationErrorKind::PositionUnavailable,
                reason,
            )),
        }
    }
}

pub async fn replay(script: ReplayScript, config: &SessionConfig) -> ReplayReport {
    let log = CallLog::new();
    let map = RecordingMap::new(MapHandle::new(REPLAY_MAP), log.clone());
    let mut session = RouteSession::new(config, map, RecordingEngine::new(log.clone()));

    let port = FixedGeolocation(match script.geolocation {
        Some(position) => position.into_result(),
        None => Err(GeolocationError::new(
            GeolocationErrorKind::Unsupported,
            "geolocation is not supported on this device",
        )),
    });
    // The query goes out on page load and answers at `GeolocationResolved`.
    let in_flight = session.begin_geolocation();

    let mut steps = Vec::with_capacity(script.events.len());
    let mut notices = Vec::new();

    for event in script.events {
        let mut click = None;
        let mut ignored = None;
        match &event {
            ScriptEvent::Click { lat, lon } => {
                click = Some(session.map_clicked(GeoPoint::new(*lat, *lon)));
            }
            ScriptEvent::SetStart { lat, lon } => {
                ignored = session.submit_start(lat, lon).err().map(|err| err.to_string());
            }
            ScriptEvent::SetEnd { lat, lon } => {
                ignored = session.submit_end(lat, lon).err().map(|err| err.to_string());
            }
            ScriptEvent::Reset => session.reset(),
            ScriptEvent::ShowMyLocation => match session.show_my_location() {
                Ok(_) | Err(LocateError::Pending) => {}
                Err(err @ LocateError::Unavailable(_)) => notices.push(err.to_string()),
            },
            ScriptEvent::GeolocationResolved => {
                if in_flight && !session.geolocation().is_loaded() {
                    let result = port.current_position().await;
                    session.geolocation_resolved(result);
                }
            }
        }
        steps.push(StepReport {
            event,
            click,
            ignored,
            selection: session.selection(),
        });
    }

    ReplayReport {
        steps,
        selection: session.selection(),
        geolocation: session.geolocation().clone(),
        notices,
        calls: log.calls(),
    }
}
