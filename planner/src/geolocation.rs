use std::future::Future;

use shared::{GeoPoint, GeolocationState};

use crate::error::GeolocationError;

/// Device position source.
///
/// Implementations resolve exactly once per call; the planner only ever calls
/// it once per session.
pub trait GeolocationPort {
    fn current_position(&self) -> impl Future<Output = Result<GeoPoint, GeolocationError>>;
}

/// Tracks the single geolocation request of a session.
#[derive(Debug, Default)]
pub struct GeolocationTracker {
    state: GeolocationState,
    requested: bool,
}

impl GeolocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GeolocationState {
        &self.state
    }

    /// Returns true the first time only; callers issue the query on true.
    pub fn begin_request(&mut self) -> bool {
        !std::mem::replace(&mut self.requested, true)
    }

    /// Records the query outcome. Returns false and keeps the existing state
    /// if a result was already recorded.
    pub fn resolve(&mut self, result: Result<GeoPoint, GeolocationError>) -> bool {
        if self.state.is_loaded() {
            tracing::debug!("ignoring late geolocation result: {result:?}");
            return false;
        }
        self.requested = true;
        self.state = match result {
            Ok(coordinates) => {
                tracing::info!(
                    "device located at lat={:.5} lon={:.5}",
                    coordinates.lat,
                    coordinates.lon
                );
                GeolocationState::Located { coordinates }
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind, "geolocation failed: {err}");
                GeolocationState::Failed {
                    error: err.to_string(),
                }
            }
        };
        true
    }
}
