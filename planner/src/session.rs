use shared::{FlyTo, GeoPoint, GeolocationState, RouteSelection, SelectionPhase, Slot};

use crate::{
    click::{ClickOutcome, MapClickReconciler},
    config::SessionConfig,
    error::{CoordinateError, GeolocationError, LocateError},
    geolocation::{GeolocationPort, GeolocationTracker},
    manual::ManualEntryReconciler,
    overlay::{RouteOverlayBridge, RoutingEngine},
    parser::CoordinateParser,
    store::RouteEndpointStore,
    view::{MapSurface, ViewController},
};

/// One interactive map page: endpoint selection, overlay and "locate me".
///
/// Every UI event goes through `&mut self`, so handlers never interleave.
pub struct RouteSession<M> {
    store: RouteEndpointStore,
    clicks: MapClickReconciler,
    manual: ManualEntryReconciler,
    view: ViewController<M>,
    geolocation: GeolocationTracker,
}

impl<M: MapSurface> RouteSession<M> {
    pub fn new(config: &SessionConfig, map: M, engine: impl RoutingEngine + 'static) -> Self {
        let parser = if config.validate_bounds {
            CoordinateParser::bounded()
        } else {
            CoordinateParser::permissive()
        };

        let mut store = RouteEndpointStore::new();
        store.subscribe(RouteOverlayBridge::new(engine, map.handle()));

        Self {
            store,
            clicks: MapClickReconciler::new(config.third_click),
            manual: ManualEntryReconciler::new(parser),
            view: ViewController::new(map, config.locate_zoom, config.animate),
            geolocation: GeolocationTracker::new(),
        }
    }

    pub fn selection(&self) -> RouteSelection {
        self.store.selection()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.store.selection().phase()
    }

    pub fn map_clicked(&mut self, point: GeoPoint) -> ClickOutcome {
        self.clicks.handle_click(&mut self.store, point)
    }

    pub fn submit_start(&mut self, lat: &str, lon: &str) -> Result<GeoPoint, CoordinateError> {
        self.manual.submit(&mut self.store, Slot::Start, lat, lon)
    }

    pub fn submit_end(&mut self, lat: &str, lon: &str) -> Result<GeoPoint, CoordinateError> {
        self.manual.submit(&mut self.store, Slot::End, lat, lon)
    }

    pub fn reset(&mut self) {
        tracing::info!("route reset");
        self.store.reset();
    }

    /// True when the caller should start the (single) position query now.
    pub fn begin_geolocation(&mut self) -> bool {
        self.geolocation.begin_request()
    }

    pub fn geolocation_resolved(&mut self, result: Result<GeoPoint, GeolocationError>) {
        if self.geolocation.resolve(result) {
            if let Some(at) = self.geolocation.state().coordinates() {
                self.view.mark_location(at);
            }
        }
    }

    /// Runs the whole query against `port` if it has not been issued yet.
    pub async fn locate<P: GeolocationPort>(&mut self, port: &P) {
        if self.begin_geolocation() {
            let result = port.current_position().await;
            self.geolocation_resolved(result);
        }
    }

    pub fn geolocation(&self) -> &GeolocationState {
        self.geolocation.state()
    }

    /// Flies to the device location, or reports why it cannot.
    ///
    /// [`LocateError::Unavailable`] carries the raw failure reason for the UI
    /// to show; [`LocateError::Pending`] means the query has not resolved yet
    /// and nothing happened.
    pub fn show_my_location(&mut self) -> Result<FlyTo, LocateError> {
        match self.geolocation.state() {
            GeolocationState::Located { coordinates } => {
                let target = *coordinates;
                Ok(self.view.fly_to(target))
            }
            GeolocationState::Failed { error } => Err(LocateError::Unavailable(error.clone())),
            GeolocationState::Pending => {
                tracing::debug!("show my location requested before geolocation resolved");
                Err(LocateError::Pending)
            }
        }
    }
}
