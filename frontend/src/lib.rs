use planner::{
    GeolocationError, GeolocationErrorKind, LocateError, RouteSession, SessionConfig,
    geolocation::GeolocationPort,
    overlay::RoutingEngine,
    view::{MapHandle, MapSurface},
};
use seed::{prelude::*, *};
use serde::Deserialize;
use serde_wasm_bindgen::to_value;
use shared::{FlyTo, GeoPoint, RouteSelection};
use wasm_bindgen::{
    JsCast,
    prelude::{JsValue, wasm_bindgen},
};

// Provided by the host page, wrapping the map library and its routing plugin.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = routeMap, js_name = initMap)]
    fn init_map(container: &str, view: JsValue);
    #[wasm_bindgen(js_namespace = routeMap, js_name = flyTo)]
    fn fly_to_js(container: &str, command: JsValue);
    #[wasm_bindgen(js_namespace = routeMap, js_name = showLocationMarker)]
    fn show_location_marker(container: &str, at: JsValue);
    #[wasm_bindgen(js_namespace = routeMap, js_name = renderRoute)]
    fn render_route_js(container: &str, start: JsValue, end: JsValue);
    #[wasm_bindgen(js_namespace = routeMap, js_name = clearRoute)]
    fn clear_route_js(container: &str);
    #[wasm_bindgen(js_namespace = routeMap, js_name = currentPosition, catch)]
    async fn current_position_js() -> Result<JsValue, JsValue>;
}

fn map_container() -> &'static str {
    option_env!("FRONTEND_MAP_CONTAINER").unwrap_or("map")
}

struct BrowserMap {
    container: &'static str,
}

impl MapSurface for BrowserMap {
    fn handle(&self) -> MapHandle {
        MapHandle::new(self.container)
    }

    fn fly_to(&mut self, command: FlyTo) {
        match to_value(&command) {
            Ok(value) => fly_to_js(self.container, value),
            Err(err) => log_error(&format!("[frontend] flyTo payload: {err}")),
        }
    }

    fn place_location_marker(&mut self, at: GeoPoint) {
        match to_value(&at) {
            Ok(value) => show_location_marker(self.container, value),
            Err(err) => log_error(&format!("[frontend] marker payload: {err}")),
        }
    }
}

struct BrowserRouting;

impl RoutingEngine for BrowserRouting {
    fn render(&mut self, map: &MapHandle, start: GeoPoint, end: GeoPoint) {
        web_sys::console::debug_1(
            &format!(
                "[frontend] route start=({:.5},{:.5}) end=({:.5},{:.5})",
                start.lat, start.lon, end.lat, end.lon
            )
            .into(),
        );
        match (to_value(&start), to_value(&end)) {
            (Ok(start_js), Ok(end_js)) => render_route_js(map.as_str(), start_js, end_js),
            (Err(err), _) | (_, Err(err)) => {
                log_error(&format!("[frontend] route payload: {err}"));
            }
        }
    }

    fn clear(&mut self, map: &MapHandle) {
        clear_route_js(map.as_str());
    }
}

struct BrowserGeolocation;

impl GeolocationPort for BrowserGeolocation {
    async fn current_position(&self) -> Result<GeoPoint, GeolocationError> {
        match current_position_js().await {
            Ok(value) => serde_wasm_bindgen::from_value(value).map_err(|err| {
                GeolocationError::new(GeolocationErrorKind::PositionUnavailable, err.to_string())
            }),
            Err(reason) => Err(position_error(reason)),
        }
    }
}

/// Shape of a rejected `currentPosition()` promise when it is not a string.
#[derive(Deserialize)]
struct PositionFailure {
    #[serde(default)]
    code: u16,
    message: String,
}

fn position_error(reason: JsValue) -> GeolocationError {
    if let Some(message) = reason.as_string() {
        return GeolocationError::new(GeolocationErrorKind::PositionUnavailable, message);
    }
    match serde_wasm_bindgen::from_value::<PositionFailure>(reason) {
        Ok(failure) => GeolocationError::new(kind_from_code(failure.code), failure.message),
        Err(_) => GeolocationError::new(
            GeolocationErrorKind::PositionUnavailable,
            "unknown geolocation error",
        ),
    }
}

// Codes of the W3C GeolocationPositionError interface.
fn kind_from_code(code: u16) -> GeolocationErrorKind {
    match code {
        1 => GeolocationErrorKind::PermissionDenied,
        3 => GeolocationErrorKind::Timeout,
        _ => GeolocationErrorKind::PositionUnavailable,
    }
}

pub struct Model {
    session: RouteSession<BrowserMap>,
    form: EndpointForm,
    notice: Option<String>,
}

#[derive(Default, Clone)]
struct EndpointForm {
    start_lat: String,
    start_lon: String,
    end_lat: String,
    end_lon: String,
}

pub enum Msg {
    StartLatChanged(String),
    StartLonChanged(String),
    EndLatChanged(String),
    EndLonChanged(String),
    SetStart,
    SetEnd,
    ShowMyLocation,
    ResetRoute,
    DismissNotice,
    MapClicked { lat: f64, lon: f64 },
    Located(Result<GeoPoint, GeolocationError>),
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), map_click_msg));

    let config = SessionConfig::default();
    let map = BrowserMap {
        container: map_container(),
    };
    let mut session = RouteSession::new(&config, map, BrowserRouting);

    if session.begin_geolocation() {
        orders.perform_cmd(async { Msg::Located(BrowserGeolocation.current_position().await) });
    }

    Model {
        session,
        form: EndpointForm::default(),
        notice: None,
    }
}

pub fn update(msg: Msg, model: &mut Model, _: &mut impl Orders<Msg>) {
    match msg {
        Msg::StartLatChanged(val) => model.form.start_lat = val,
        Msg::StartLonChanged(val) => model.form.start_lon = val,
        Msg::EndLatChanged(val) => model.form.end_lat = val,
        Msg::EndLonChanged(val) => model.form.end_lon = val,
        // Incomplete or invalid entries are dropped without telling the user.
        Msg::SetStart => {
            if let Err(err) = model
                .session
                .submit_start(&model.form.start_lat, &model.form.start_lon)
            {
                web_sys::console::debug_1(&format!("[frontend] start ignored: {err}").into());
            }
        }
        Msg::SetEnd => {
            if let Err(err) = model
                .session
                .submit_end(&model.form.end_lat, &model.form.end_lon)
            {
                web_sys::console::debug_1(&format!("[frontend] end ignored: {err}").into());
            }
        }
        Msg::ShowMyLocation => {
            let failure = model.session.show_my_location().err();
            if let Some(notice) = failure.as_ref().and_then(locate_notice) {
                model.notice = Some(notice);
            }
        }
        Msg::ResetRoute => model.session.reset(),
        Msg::DismissNotice => model.notice = None,
        Msg::MapClicked { lat, lon } => {
            let outcome = model.session.map_clicked(GeoPoint { lat, lon });
            web_sys::console::debug_1(&format!("[frontend] MapClicked -> {outcome:?}").into());
        }
        Msg::Located(result) => model.session.geolocation_resolved(result),
    }
}

/// Message shown to the user for a failed "Show My Location".
fn locate_notice(err: &LocateError) -> Option<String> {
    match err {
        LocateError::Pending => None,
        LocateError::Unavailable(reason) => Some(reason.clone()),
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    let header = h1!["Route Planner"];
    let help = p![
        C!["help"],
        "Click on any two points on the map or input their latitude and longitude to set a route. ",
        "You can clear the route with ",
        strong!["Reset the Route"],
        "."
    ];

    div![
        C!["app-container"],
        header,
        help,
        view_form(model),
        view_selection(&model.session.selection()),
        view_actions(),
        view_notice(model.notice.as_deref()),
    ]
}

fn view_form(model: &Model) -> Node<Msg> {
    let submit = |label: &str, msg: fn() -> Msg| {
        button![
            label,
            ev(Ev::Click, move |event| {
                event.prevent_default();
                msg()
            }),
        ]
    };

    form![
        C!["controls"],
        div![
            C!["endpoint-row"],
            coordinate_input("Start Latitude", &model.form.start_lat, Msg::StartLatChanged),
            coordinate_input("Start Longitude", &model.form.start_lon, Msg::StartLonChanged),
            submit("Set Start", || Msg::SetStart),
        ],
        div![
            C!["endpoint-row"],
            coordinate_input("End Latitude", &model.form.end_lat, Msg::EndLatChanged),
            coordinate_input("End Longitude", &model.form.end_lon, Msg::EndLonChanged),
            submit("Set End", || Msg::SetEnd),
        ],
    ]
}

fn coordinate_input(placeholder: &str, value: &str, msg: fn(String) -> Msg) -> Node<Msg> {
    input![
        attrs! {
            At::Type => "number",
            At::Step => "any",
            At::Placeholder => placeholder,
            At::Value => value,
            At::AutoComplete => "off",
            At::SpellCheck => "false",
        },
        input_ev(Ev::Input, msg),
    ]
}

fn view_selection(selection: &RouteSelection) -> Node<Msg> {
    let card = |label: &str, point: Option<GeoPoint>| {
        div![
            C!["metadata-card"],
            span![C!["label"], label],
            strong![describe_point(point)],
        ]
    };

    div![
        C!["metadata-grid"],
        card("Start", selection.start),
        card("End", selection.end),
    ]
}

fn view_actions() -> Node<Msg> {
    div![
        C!["actions"],
        button![
            "Show My Location",
            ev(Ev::Click, |_| Msg::ShowMyLocation),
            C!["locate-btn"],
        ],
        button![
            "Reset the Route",
            ev(Ev::Click, |_| Msg::ResetRoute),
            C!["reset-btn"],
        ],
    ]
}

fn view_notice(notice: Option<&str>) -> Node<Msg> {
    match notice {
        Some(message) => div![
            C!["error"],
            p![message],
            button!["OK", ev(Ev::Click, |_| Msg::DismissNotice)],
        ],
        None => empty![],
    }
}

fn describe_point(point: Option<GeoPoint>) -> String {
    point
        .map(|p| format!("{:.5} / {:.5}", p.lat, p.lon))
        .unwrap_or_else(|| "not set".to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    let config = SessionConfig::default();
    match to_value(&config.initial_view) {
        Ok(view) => init_map(map_container(), view),
        Err(err) => log_error(&format!("[frontend] initial view payload: {err}")),
    }
    App::start("app", init, update, view);
}

fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

/// Map clicks arrive as a `map-click` CustomEvent whose detail is `{lat, lon}`.
/// Anything else is logged and dropped.
fn map_click_msg(event: web_sys::Event) -> Option<Msg> {
    let Ok(event) = event.dyn_into::<web_sys::CustomEvent>() else {
        log_error("[frontend] map-click is not a CustomEvent");
        return None;
    };
    let point = match serde_wasm_bindgen::from_value::<MapClickPayload>(event.detail()) {
        Ok(payload) => payload.point(),
        Err(err) => {
            log_error(&format!("[frontend] map-click detail: {err}"));
            return None;
        }
    };
    let Some(point) = point else {
        log_error("[frontend] map-click detail without finite lat/lon");
        return None;
    };
    web_sys::console::debug_1(
        &format!(
            "[frontend] map click lat={:.5} lon={:.5}",
            point.lat, point.lon
        )
        .into(),
    );
    Some(Msg::MapClicked {
        lat: point.lat,
        lon: point.lon,
    })
}

#[derive(Debug, Default, Deserialize)]
struct MapClickPayload {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl MapClickPayload {
    fn point(&self) -> Option<GeoPoint> {
        let (lat, lon) = (self.lat?, self.lon?);
        (lat.is_finite() && lon.is_finite()).then_some(GeoPoint { lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_location_shows_nothing() {
        assert_eq!(locate_notice(&LocateError::Pending), None);
    }

    #[test]
    fn test_failed_location_shows_raw_reason() {
        let err = LocateError::Unavailable("permission denied".into());
        assert_eq!(locate_notice(&err), Some("permission denied".to_string()));
    }

    #[test]
    fn test_position_error_codes() {
        assert_eq!(kind_from_code(1), GeolocationErrorKind::PermissionDenied);
        assert_eq!(kind_from_code(2), GeolocationErrorKind::PositionUnavailable);
        assert_eq!(kind_from_code(3), GeolocationErrorKind::Timeout);
        assert_eq!(kind_from_code(0), GeolocationErrorKind::PositionUnavailable);
    }

    #[test]
    fn test_describe_point() {
        assert_eq!(describe_point(None), "not set");
        assert_eq!(
            describe_point(Some(GeoPoint::new(17.385044, 78.486671))),
            "17.38504 / 78.48667"
        );
    }

    fn click_point(detail: serde_json::Value) -> Option<GeoPoint> {
        serde_json::from_value::<MapClickPayload>(detail)
            .ok()
            .and_then(|payload| payload.point())
    }

    #[test]
    fn test_map_click_payload() {
        assert_eq!(
            click_point(serde_json::json!({"lat": 17.4, "lon": 78.5})),
            Some(GeoPoint::new(17.4, 78.5))
        );
    }

    #[test]
    fn test_malformed_map_click_yields_no_point() {
        assert_eq!(click_point(serde_json::json!({})), None);
        assert_eq!(click_point(serde_json::json!({"lat": 17.4})), None);
        assert_eq!(click_point(serde_json::json!({"lat": null, "lon": 78.5})), None);
        assert_eq!(click_point(serde_json::json!({"lat": "17.4", "lon": 78.5})), None);
        assert_eq!(click_point(serde_json::json!(null)), None);
        assert_eq!(MapClickPayload::default().point(), None);
    }

    #[test]
    fn test_coordinate_input_is_numeric() {
        let Node::Element(el) = coordinate_input("Start Latitude", "17.3", Msg::StartLatChanged)
        else {
            panic!("expected an element");
        };
        let attr = |at: At| el.attrs.vals.get(&at).cloned();
        assert_eq!(attr(At::Type), Some(AtValue::Some("number".into())));
        assert_eq!(attr(At::Step), Some(AtValue::Some("any".into())));
        assert_eq!(attr(At::Value), Some(AtValue::Some("17.3".into())));
    }

    #[test]
    fn test_form_starts_empty() {
        let form = EndpointForm::default();
        assert!(form.start_lat.is_empty());
        assert!(form.end_lon.is_empty());
    }
}
