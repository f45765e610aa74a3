pub mod click;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod manual;
pub mod overlay;
pub mod parser;
pub mod recording;
pub mod script;
pub mod session;
pub mod store;
pub mod view;

pub use config::{SessionConfig, ThirdClickPolicy};
pub use error::{ConfigError, CoordinateError, GeolocationError, GeolocationErrorKind, LocateError};
pub use session::RouteSession;
