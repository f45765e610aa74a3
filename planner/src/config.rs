use std::{fs::File, io::Read, path::Path};

use serde::{Deserialize, Serialize};
use shared::{GeoPoint, MapViewState};

use crate::error::ConfigError;

pub const CONFIG_PATH_VAR: &str = "PLANNER_CONFIG";
pub const THIRD_CLICK_VAR: &str = "PLANNER_THIRD_CLICK";
pub const VALIDATE_BOUNDS_VAR: &str = "PLANNER_VALIDATE_BOUNDS";

// Hyderabad city centre
const DEFAULT_CENTER: GeoPoint = GeoPoint::new(17.385044, 78.486671);
const DEFAULT_ZOOM: u8 = 9;

/// What a map click does once both endpoints are already set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdClickPolicy {
    #[default]
    OverwriteEnd,
    Ignore,
}

impl std::str::FromStr for ThirdClickPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overwrite_end" | "overwrite" => Ok(Self::OverwriteEnd),
            "ignore" => Ok(Self::Ignore),
            _ => Err(ConfigError::InvalidValue {
                key: THIRD_CLICK_VAR,
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub initial_view: MapViewState,
    /// Zoom level used when flying to the device location.
    pub locate_zoom: u8,
    pub animate: bool,
    pub third_click: ThirdClickPolicy,
    /// Reject manually entered coordinates outside ±90° / ±180°.
    pub validate_bounds: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_view: MapViewState {
                center: DEFAULT_CENTER,
                zoom_level: DEFAULT_ZOOM,
            },
            locate_zoom: DEFAULT_ZOOM,
            animate: true,
            third_click: ThirdClickPolicy::default(),
            validate_bounds: false,
        }
    }
}

impl SessionConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Defaults, or the file named by `PLANNER_CONFIG`, with single-field
    /// overrides from `PLANNER_THIRD_CLICK` and `PLANNER_VALIDATE_BOUNDS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                tracing::info!("loading session config from {path}");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(THIRD_CLICK_VAR) {
            self.third_click = value.parse()?;
        }
        if let Some(value) = lookup(VALIDATE_BOUNDS_VAR) {
            self.validate_bounds = parse_flag(VALIDATE_BOUNDS_VAR, &value)?;
        }
        Ok(())
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
