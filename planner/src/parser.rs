use shared::{GeoPoint, MAX_LATITUDE};

use crate::error::{Axis, CoordinateError};

/// Turns the free-text latitude/longitude pair of the entry form into a point.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateParser {
    validate_bounds: bool,
}

impl CoordinateParser {
    /// Parser that forwards any finite number, in range or not.
    pub fn permissive() -> Self {
        Self {
            validate_bounds: false,
        }
    }

    /// Parser that also rejects values outside ±90° / ±180°.
    pub fn bounded() -> Self {
        Self {
            validate_bounds: true,
        }
    }

    pub fn parse(&self, lat: &str, lon: &str) -> Result<GeoPoint, CoordinateError> {
        let point = GeoPoint {
            lat: parse_axis(Axis::Latitude, lat)?,
            lon: parse_axis(Axis::Longitude, lon)?,
        };
        if self.validate_bounds && !point.in_bounds() {
            return Err(if point.lat.abs() > MAX_LATITUDE {
                CoordinateError::OutOfRange {
                    axis: Axis::Latitude,
                    value: point.lat,
                }
            } else {
                CoordinateError::OutOfRange {
                    axis: Axis::Longitude,
                    value: point.lon,
                }
            });
        }
        Ok(point)
    }
}

fn parse_axis(axis: Axis, input: &str) -> Result<f64, CoordinateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Empty(axis));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CoordinateError::NotNumeric {
            axis,
            input: input.to_string(),
        })
}
