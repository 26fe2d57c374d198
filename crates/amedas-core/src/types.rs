//! Snapshot data model for AMeDAS map data
//!
//! The provider publishes one JSON object per timestamp, keyed by station
//! code. Each station maps measurement names to `[value, flag]` pairs. Only
//! the two wind fields are read here; everything else is carried through
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Measurement key for wind speed (m/s)
pub const WIND: &str = "wind";

/// Measurement key for wind bearing (degrees)
pub const WIND_DIRECTION: &str = "windDirection";

/// Provider data-quality code attached to every measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityFlag(pub i64);

impl QualityFlag {
    /// Normal value ("正常値")
    pub const NORMAL: QualityFlag = QualityFlag(0);

    /// Only the normal flag is trusted; anything else reads as missing.
    pub fn is_valid(self) -> bool {
        self == Self::NORMAL
    }
}

/// One measured quantity plus its quality flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationTuple {
    pub value: Option<f64>,
    pub flag: QualityFlag,
}

impl ObservationTuple {
    /// Read a `[value, flag]` array. Returns `None` when the shape does not match.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let items = raw.as_array()?;
        if items.len() < 2 {
            return None;
        }
        let value = match &items[0] {
            Value::Null => None,
            Value::Number(n) => Some(n.as_f64()?),
            _ => return None,
        };
        let flag = QualityFlag(items[1].as_i64()?);
        Some(Self { value, flag })
    }

    /// The value, or `None` if absent, non-finite or not flagged valid
    pub fn usable(&self) -> Option<f64> {
        if !self.flag.is_valid() {
            return None;
        }
        self.value.filter(|v| v.is_finite())
    }
}

/// A wind speed and bearing pair with both values present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    /// Speed in m/s
    pub speed: f64,
    /// Degrees clockwise from north the wind blows from
    pub bearing: f64,
}

/// Every measurement reported by one station at one timestamp
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationObservation {
    fields: Value,
}

impl StationObservation {
    pub fn new(fields: Value) -> Self {
        Self { fields }
    }

    /// Raw JSON for one measurement
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Parsed tuple for one measurement, if present and well-formed
    pub fn tuple(&self, name: &str) -> Option<ObservationTuple> {
        self.get(name).and_then(ObservationTuple::from_value)
    }

    pub fn wind(&self) -> Option<ObservationTuple> {
        self.tuple(WIND)
    }

    pub fn wind_direction(&self) -> Option<ObservationTuple> {
        self.tuple(WIND_DIRECTION)
    }

    /// Speed and bearing, only when both are usable
    pub fn wind_reading(&self) -> Option<WindReading> {
        let speed = self.wind()?.usable()?;
        let bearing = self.wind_direction()?.usable()?;
        Some(WindReading { speed, bearing })
    }

    pub fn as_json(&self) -> &Value {
        &self.fields
    }
}

/// Provider map data for a single timestamp, keyed by station code.
/// The top level must be a JSON object; anything else fails to parse.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    stations: HashMap<String, StationObservation>,
}

impl Snapshot {
    pub fn new(stations: HashMap<String, StationObservation>) -> Self {
        Self { stations }
    }

    pub fn station(&self, code: &str) -> Option<&StationObservation> {
        self.stations.get(code)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn station_codes(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }
}
