use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the upstream API resolved the query to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Icon URL as returned upstream (usually protocol-relative).
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub humidity: u8,
    pub pressure_mb: f64,
    pub vis_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_epoch: Option<i64>,
}

/// Snapshot of one successful query. Replaced wholesale on every success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location: Location,
    pub current: Current,
}

impl WeatherRecord {
    pub fn temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.current.temp_c,
            TemperatureUnit::Fahrenheit => self.current.temp_f,
        }
    }

    /// "name, region, country"
    pub fn display_name(&self) -> String {
        let loc = &self.location;
        format!("{}, {}, {}", loc.name, loc.region, loc.country)
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.current
            .last_updated_epoch
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }
}

/// Display unit preference. Stored as a JSON boolean, `true` meaning Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn is_celsius(self) -> bool {
        self == TemperatureUnit::Celsius
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Decode a stored preference. Anything other than a boolean is rejected.
    pub fn from_stored(value: &Value) -> Option<Self> {
        value.as_bool().map(|celsius| {
            if celsius {
                TemperatureUnit::Celsius
            } else {
                TemperatureUnit::Fahrenheit
            }
        })
    }

    pub fn to_stored(self) -> Value {
        Value::Bool(self.is_celsius())
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
