//! Shape of the CWA township forecast datastore response.
//!
//! Only the fields the aggregation reads are modelled; everything else in the
//! upstream document is ignored.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const TEMPERATURE: Element = Element::new("溫度", "Temperature");
pub const RAIN_PROBABILITY: Element = Element::new("3小時降雨機率", "ProbabilityOfPrecipitation");
pub const RELATIVE_HUMIDITY: Element = Element::new("相對濕度", "RelativeHumidity");
pub const WEATHER: Element = Element::new("天氣現象", "Weather");
pub const WIND_SPEED: Element = Element::new("風速", "WindSpeed");
pub const WIND_DIRECTION: Element = Element::new("風向", "WindDirection");

/// A named weather element and the key its value is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    pub value_key: &'static str,
}

impl Element {
    const fn new(name: &'static str, value_key: &'static str) -> Self {
        Self { name, value_key }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub success: String,
    #[serde(default)]
    pub records: Records,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Records {
    #[serde(rename = "Locations", default)]
    pub locations: Vec<LocationGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationGroup {
    #[serde(rename = "Location", default)]
    pub location: Vec<LocationForecast>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationForecast {
    #[serde(rename = "LocationName")]
    pub name: String,
    #[serde(rename = "WeatherElement", default)]
    pub elements: Vec<WeatherElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherElement {
    #[serde(rename = "ElementName")]
    pub name: String,
    #[serde(rename = "Time", default)]
    pub times: Vec<TimeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeEntry {
    #[serde(rename = "DataTime")]
    pub data_time: Option<String>,
    #[serde(rename = "StartTime")]
    pub start_time: Option<String>,
    #[serde(rename = "EndTime")]
    pub end_time: Option<String>,
    #[serde(rename = "ElementValue", default)]
    pub values: Vec<Map<String, Value>>,
}

impl ForecastPayload {
    pub fn is_success(&self) -> bool {
        self.success == "true"
    }

    /// Find a location by its exact name in the first location group
    pub fn location(&self, name: &str) -> Option<&LocationForecast> {
        self.records
            .locations
            .first()?
            .location
            .iter()
            .find(|loc| loc.name == name)
    }
}

impl LocationForecast {
    pub fn element(&self, element: Element) -> Option<&WeatherElement> {
        self.elements.iter().find(|e| e.name == element.name)
    }

    /// Timestamped raw values of one element, in payload order.
    /// Entries without a parseable timestamp or value are skipped.
    pub fn samples(&self, element: Element) -> Vec<(NaiveDateTime, String)> {
        let Some(series) = self.element(element) else {
            return Vec::new();
        };

        series
            .times
            .iter()
            .filter_map(|entry| {
                let at = entry.timestamp()?;
                let value = entry.value(element.value_key)?;
                Some((at, value))
            })
            .collect()
    }
}

impl TimeEntry {
    /// Local wall-clock time of the entry; the UTC offset is dropped.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.start_time.as_deref().or(self.data_time.as_deref())?;
        parse_local_time(raw)
    }

    /// First value stored under `key`, as text
    pub fn value(&self, key: &str) -> Option<String> {
        match self.values.first()?.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn parse_local_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
