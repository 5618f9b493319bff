use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tianqi_core::{AppError, NetworkError, ReqwestErrorExt};

/// Description used when a day has no weather phenomenon samples
pub const NO_DESCRIPTION: &str = "無資料";

/// Coarse sky condition derived from a forecast description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    Rainy,
    Overcast,
    #[default]
    PartlyCloudy,
}

impl WeatherCondition {
    /// Classify a free-text description such as "多雲短暫陣雨".
    /// Sun wins over rain, rain over overcast; anything else is partly cloudy.
    pub fn from_description(description: &str) -> Self {
        if description.contains('晴') {
            Self::Sunny
        } else if description.contains('雨') {
            Self::Rainy
        } else if description.contains('陰') {
            Self::Overcast
        } else {
            Self::PartlyCloudy
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Sunny => "☀️",
            Self::Rainy => "🌧️",
            Self::Overcast => "☁️",
            Self::PartlyCloudy => "🌤️",
        }
    }
}

/// Chinese weekday name for a date (星期一 … 星期日)
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

/// Aggregated figures for one calendar day, as used by the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub date: NaiveDate,
    pub min_temp: i32,
    pub max_temp: i32,
    /// Highest rain probability of the day, 0–100
    pub rain_probability: u8,
    /// Truncated mean relative humidity, 0–100
    pub average_humidity: u8,
    pub description: String,
}

impl WeatherSummary {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_description(&self.description)
    }
}

/// One row of the daily forecast table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub weekday: String,
    pub weather: Option<String>,
    pub rain_prob: u8,
    pub min_temp: Option<i32>,
    pub min_temp_time: Option<String>,
    pub max_temp: Option<i32>,
    pub max_temp_time: Option<String>,
    pub avg_humidity: Option<u8>,
    pub max_wind: Option<f64>,
    pub wind_dir: Option<String>,
}

/// Forecast values sharing one timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub temp: Option<i32>,
    pub rain: Option<u8>,
    pub humidity: Option<u8>,
    pub weather: Option<String>,
    pub wind_speed: Option<f64>,
    pub wind_dir: Option<String>,
}

/// Date → "HH:MM" → values
pub type HourlyForecast = BTreeMap<NaiveDate, BTreeMap<String, HourlyEntry>>;

/// Daily table plus hourly detail for a date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub daily: Vec<DailySummary>,
    pub hourly: HourlyForecast,
}

/// Forecast provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Upstream reported failure: {0}")]
    Upstream(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Location not found in payload: {0}")]
    LocationNotFound(String),
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::MissingApiKey => {
                AppError::Weather(tianqi_core::WeatherError::MissingApiKey)
            }
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Status { status, body } => AppError::Network(NetworkError::ServerError {
                status,
                message: body,
            }),
            WeatherError::Upstream(s) => AppError::Weather(tianqi_core::WeatherError::ApiError(s)),
            WeatherError::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
            WeatherError::LocationNotFound(s) => {
                AppError::Weather(tianqi_core::WeatherError::LocationNotFound(s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_condition_sunny_wins() {
        assert_eq!(WeatherCondition::from_description("晴時多雲"), WeatherCondition::Sunny);
        assert_eq!(WeatherCondition::from_description("晴午後短暫雷陣雨"), WeatherCondition::Sunny);
    }

    #[test]
    fn test_condition_rain_before_overcast() {
        assert_eq!(WeatherCondition::from_description("陰短暫雨"), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_description("陰天"), WeatherCondition::Overcast);
    }

    #[test]
    fn test_condition_default() {
        assert_eq!(WeatherCondition::from_description("多雲"), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_description(""), WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_condition_emoji() {
        assert_eq!(WeatherCondition::Sunny.emoji(), "☀️");
        assert_eq!(WeatherCondition::Rainy.emoji(), "🌧️");
        assert_eq!(WeatherCondition::Overcast.emoji(), "☁️");
        assert_eq!(WeatherCondition::PartlyCloudy.emoji(), "🌤️");
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(date(2025, 6, 1)), "星期日");
        assert_eq!(weekday_name(date(2025, 6, 2)), "星期一");
        assert_eq!(weekday_name(date(2026, 1, 2)), "星期五");
    }

    #[test]
    fn test_error_mapping_to_app_error() {
        let app: AppError = WeatherError::MissingApiKey.into();
        assert!(matches!(
            app,
            AppError::Weather(tianqi_core::WeatherError::MissingApiKey)
        ));

        let app: AppError = WeatherError::Status {
            status: 503,
            body: "busy".into(),
        }
        .into();
        assert!(matches!(
            app,
            AppError::Network(NetworkError::ServerError { status: 503, .. })
        ));
    }

    #[test]
    fn test_hourly_forecast_serializes_dates_as_keys() {
        let mut hourly = HourlyForecast::new();
        hourly
            .entry(date(2025, 6, 1))
            .or_default()
            .insert("06:00".to_string(), HourlyEntry::default());

        let json = serde_json::to_value(&hourly).unwrap();
        assert!(json["2025-06-01"]["06:00"].is_object());
    }
}
