//! Forecast data for tianqi
//!
//! Fetches the CWA township forecast for one location, caches the payload
//! and reshapes it into per-day summaries and hourly detail.

pub mod types;
pub mod payload;
pub mod aggregate;
pub mod cache;
pub mod provider;
pub mod lookup;
pub mod service;

pub use types::*;
pub use cache::ForecastCache;
pub use lookup::WeatherLookup;
pub use provider::CwaProvider;
pub use service::ForecastService;
