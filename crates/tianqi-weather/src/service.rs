use std::sync::Arc;

use chrono::NaiveDate;
use tianqi_core::WeatherConfig;
use tracing::instrument;

use crate::aggregate::{daily_summaries, hourly_breakdown, summarize_day};
use crate::cache::ForecastCache;
use crate::lookup::WeatherLookup;
use crate::payload::{ForecastPayload, LocationForecast};
use crate::provider::CwaProvider;
use crate::types::{Forecast, WeatherError, WeatherSummary};

/// Provider, payload cache and aggregation behind one handle.
#[derive(Debug)]
pub struct ForecastService {
    provider: CwaProvider,
    cache: ForecastCache,
}

impl ForecastService {
    pub fn new(provider: CwaProvider, cache: ForecastCache) -> Self {
        Self { provider, cache }
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(
            CwaProvider::new(config)?,
            ForecastCache::from_minutes(config.cache_minutes),
        ))
    }

    /// Forget the cached payload; the next request goes upstream.
    pub fn refresh(&self) {
        tracing::debug!("Forecast cache invalidated");
        self.cache.invalidate();
    }

    /// Summary for one day; `Ok(None)` when the payload has no samples for it.
    #[instrument(skip(self), level = "debug")]
    pub async fn summary(&self, date: NaiveDate) -> Result<Option<WeatherSummary>, WeatherError> {
        let payload = self.payload().await?;
        let location = self.location(&payload)?;
        Ok(summarize_day(location, date))
    }

    /// Daily table and hourly detail for `[start, end]`.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(&self, start: NaiveDate, end: NaiveDate) -> Result<Forecast, WeatherError> {
        let payload = self.payload().await?;
        let location = self.location(&payload)?;

        Ok(Forecast {
            daily: daily_summaries(location, start, end),
            hourly: hourly_breakdown(location, start, end),
        })
    }

    async fn payload(&self) -> Result<Arc<ForecastPayload>, WeatherError> {
        if let Some(payload) = self.cache.get() {
            tracing::debug!("Using cached forecast payload");
            return Ok(payload);
        }

        let payload = Arc::new(self.provider.fetch().await?);
        self.cache.store(Arc::clone(&payload));
        Ok(payload)
    }

    fn location<'a>(&self, payload: &'a ForecastPayload) -> Result<&'a LocationForecast, WeatherError> {
        let name = self.provider.location_name();
        payload
            .location(name)
            .ok_or_else(|| WeatherError::LocationNotFound(name.to_string()))
    }
}

impl WeatherLookup for ForecastService {
    async fn lookup(&self, date: NaiveDate) -> Option<WeatherSummary> {
        match self.summary(date).await {
            Ok(Some(summary)) => Some(summary),
            Ok(None) => {
                tracing::info!("No forecast samples for {}", date);
                None
            }
            Err(e) => {
                tracing::warn!("Weather lookup for {} failed: {}", date, e);
                None
            }
        }
    }
}
