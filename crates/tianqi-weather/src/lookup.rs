use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::types::WeatherSummary;

/// Per-day weather lookup consumed by the conversation engine.
///
/// Implementations return `None` for every kind of miss (upstream down,
/// malformed payload, unknown location, date outside the horizon) and log
/// the reason themselves.
pub trait WeatherLookup {
    fn lookup(&self, date: NaiveDate) -> impl Future<Output = Option<WeatherSummary>> + Send;
}

impl<T: WeatherLookup> WeatherLookup for Arc<T> {
    fn lookup(&self, date: NaiveDate) -> impl Future<Output = Option<WeatherSummary>> + Send {
        (**self).lookup(date)
    }
}
