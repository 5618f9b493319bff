use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tianqi_core::WeatherConfig;
use tracing::instrument;

use crate::payload::ForecastPayload;
use crate::types::WeatherError;

/// HTTP client for the CWA township forecast datastore
#[derive(Debug, Clone)]
pub struct CwaProvider {
    client: Arc<Client>,
    endpoint: String,
    api_key: Option<String>,
    location_name: String,
}

impl CwaProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: config.endpoint.clone(),
            api_key: config.has_api_key().then(|| config.api_key.clone()).flatten(),
            location_name: config.location_name.clone(),
        })
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    /// Fetch the full forecast document for the configured location.
    #[instrument(skip(self), fields(location = %self.location_name), level = "debug")]
    pub async fn fetch(&self) -> Result<ForecastPayload, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("Authorization", api_key),
                ("locationName", self.location_name.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let payload: ForecastPayload = serde_json::from_slice(&bytes)
            .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))?;

        if !payload.is_success() {
            return Err(WeatherError::Upstream(format!(
                "success flag was {:?}",
                payload.success
            )));
        }

        tracing::debug!("Fetched forecast payload ({} bytes)", bytes.len());
        Ok(payload)
    }
}
