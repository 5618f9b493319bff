//! HTTP API for the chat and the forecast table.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tianqi_chat::{ChatEngine, ChatInit, ChatRequest, ChatResponse};
use tianqi_core::{AppError, WeatherConfig};
use tianqi_weather::{DailySummary, ForecastService, HourlyForecast};
use tokio::net::TcpListener;
use tracing::{info, instrument};

/// Shared state behind every route
pub struct AppState {
    pub engine: ChatEngine<Arc<ForecastService>>,
    pub forecasts: Arc<ForecastService>,
    pub weather: WeatherConfig,
}

impl AppState {
    pub fn new(weather: WeatherConfig) -> Result<Self, tianqi_weather::WeatherError> {
        let forecasts = Arc::new(ForecastService::from_config(&weather)?);
        Ok(Self {
            engine: ChatEngine::new(Arc::clone(&forecasts)),
            forecasts,
            weather,
        })
    }

    fn today(&self) -> NaiveDate {
        self.weather.today()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/chat/init", get(chat_init))
        .route("/api/chat", post(chat))
        .route("/api/weather", get(weather))
        .route("/api/weather/refresh", post(refresh))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
#[instrument(skip(state))]
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn chat_init(State(state): State<Arc<AppState>>) -> Json<ChatInit> {
    Json(ChatInit {
        message: state.engine.greeting(state.today()).reply,
    })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let turn = state
        .engine
        .turn(&request.state(), &request.message, state.today())
        .await;
    Json(turn.into())
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    success: bool,
    daily: Vec<DailySummary>,
    hourly: HourlyForecast,
}

async fn weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let start = parse_day("start_date", query.start_date.as_deref())?;
    let end = parse_day("end_date", query.end_date.as_deref())?;
    if start > end {
        return Err(AppError::InvalidRequest(format!("start_date {start} is after end_date {end}")).into());
    }

    let forecast = state.forecasts.forecast(start, end).await?;
    Ok(Json(WeatherResponse {
        success: true,
        daily: forecast.daily,
        hourly: forecast.hourly,
    }))
}

/// Drop the cached forecast so the next request goes upstream.
async fn refresh(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.forecasts.refresh();
    info!("Forecast cache cleared");
    Json(serde_json::json!({ "success": true }))
}

fn parse_day(field: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    let value = value.ok_or_else(|| AppError::InvalidRequest(format!("{field} is required")))?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::InvalidRequest(format!("{field} {value:?}: {e}")).into())
}

/// `AppError` rendered as `{"detail": ...}`
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<tianqi_weather::WeatherError> for ApiError {
    fn from(e: tianqi_weather::WeatherError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "Forecast request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(serde_json::json!({ "detail": self.0.user_message() })),
        )
            .into_response()
    }
}
