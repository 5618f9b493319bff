//! Centralized error types for the Tianqi application.
//!
//! This module provides a typed error hierarchy that:
//! - Keeps expected conversational outcomes (no date, no data) out of it
//! - Provides user-friendly messages suitable for chat and HTTP replies
//! - Preserves full error context for logging

use thiserror::Error;

/// Top-level application error type.
///
/// Front ends convert everything that can fail at their boundary into this
/// type. Use `user_message()` to get a message fit for the end user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::InvalidRequest(_) => "日期格式錯誤，請使用 YYYY-MM-DD。",
        }
    }

    /// Whether the failure was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidRequest(_))
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "無法連線到氣象服務，請檢查網路連線。",
            NetworkError::Timeout => "氣象服務回應逾時，請稍後再試。",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "氣象服務目前異常，請稍後再試。"
            }
            NetworkError::ServerError { .. } => "氣象服務請求失敗，請再試一次。",
            NetworkError::InvalidResponse(_) => "氣象服務回傳了無法辨識的資料。",
        }
    }
}

/// Weather service errors as seen at the application boundary.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather API error: {0}")]
    ApiError(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::MissingApiKey => "API Key 未設定，請檢查 CWA_API_KEY。",
            WeatherError::LocationNotFound(_) => "氣象資料中找不到指定的地點。",
            WeatherError::ApiError(_) => "氣象 API 回傳失敗。",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Weather(WeatherError::MissingApiKey),
            AppError::InvalidRequest("bad".into()),
            AppError::Weather(WeatherError::ApiError("bad key".into())),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "{err} has an empty message");
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = WeatherError::LocationNotFound("高雄市".into()).into();
        assert!(matches!(
            app_err,
            AppError::Weather(WeatherError::LocationNotFound(_))
        ));

        let app_err: AppError = NetworkError::Timeout.into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherError::MissingApiKey);
        assert!(app_err.user_message().contains("API Key"));
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let client = NetworkError::ServerError {
            status: 401,
            message: "denied".into(),
        };
        assert_ne!(upstream.user_message(), client.user_message());
    }

    #[test]
    fn test_only_invalid_request_is_client_error() {
        assert!(AppError::InvalidRequest("x".into()).is_client_error());
        assert!(!AppError::Weather(WeatherError::MissingApiKey).is_client_error());
        assert!(!AppError::Network(NetworkError::Timeout).is_client_error());
    }
}
