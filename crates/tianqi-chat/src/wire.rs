//! JSON shapes that carry a conversation across stateless requests.
//!
//! The client keeps the session state and echoes it back with each message.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::session::{SessionState, Turn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// `YYYY-MM-DD`; anything unparseable counts as no pending date
    #[serde(default, deserialize_with = "lenient_date")]
    pub pending_date: Option<NaiveDate>,
    #[serde(default)]
    pub invalid_date_count: u32,
    #[serde(default)]
    pub invalid_confirm_count: u32,
}

impl ChatRequest {
    /// Continue a conversation from the state returned by the previous turn.
    pub fn follow_up(message: impl Into<String>, state: SessionState) -> Self {
        Self {
            message: message.into(),
            pending_date: state.pending_date,
            invalid_date_count: state.invalid_date_count,
            invalid_confirm_count: state.invalid_confirm_count,
        }
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            pending_date: self.pending_date,
            invalid_date_count: self.invalid_date_count,
            invalid_confirm_count: self.invalid_confirm_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub pending_date: Option<NaiveDate>,
    pub invalid_date_count: u32,
    pub invalid_confirm_count: u32,
}

impl ChatResponse {
    pub fn state(&self) -> SessionState {
        SessionState {
            pending_date: self.pending_date,
            invalid_date_count: self.invalid_date_count,
            invalid_confirm_count: self.invalid_confirm_count,
        }
    }
}

impl From<Turn> for ChatResponse {
    fn from(turn: Turn) -> Self {
        Self {
            response: turn.reply,
            pending_date: turn.state.pending_date,
            invalid_date_count: turn.state.invalid_date_count,
            invalid_confirm_count: turn.state.invalid_confirm_count,
        }
    }
}

/// Opening message of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInit {
    pub message: String,
}

/// Any JSON value; only a string can carry a date
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Other(#[allow(dead_code)] serde::de::IgnoredAny),
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(RawDate::Text(raw)) = Option::<RawDate>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
    if parsed.is_none() {
        tracing::debug!("Ignoring malformed pending_date {:?}", raw);
    }
    Ok(parsed)
}
