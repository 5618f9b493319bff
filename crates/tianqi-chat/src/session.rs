use chrono::NaiveDate;

/// Per-conversation state threaded through every turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Date proposed to the user and awaiting a yes/no
    pub pending_date: Option<NaiveDate>,
    /// Consecutive unparseable inputs while no date is pending
    pub invalid_date_count: u32,
    /// Consecutive unclear replies while a date is pending
    pub invalid_confirm_count: u32,
}

impl SessionState {
    /// Waiting for the user to confirm `date`, counters cleared.
    pub fn pending(date: NaiveDate) -> Self {
        Self {
            pending_date: Some(date),
            ..Self::default()
        }
    }
}

/// Reply text plus the state to pass into the next turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub reply: String,
    pub state: SessionState,
}

impl Turn {
    pub fn new(reply: impl Into<String>, state: SessionState) -> Self {
        Self {
            reply: reply.into(),
            state,
        }
    }
}
