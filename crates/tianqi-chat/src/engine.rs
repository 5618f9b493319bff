//! The date-then-confirm conversation.
//!
//! With no date pending the engine tries to read one from the input. Once a
//! date is proposed, the next input is read as a yes/no (or a replacement
//! date) and only a yes triggers the weather lookup.

use chrono::NaiveDate;
use tianqi_weather::WeatherLookup;

use crate::keywords::{classify_confirmation, Confirmation};
use crate::reply;
use crate::resolver::resolve;
use crate::session::{SessionState, Turn};

/// Consecutive failures before the tone escalates
const ESCALATE_AFTER: u32 = 2;

#[derive(Debug, Clone)]
pub struct ChatEngine<L> {
    lookup: L,
}

impl<L: WeatherLookup> ChatEngine<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Opening message of a new conversation.
    pub fn greeting(&self, today: NaiveDate) -> Turn {
        Turn::new(reply::greeting(today), SessionState::default())
    }

    /// Process one user message.
    pub async fn turn(&self, state: &SessionState, text: &str, today: NaiveDate) -> Turn {
        let text = text.trim();
        match state.pending_date {
            Some(pending) => self.confirm(state, pending, text, today).await,
            None => Self::await_date(state, text, today),
        }
    }

    async fn confirm(
        &self,
        state: &SessionState,
        pending: NaiveDate,
        text: &str,
        today: NaiveDate,
    ) -> Turn {
        match classify_confirmation(text) {
            Confirmation::Ambiguous => {
                tracing::debug!("Ambiguous confirmation for {}", pending);
                Turn::new(reply::be_clear(), *state)
            }
            Confirmation::Negate => {
                tracing::debug!("User rejected {}", pending);
                Turn::new(reply::restate(today), SessionState::default())
            }
            Confirmation::Affirm => {
                tracing::debug!("User confirmed {}, looking up weather", pending);
                let reply = match self.lookup.lookup(pending).await {
                    Some(summary) => reply::weather_report(&summary),
                    None => reply::no_data(pending),
                };
                Turn::new(reply, SessionState::default())
            }
            Confirmation::Unclear => match resolve(text, today) {
                Some(date) => {
                    tracing::debug!("Pending date replaced: {} -> {}", pending, date);
                    Turn::new(reply::ask_confirm(date), SessionState::pending(date))
                }
                None => {
                    let count = state.invalid_confirm_count.saturating_add(1);
                    tracing::debug!("Unclear confirmation #{} for {}", count, pending);
                    let reply = if count >= ESCALATE_AFTER {
                        reply::confirm_escalated()
                    } else {
                        reply::confirm_nag()
                    };
                    Turn::new(
                        reply,
                        SessionState {
                            invalid_confirm_count: count,
                            ..*state
                        },
                    )
                }
            },
        }
    }

    fn await_date(state: &SessionState, text: &str, today: NaiveDate) -> Turn {
        if let Some(date) = resolve(text, today) {
            tracing::debug!("Resolved {:?} to {}", text, date);
            return Turn::new(reply::ask_confirm(date), SessionState::pending(date));
        }

        let count = state.invalid_date_count.saturating_add(1);
        tracing::debug!("No date in input (#{})", count);
        if count >= ESCALATE_AFTER {
            Turn::new(
                reply::date_escalated(),
                SessionState {
                    invalid_date_count: 0,
                    ..*state
                },
            )
        } else {
            Turn::new(
                reply::date_nag(today),
                SessionState {
                    invalid_date_count: count,
                    ..*state
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tianqi_weather::WeatherSummary;

    /// Lookup with one known day that counts its calls
    #[derive(Default)]
    struct OneDay {
        calls: AtomicUsize,
    }

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    impl WeatherLookup for OneDay {
        async fn lookup(&self, date: NaiveDate) -> Option<WeatherSummary> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (date == june(2)).then(|| WeatherSummary {
                date,
                min_temp: 25,
                max_temp: 33,
                rain_probability: 60,
                average_humidity: 72,
                description: "多雲短暫陣雨".to_string(),
            })
        }
    }

    fn engine() -> ChatEngine<OneDay> {
        ChatEngine::new(OneDay::default())
    }

    #[tokio::test]
    async fn test_unclear_confirmation_keeps_pending_date() {
        let engine = engine();
        let state = SessionState::pending(june(2));

        let first = engine.turn(&state, "嗯...", june(1)).await;
        assert_eq!(first.reply, reply::confirm_nag());
        assert_eq!(first.state.pending_date, Some(june(2)));
        assert_eq!(first.state.invalid_confirm_count, 1);

        let second = engine.turn(&first.state, "???", june(1)).await;
        assert_eq!(second.reply, reply::confirm_escalated());
        assert_eq!(second.state.invalid_confirm_count, 2);

        let third = engine.turn(&second.state, "hmm", june(1)).await;
        assert_eq!(third.reply, reply::confirm_escalated());
        assert_eq!(third.state.invalid_confirm_count, 3);
        assert_eq!(engine.lookup().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_only_after_affirmation() {
        let engine = engine();

        let proposed = engine.turn(&SessionState::default(), "明天", june(1)).await;
        assert_eq!(engine.lookup().calls.load(Ordering::SeqCst), 0);

        let report = engine.turn(&proposed.state, "是", june(1)).await;
        assert_eq!(engine.lookup().calls.load(Ordering::SeqCst), 1);
        assert!(report.reply.contains("25°C ~ 33°C"));
        assert!(report.reply.contains("💡"));
        assert_eq!(report.state, SessionState::default());
    }

    #[tokio::test]
    async fn test_whitespace_is_trimmed() {
        let engine = engine();
        let turn = engine.turn(&SessionState::pending(june(2)), "  no  ", june(1)).await;
        assert_eq!(turn.reply, reply::restate(june(1)));
        assert_eq!(turn.state, SessionState::default());
    }
}
