//! Terminal conversation.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use tianqi_chat::ChatEngine;
use tianqi_weather::WeatherLookup;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

fn is_exit(text: &str) -> bool {
    text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit")
}

/// Run a conversation over `input`/`output` until `exit`, `quit` or EOF.
pub async fn run<L, R, W>(
    engine: &ChatEngine<L>,
    input: R,
    mut output: W,
    today: impl Fn() -> NaiveDate,
) -> Result<()>
where
    L: WeatherLookup,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let greeting = engine.greeting(today());
    writeln!(output, "{}\n", greeting.reply)?;
    let mut state = greeting.state;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if is_exit(text) {
            break;
        }

        let turn = engine.turn(&state, text, today()).await;
        writeln!(output, "\n{}\n", turn.reply)?;
        state = turn.state;
    }

    tracing::debug!("Chat session ended");
    Ok(())
}
