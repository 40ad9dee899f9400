// src/console.rs

//! Interactive console.
//!
//! Reads line-oriented input from our own stdin. Lines starting with the
//! sentinel character are meta-commands (`:quit` / `:exit`); everything else
//! is forwarded verbatim to the active test run's stdin.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;

const COMMAND_SENTINEL: char = ':';

/// Spawn the console input loop.
pub fn spawn_console(events_tx: mpsc::Sender<RuntimeEvent>) {
    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let event = match parse_line(&line) {
                ConsoleInput::Cancel => RuntimeEvent::CancelRequested,
                ConsoleInput::Forward(text) => RuntimeEvent::StdinLine(text),
                ConsoleInput::Unknown(cmd) => {
                    warn!(command = %cmd, "unknown console command");
                    continue;
                }
            };
            if events_tx.send(event).await.is_err() {
                return;
            }
        }

        debug!("console input loop ended");
    });
}

/// What a console line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// `:quit` or `:exit`.
    Cancel,
    /// Any non-sentinel line, forwarded to the child.
    Forward(String),
    /// A sentinel line with an unrecognized command.
    Unknown(String),
}

/// Classify one input line.
pub fn parse_line(line: &str) -> ConsoleInput {
    let Some(rest) = line.strip_prefix(COMMAND_SENTINEL) else {
        return ConsoleInput::Forward(line.to_string());
    };

    match rest.trim() {
        "quit" | "exit" => ConsoleInput::Cancel,
        other => ConsoleInput::Unknown(other.to_string()),
    }
}
