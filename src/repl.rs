//! Interactive read-eval-print loop over `simple_query`.

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::client::GrokClient;
use crate::transport::Transport;

/// Words that end the session (case-insensitive).
pub const EXIT_COMMANDS: &[&str] = &["quit", "exit", "q"];

pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    EXIT_COMMANDS.iter().any(|c| line.eq_ignore_ascii_case(c))
}

/// Read questions from `input` until an exit command or end of input,
/// printing each answer to `out`.
///
/// API errors are printed and the loop carries on. Returns how many
/// questions were answered successfully; only I/O failures on `input` or
/// `out` abort the loop.
pub async fn run_interactive<T, R, W>(
    client: &GrokClient<T>,
    input: R,
    out: &mut W,
) -> io::Result<usize>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Enter your questions (type 'quit' to exit):")?;

    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        write!(out, "\nYou: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.trim();

        if is_exit_command(line) {
            writeln!(out, "Goodbye!")?;
            break;
        }
        if line.is_empty() {
            continue;
        }

        match client.simple_query(line, None).await {
            Ok(reply) => {
                writeln!(out, "Grok: {reply}")?;
                answered += 1;
            }
            Err(e) => {
                warn!(error = %e, "Interactive query failed");
                writeln!(out, "Error: {e}")?;
            }
        }
    }

    Ok(answered)
}
