//! Session loop: one line in, one line out.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use super::error::{InfraError, InfraResult, IoResultExt};
use crate::application::{Environment, Reply, Session, SessionState};

/// Prefix of every error line.
pub const ERROR_PREFIX: &str = "Error, ";

/// How a session loop ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    EndOfInput,
}

/// Feeds `input` line by line into `session` and writes one line per command to `output`.
///
/// Rejected commands print `Error, <message>` and the loop continues. A fatal
/// error, or any error when `strict` is set, is printed and then returned.
pub fn run<E, R, W>(session: &mut Session<E>, input: R, output: &mut W, strict: bool) -> InfraResult<Outcome>
where
    E: Environment,
    R: BufRead,
    W: Write,
{
    if session.state() == SessionState::Init {
        session.start()?;
    }

    for (number, line) in input.lines().enumerate() {
        let line = line.io_context("read command")?;
        match session.execute(&line) {
            Ok(Reply::Line(text)) => {
                writeln!(output, "{text}").io_context("write reply")?;
            }
            Ok(Reply::Quit) => {
                output.flush().io_context("flush output")?;
                info!("run: quit after {} lines", number + 1);
                return Ok(Outcome::Quit);
            }
            Err(e) => {
                writeln!(output, "{ERROR_PREFIX}{e}").io_context("write error")?;
                if e.is_fatal() || strict {
                    output.flush().io_context("flush output")?;
                    warn!("run: stopping at line {}: {}", number + 1, e);
                    return Err(InfraError::Application(e));
                }
                debug!("run: line {} rejected: {}", number + 1, e);
            }
        }
        output.flush().io_context("flush output")?;
    }

    info!("run: end of input");
    Ok(Outcome::EndOfInput)
}
