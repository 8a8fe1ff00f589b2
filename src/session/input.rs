// src/session/input.rs

use crate::core::HandoptError;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Where a session gets its parameter guesses from.
pub trait ParameterSource {
    /// Reads one complete parameter vector of `count` values.
    ///
    /// Malformed values are handled inside the source (by asking again) and
    /// never surface here. Returns `Err(HandoptError::SessionCancelled)` when
    /// the user gives up while being asked.
    fn read_parameters(&mut self, count: usize) -> Result<Vec<f64>, HandoptError>;
}

/// Parses one user-entered value. Only finite reals are accepted.
pub fn parse_value(text: &str) -> Result<f64, HandoptError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(HandoptError::MalformedInput { input: trimmed.to_string() }),
    }
}

/// Line-oriented prompt/reply source, one value per line.
///
/// Any malformed value discards the values entered so far for this vector and
/// restarts from `x1`. End of input counts as cancellation.
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
    rejected: usize,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer, rejected: 0 }
    }

    /// Number of malformed values seen so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Reads and parses one line. A line that is not UTF-8 is malformed;
    /// its bytes are already consumed, so the next read starts clean.
    fn read_value(&mut self) -> Result<f64, HandoptError> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Err(HandoptError::SessionCancelled),
            Ok(_) => parse_value(&line),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                Err(HandoptError::MalformedInput { input: "<not UTF-8>".to_string() })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ConsoleInput<io::StdinLock<'static>, io::Stdout> {
    /// Reads from stdin, prompts on stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ParameterSource for ConsoleInput<R, W> {
    fn read_parameters(&mut self, count: usize) -> Result<Vec<f64>, HandoptError> {
        let mut params = Vec::with_capacity(count);
        while params.len() < count {
            write!(self.writer, "Enter value for x{}: ", params.len() + 1)?;
            self.writer.flush()?;
            match self.read_value() {
                Ok(value) => params.push(value),
                Err(e @ HandoptError::MalformedInput { .. }) => {
                    self.rejected += 1;
                    debug!(error = %e, "re-prompting");
                    writeln!(self.writer, "Invalid input. Enter parameters again")?;
                    params.clear();
                }
                Err(e) => return Err(e),
            }
        }
        Ok(params)
    }
}
