//! Error handling logic

use std::fmt;

/// Error types raised while running a hand-optimization session.
///
/// `MalformedInput` is the only variant recovered locally (by re-prompting);
/// `SessionCancelled` ends the session cleanly; everything else is fatal.
#[derive(Debug)]
pub enum HandoptError {
    /// Parameter text failed to parse as a finite real number.
    MalformedInput {
        /// The offending text, trimmed.
        input: String,
    },

    /// The input source signalled cancellation (EOF or interrupt) while waiting.
    SessionCancelled,

    /// The opaque transformation could not produce an output state.
    EvaluatorFailure {
        /// EvaluatorFailure failure message
        message: String,
    },

    /// The visualization backend could not draw.
    RendererFailure {
        /// RendererFailure failure message
        message: String,
    },

    /// Amplitudes that cannot represent a unit-normalized state.
    InvalidState {
        /// InvalidState failure message
        message: String,
    },

    /// Bad configuration file contents or command line values.
    Config {
        /// Config failure message
        message: String,
    },

    /// Console or file I/O failure.
    Io(std::io::Error),
}

impl HandoptError {
    pub(crate) fn evaluator(message: impl Into<String>) -> Self {
        HandoptError::EvaluatorFailure { message: message.into() }
    }

    pub(crate) fn renderer(message: impl Into<String>) -> Self {
        HandoptError::RendererFailure { message: message.into() }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        HandoptError::Config { message: message.into() }
    }

    /// True for the errors that must terminate the process with a failure status.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, HandoptError::MalformedInput { .. } | HandoptError::SessionCancelled)
    }

    /// Process exit status when this error ends the program.
    pub fn exit_status(&self) -> u8 {
        if self.is_fatal() { 1 } else { 0 }
    }
}

impl fmt::Display for HandoptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandoptError::MalformedInput { input } => write!(f, "Malformed input: '{}' is not a real number", input),
            HandoptError::SessionCancelled => write!(f, "Session cancelled"),
            HandoptError::EvaluatorFailure { message } => write!(f, "Evaluator failure: {}", message),
            HandoptError::RendererFailure { message } => write!(f, "Renderer failure: {}", message),
            HandoptError::InvalidState { message } => write!(f, "Invalid state: {}", message),
            HandoptError::Config { message } => write!(f, "Configuration error: {}", message),
            HandoptError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for HandoptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandoptError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HandoptError {
    fn from(e: std::io::Error) -> Self {
        HandoptError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_collaborator_failures_exit_nonzero() {
        assert_eq!(HandoptError::SessionCancelled.exit_status(), 0);
        assert_eq!(HandoptError::MalformedInput { input: "x".to_string() }.exit_status(), 0);
        assert_eq!(HandoptError::evaluator("boom").exit_status(), 1);
        assert_eq!(HandoptError::renderer("boom").exit_status(), 1);
        assert_eq!(HandoptError::config("bad").exit_status(), 1);
        let io = HandoptError::from(std::io::Error::other("closed"));
        assert_eq!(io.exit_status(), 1);
    }
}
