//! Error types.
//!
//! `AppError` is what the binary reports (message + process exit code).
//! The pipeline itself speaks in the narrower `FetchError` / `GateError`
//! kinds so callers can tell a dead server from a malformed payload.

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure of a single endpoint fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (connection refused, DNS, I/O).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but is not JSON or does not match `{success, data}`.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered `success: false`.
    #[error("{0}")]
    Application(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::new(4, err.to_string())
    }
}

/// Failure of the readiness gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("display targets missing after {attempts} attempts: {missing:?}")]
    TargetMissing {
        attempts: u32,
        missing: Vec<String>,
    },
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        AppError::new(4, err.to_string())
    }
}

/// A renderer was pointed at a display target that does not exist (or has the wrong kind).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("display target '{0}' is missing")]
    TargetMissing(String),
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::new(4, err.to_string())
    }
}
