use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    /// A buffer had the wrong length at a framing boundary.
    Size,
    /// A checksum or security value did not match on load.
    Integrity,
    InvalidArgument,
    GameDetectionAmbiguous,
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn size(what: &str, expected: usize, actual: usize) -> Self {
        Self::new(
            CoreErrorCode::Size,
            format!("invalid {what} length: expected {expected}, got {actual}"),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::InvalidArgument, message)
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::Integrity, message)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}

impl From<io::Error> for CoreError {
    fn from(err: io::Error) -> Self {
        let code = match err.kind() {
            io::ErrorKind::UnexpectedEof => CoreErrorCode::Size,
            _ => CoreErrorCode::Io,
        };
        Self::new(code, err.to_string())
    }
}
