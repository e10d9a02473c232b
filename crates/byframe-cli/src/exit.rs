use std::fmt;
use std::io;

use byframe::FrameError;

// Exit codes follow the sysexits-style layout used across the tool.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::LengthTooLarge { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        FrameError::HeaderInsufficient
        | FrameError::Insufficient { .. }
        | FrameError::HeaderTooLarge
        | FrameError::LimitExceeded { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_are_data_invalid() {
        let err = frame_error("decode failed", FrameError::HeaderTooLarge);
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.to_string(), "decode failed: [byframe] header is too long");

        let err = frame_error("decode failed", FrameError::LimitExceeded { limit: 1 });
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn io_errors_map_by_kind() {
        let err = frame_error(
            "read failed",
            FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);

        let err = io_error("open failed", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
    }
}
