use std::fmt;

use zterm::line::LineError;
use zterm::session::SessionError;
use zterm::transport::TransportError;

// Process exit codes. 64 follows sysexits EX_USAGE.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
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

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::UnsupportedBaudRate(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn line_error(context: &str, err: LineError) -> CliError {
    match err {
        LineError::BufferTooSmall | LineError::HeaderTooSmall { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        LineError::Io(_) | LineError::ChannelClosed => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Open(err) => transport_error(context, err),
        SessionError::Line(err) => line_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn open_failure_maps_to_transport_error() {
        let err = SessionError::Open(TransportError::Open {
            path: PathBuf::from("/dev/ttyUSB9"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });

        let cli = session_error("open failed", err);

        assert_eq!(cli.code, TRANSPORT_ERROR);
        assert!(cli.message.starts_with("open failed: failed to open /dev/ttyUSB9"));
    }

    #[test]
    fn permission_denied_is_still_a_transport_error() {
        let err = TransportError::Open {
            path: PathBuf::from("/dev/ttyS0"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(transport_error("open failed", err).code, TRANSPORT_ERROR);
    }

    #[test]
    fn configuration_errors_are_usage_errors() {
        assert_eq!(
            transport_error("x", TransportError::UnsupportedBaudRate(1)).code,
            USAGE
        );
        assert_eq!(
            session_error("x", SessionError::Line(LineError::BufferTooSmall)).code,
            USAGE
        );
    }

    #[test]
    fn overflow_is_internal_when_it_escapes() {
        let err = line_error("x", LineError::Overflow { capacity: 8 });
        assert_eq!(err.code, INTERNAL);
    }
}
