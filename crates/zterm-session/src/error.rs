/// Errors that end a session loop.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The channel could not be opened. Not retried.
    #[error("channel open failed: {0}")]
    Open(#[from] zterm_transport::TransportError),

    /// The line buffer is misconfigured.
    #[error("line configuration error: {0}")]
    Line(#[from] zterm_line::LineError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
