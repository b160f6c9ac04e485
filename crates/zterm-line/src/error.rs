/// Errors that can occur while receiving or dispatching a line.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// The line buffer has no room at all, not even for the terminator.
    #[error("line buffer too small (capacity must be at least 1)")]
    BufferTooSmall,

    /// The header margin cannot hold the command prefix.
    #[error("header margin too small ({size} bytes, min {min})")]
    HeaderTooSmall { size: usize, min: usize },

    /// The line grew past the buffer capacity. The partial line is discarded.
    #[error("line exceeds buffer capacity ({capacity} bytes)")]
    Overflow { capacity: usize },

    /// The peer hung up, or the channel accepted no more bytes while echoing.
    #[error("channel closed by peer")]
    ChannelClosed,

    /// An I/O error occurred on the channel.
    #[error("line I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LineError>;
