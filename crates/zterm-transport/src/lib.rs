//! Byte channel abstraction for zterm.
//!
//! Provides a unified interface over the duplex byte streams a terminal
//! session can run on:
//! - Serial character devices in raw mode (Linux/macOS)
//! - Unix stream sockets (local loopback and tests)
//!
//! This is the lowest layer of zterm. Everything else builds on top of
//! the [`ByteChannel`] trait provided here.

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod serial;

pub use error::{Result, TransportError};
pub use traits::{ByteChannel, Readiness};

#[cfg(unix)]
pub use serial::{SerialConfig, SerialPort, DEFAULT_BAUD_RATE, SUPPORTED_BAUD_RATES};
