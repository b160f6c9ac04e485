//! Line-oriented terminal on a serial device.
//!
//! zterm serves a remote user typing at a dumb terminal: it echoes and edits
//! their input line by line and runs `./zdir` or `./zsend <file>` when asked,
//! releasing the device while the command runs.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte channel trait and raw-mode serial device
//! - [`line`]: Line reception with echo, editing and command dispatch
//! - [`session`]: Open / serve / close / invoke loop with cancellation

/// Re-export transport types.
pub mod transport {
    pub use zterm_transport::*;
}

/// Re-export line types.
pub mod line {
    pub use zterm_line::*;
}

/// Re-export session types.
pub mod session {
    pub use zterm_session::*;
}

/// Device operated when none is given on the command line.
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";
