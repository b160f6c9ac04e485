//! Serial terminal session management.
//!
//! This is the "just works" layer. Open the device, serve lines until a
//! command is recognized, release the device, run the command, and start
//! over until cancelled.

pub mod cancel;
pub mod error;
pub mod opener;
pub mod runner;
pub mod session;

pub use cancel::CancellationToken;
pub use error::{Result, SessionError};
pub use opener::{ChannelOpener, SerialOpener};
pub use runner::{CommandRunner, ShellRunner};
pub use session::{
    Session, SessionConfig, SessionEvent, SessionSummary, BANNER, DEFAULT_REOPEN_DELAY, GREETING,
};
