//! Line reception with local echo, editing and command dispatch.
//!
//! This is the protocol layer of zterm. A remote user types at a dumb
//! terminal on the far end of a serial line; the receiver:
//! - echoes every byte back so the user sees what they type
//! - handles backspace by erasing the character on screen
//! - ends a line on carriage return
//! - treats the keyword `CLIENT` as an unconditional disconnect request
//!
//! Completed lines are handed to [`classify`], which recognizes the `zdir`
//! and `zsend <file>` commands and turns them into `./zdir` and
//! `./zsend <file>` in place, using header space reserved in front of the
//! line instead of copying.

pub mod buffer;
pub mod command;
pub mod echo;
pub mod error;
pub mod protocol;
pub mod receiver;

pub use buffer::{LineBuffer, LineConfig, DEFAULT_HEADER_MARGIN, DEFAULT_MAX_LINE_LEN};
pub use command::{classify, CommandKind, CommandRule, CommandView, COMMAND_RULES};
pub use echo::write_parts;
pub use error::{LineError, Result};
pub use protocol::{
    BACKSPACE, COMMAND_PREFIX, ERASE_ECHO, LINE_TERMINATOR, OVERFLOW_ECHO, SHUTDOWN_KEYWORD,
    TERMINATOR, TERMINATOR_ECHO,
};
pub use receiver::{LineReceiver, Received};
