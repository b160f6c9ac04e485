//! Wire-level constants of the terminal protocol.
//!
//! The echo sequences are observable by the remote terminal and their exact
//! lengths must not change.

/// Ends a line (carriage return, ASCII 13).
pub const LINE_TERMINATOR: u8 = b'\r';

/// Erases the previous character (ASCII 8).
pub const BACKSPACE: u8 = 0x08;

/// Written after the logical end of a line or command.
pub const TERMINATOR: u8 = 0;

/// Trailing bytes that request an immediate disconnect.
///
/// Peers setting up a direct cable connection send this repeatedly.
pub const SHUTDOWN_KEYWORD: &[u8; 6] = b"CLIENT";

/// Echoed after the carriage return of a completed line.
pub const TERMINATOR_ECHO: &[u8] = b"\n\n\n";

/// Echoed after the backspace itself to blank the erased character.
pub const ERASE_ECHO: &[u8] = &[b' ', BACKSPACE];

/// Echoed once when a line overflows the buffer.
pub const OVERFLOW_ECHO: &[u8] = b"\r\n\n\n";

/// Path prefix written into the header margin of a recognized command.
pub const COMMAND_PREFIX: &[u8; 2] = b"./";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_sequence_lengths_are_fixed() {
        assert_eq!(TERMINATOR_ECHO.len(), 3);
        assert_eq!(ERASE_ECHO.len(), 2);
        assert_eq!(OVERFLOW_ECHO.len(), 4);
    }

    #[test]
    fn erase_echo_blanks_then_steps_back() {
        assert_eq!(ERASE_ECHO, b" \x08");
    }

    #[test]
    fn overflow_echo_differs_from_terminator_echo() {
        assert_ne!(OVERFLOW_ECHO, TERMINATOR_ECHO);
        assert!(OVERFLOW_ECHO.ends_with(TERMINATOR_ECHO));
    }
}
