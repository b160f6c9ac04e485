use crate::command::CommandView;
use crate::error::{LineError, Result};
use crate::protocol::{COMMAND_PREFIX, TERMINATOR};

/// Default maximum line length, terminator slot included.
pub const DEFAULT_MAX_LINE_LEN: usize = 128;

/// Default number of bytes reserved in front of the line.
pub const DEFAULT_HEADER_MARGIN: usize = 16;

/// Size configuration for a [`LineBuffer`].
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Line capacity in bytes. One slot is reserved for the terminator, so a
    /// line holds at most `max_line_len - 1` bytes. Default: 128.
    pub max_line_len: usize,
    /// Writable bytes reserved before the line. Default: 16.
    pub header_margin: usize,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            header_margin: DEFAULT_HEADER_MARGIN,
        }
    }
}

impl LineConfig {
    /// Check that the header margin can hold the command prefix.
    ///
    /// A zero `max_line_len` is accepted here; receiving into such a buffer
    /// fails with [`LineError::BufferTooSmall`].
    pub fn validate(&self) -> Result<()> {
        if self.header_margin < COMMAND_PREFIX.len() {
            return Err(LineError::HeaderTooSmall {
                size: self.header_margin,
                min: COMMAND_PREFIX.len(),
            });
        }
        Ok(())
    }
}

/// A fixed-capacity line with a writable header margin in front of it.
///
/// Layout of the single owned allocation:
///
/// ```text
/// ┌────────────────────┬──────────────────────────────────┐
/// │ header margin (H)  │ line (N, last slot = terminator) │
/// └────────────────────┴──────────────────────────────────┘
///                      ^ logical offset 0
/// ```
///
/// The buffer is allocated once and reused for every line.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    storage: Vec<u8>,
    header: usize,
    len: usize,
}

impl LineBuffer {
    /// Allocate a buffer for the given configuration.
    pub fn new(config: &LineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            storage: vec![0u8; config.header_margin + config.max_line_len],
            header: config.header_margin,
            len: 0,
        })
    }

    /// Line capacity in bytes, terminator slot included.
    pub fn capacity(&self) -> usize {
        self.storage.len() - self.header
    }

    /// Size of the header margin.
    pub fn header_margin(&self) -> usize {
        self.header
    }

    /// Current logical line length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the logical line is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The logical line content.
    pub fn line(&self) -> &[u8] {
        &self.storage[self.header..self.header + self.len]
    }

    /// The logical line followed by the byte in the terminator slot.
    ///
    /// Only meaningful after a completed line or a shutdown request; the
    /// terminator slot is not maintained while a line is being edited.
    pub fn terminated_line(&self) -> &[u8] {
        &self.storage[self.header..self.header + self.len + 1]
    }

    /// Resolve a view produced by [`crate::classify`] against this buffer.
    ///
    /// # Panics
    ///
    /// Panics if `view` was produced for a buffer with a different layout.
    pub fn command_bytes(&self, view: CommandView) -> &[u8] {
        &self.storage[view.offset()..view.offset() + view.len()]
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Append a byte, keeping the last slot free for the terminator.
    ///
    /// Returns `false` when the line is full.
    pub(crate) fn push(&mut self, byte: u8) -> bool {
        if self.len + 1 >= self.capacity() {
            return false;
        }
        self.storage[self.header + self.len] = byte;
        self.len += 1;
        true
    }

    /// Drop the last byte. The storage is left as is.
    pub(crate) fn pop(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        true
    }

    pub(crate) fn terminate(&mut self) {
        self.storage[self.header + self.len] = TERMINATOR;
    }

    /// Shorten the line to `len` bytes and terminate it there.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
        self.terminate();
    }

    /// Copy `prefix` into the bytes directly in front of the line.
    ///
    /// Returns the absolute offset at which the prefix starts.
    pub(crate) fn write_prefix(&mut self, prefix: &[u8]) -> usize {
        let start = self.header - prefix.len();
        self.storage[start..self.header].copy_from_slice(prefix);
        start
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, line: &[u8]) {
        self.clear();
        for byte in line {
            assert!(self.push(*byte), "test line exceeds capacity");
        }
        self.terminate();
    }
}
