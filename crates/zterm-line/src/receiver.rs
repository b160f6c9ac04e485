use std::io::{ErrorKind, Read};

use tracing::{debug, trace, warn};
use zterm_transport::{ByteChannel, Readiness};

use crate::buffer::LineBuffer;
use crate::echo::write_parts;
use crate::error::{LineError, Result};
use crate::protocol::{
    BACKSPACE, ERASE_ECHO, LINE_TERMINATOR, OVERFLOW_ECHO, SHUTDOWN_KEYWORD, TERMINATOR_ECHO,
};

/// Successful outcome of [`LineReceiver::receive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// A carriage return completed a line of the given length.
    Line(usize),
    /// The shutdown keyword arrived; the peer wants the line released.
    ShutdownRequested,
}

/// Reads lines from a [`ByteChannel`] one byte at a time, with echo.
///
/// Every byte is classified and echoed before the next one is requested,
/// so a remote user typing at a raw terminal sees their input and can
/// correct it with backspace.
pub struct LineReceiver<T> {
    inner: T,
}

impl<T: ByteChannel> LineReceiver<T> {
    /// Create a receiver on a channel.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Receive the next line into `buf` (blocking, no timeout).
    ///
    /// The buffer is reset first. On [`Received::Line`] and
    /// [`Received::ShutdownRequested`] the line is terminated in place. On
    /// [`LineError::Overflow`] the partial line is discarded and the buffer
    /// content must not be used.
    pub fn receive(&mut self, buf: &mut LineBuffer) -> Result<Received> {
        if buf.capacity() < 1 {
            return Err(LineError::BufferTooSmall);
        }
        buf.clear();

        loop {
            let byte = self.read_byte()?;

            match byte {
                LINE_TERMINATOR => {
                    write_parts(&mut self.inner, &[&[byte], TERMINATOR_ECHO])?;
                    buf.terminate();
                    debug!(len = buf.len(), "line received");
                    return Ok(Received::Line(buf.len()));
                }
                BACKSPACE => {
                    if buf.pop() {
                        write_parts(&mut self.inner, &[&[byte], ERASE_ECHO])?;
                    }
                }
                _ => {
                    write_parts(&mut self.inner, &[&[byte]])?;

                    if !buf.push(byte) {
                        write_parts(&mut self.inner, &[OVERFLOW_ECHO])?;
                        buf.clear();
                        warn!(capacity = buf.capacity(), "line overflow, discarding input");
                        return Err(LineError::Overflow {
                            capacity: buf.capacity(),
                        });
                    }

                    if buf.line().ends_with(SHUTDOWN_KEYWORD) {
                        buf.terminate();
                        debug!("shutdown keyword received");
                        return Ok(Received::ShutdownRequested);
                    }
                }
            }
        }
    }

    /// Block until one byte has been read.
    ///
    /// Empty, interrupted and would-block reads go back to waiting, unless
    /// the channel reported a hang-up and has nothing left to read.
    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            let readiness = match self.inner.wait_readable() {
                Ok(readiness) => readiness,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LineError::Io(err)),
            };

            match self.inner.read(&mut byte) {
                Ok(0) if readiness == Readiness::HungUp => {
                    debug!("channel hung up");
                    return Err(LineError::ChannelClosed);
                }
                Ok(0) => {
                    trace!("empty read, waiting again");
                    continue;
                }
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(LineError::Io(err)),
            }
        }
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the receiver and return the inner channel.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
