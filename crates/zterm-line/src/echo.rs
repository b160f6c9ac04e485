use std::io::{ErrorKind, Write};

use crate::error::{LineError, Result};

/// Write every part to `out` in order, then flush (blocking).
///
/// Interrupted and would-block writes are retried, as the serial device is
/// opened non-blocking for reads and may briefly refuse output too.
pub fn write_parts<W: Write + ?Sized>(out: &mut W, parts: &[&[u8]]) -> Result<()> {
    for part in parts {
        let mut offset = 0usize;
        while offset < part.len() {
            match out.write(&part[offset..]) {
                Ok(0) => return Err(LineError::ChannelClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(LineError::Io(err)),
            }
        }
    }

    loop {
        match out.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(LineError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn writes_parts_in_order() {
        let mut out = Cursor::new(Vec::<u8>::new());
        write_parts(&mut out, &[b"\r", b"\n\n\n"]).unwrap();
        assert_eq!(out.into_inner(), b"\r\n\n\n");
    }

    #[test]
    fn empty_parts_write_nothing() {
        let mut out = Cursor::new(Vec::<u8>::new());
        write_parts(&mut out, &[]).unwrap();
        write_parts(&mut out, &[b""]).unwrap();
        assert!(out.into_inner().is_empty());
    }

    #[test]
    fn flush_propagates() {
        let mut sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);

        write_parts(&mut sink, &[b"x"]).unwrap();

        assert!(flag.load(Ordering::SeqCst));
        assert_eq!(sink.data, b"x");
    }

    #[test]
    fn handles_interrupted_and_would_block() {
        let mut out = FlakyWriter::default();
        write_parts(&mut out, &[b"abc", b"de"]).unwrap();
        assert_eq!(out.data, b"abcde");
    }

    #[test]
    fn channel_closed_when_write_returns_zero() {
        let err = write_parts(&mut ZeroWriter, &[b"x"]).unwrap_err();
        assert!(matches!(err, LineError::ChannelClosed));
    }

    #[test]
    fn other_errors_propagate() {
        let err = write_parts(&mut BrokenWriter, &[b"x"]).unwrap_err();
        assert!(matches!(err, LineError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Alternates interruptions with single-byte writes.
    #[derive(Default)]
    struct FlakyWriter {
        calls: usize,
        data: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            match self.calls % 3 {
                1 => Err(std::io::Error::from(ErrorKind::Interrupted)),
                2 => Err(std::io::Error::from(ErrorKind::WouldBlock)),
                _ => {
                    self.data.push(buf[0]);
                    Ok(1)
                }
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
