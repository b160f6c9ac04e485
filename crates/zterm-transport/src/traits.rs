use std::io::{Read, Write};

/// What [`ByteChannel::wait_readable`] observed when it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Input is pending.
    Readable,
    /// Input may be pending, but the peer hung up. Once the pending input is
    /// drained, reads return zero bytes forever.
    HungUp,
}

/// A duplex byte stream a terminal session runs on.
///
/// On top of `Read + Write`, a channel can block until input is pending.
/// Readers call [`ByteChannel::wait_readable`] before every read so that a
/// non-blocking device (`VMIN = 0`) never turns into a busy loop.
pub trait ByteChannel: Read + Write {
    /// Block until at least one byte can be read, with no timeout.
    ///
    /// After [`Readiness::Readable`] a subsequent read may still return zero
    /// bytes; callers treat that as "no data yet" and wait again. After
    /// [`Readiness::HungUp`] a zero-byte read means the channel is gone.
    fn wait_readable(&mut self) -> std::io::Result<Readiness>;
}

impl<T: ByteChannel + ?Sized> ByteChannel for &mut T {
    fn wait_readable(&mut self) -> std::io::Result<Readiness> {
        (**self).wait_readable()
    }
}

impl<T: ByteChannel + ?Sized> ByteChannel for Box<T> {
    fn wait_readable(&mut self) -> std::io::Result<Readiness> {
        (**self).wait_readable()
    }
}

#[cfg(unix)]
impl ByteChannel for std::os::unix::net::UnixStream {
    fn wait_readable(&mut self) -> std::io::Result<Readiness> {
        use std::os::fd::AsRawFd;

        poll_readable(self.as_raw_fd())
    }
}

/// Block on `poll(2)` until `fd` is readable.
///
/// Hang-up or error conditions without pending input are reported as
/// `BrokenPipe`. With pending input they are reported as
/// [`Readiness::HungUp`], so the reader can drain what is left and then stop.
#[cfg(unix)]
pub(crate) fn poll_readable(fd: std::os::fd::RawFd) -> std::io::Result<Readiness> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    // SAFETY: `pfd` is a valid, writable pollfd and the count passed is 1.
    let rc = unsafe { libc::poll(&mut pfd, 1, -1) };
    if rc < 0 {
        return Err(std::io::Error::last_os_error());
    }

    let hung_up = pfd.revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0;
    if !hung_up {
        return Ok(Readiness::Readable);
    }
    if pfd.revents & libc::POLLIN == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "channel hung up",
        ));
    }

    Ok(Readiness::HungUp)
}
