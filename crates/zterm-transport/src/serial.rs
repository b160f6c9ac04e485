use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{poll_readable, ByteChannel, Readiness};

/// Baud rate used when none is configured.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Baud rates accepted by [`SerialConfig`].
pub const SUPPORTED_BAUD_RATES: &[u32] = &[9_600, 19_200, 38_400, 57_600, 115_200, 230_400];

/// Configuration for a serial device.
///
/// The line format is fixed at 8N1 without flow control; only the speed is
/// selectable.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Line speed in bits per second. Default: 115200.
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// A serial character device in raw mode.
///
/// Opened with `O_NOCTTY` so the device never becomes the controlling
/// terminal. Reads follow `VMIN = 0, VTIME = 0` semantics: a read returns
/// immediately, possibly with zero bytes, so callers block in
/// [`ByteChannel::wait_readable`] instead. The device is closed on drop.
pub struct SerialPort {
    file: File,
    path: PathBuf,
}

impl SerialPort {
    /// Open and configure a serial device.
    ///
    /// Pending input and output are discarded once the line is configured.
    pub fn open(path: impl AsRef<Path>, config: &SerialConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let speed = speed_for(config.baud_rate)
            .ok_or(TransportError::UnsupportedBaudRate(config.baud_rate))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;

        configure_raw(file.as_raw_fd(), speed).map_err(|e| TransportError::Configure {
            path: path.clone(),
            source: e,
        })?;

        let port = Self { file, path };
        port.flush_queues()?;

        info!(path = ?port.path, baud = config.baud_rate, "opened serial device");
        Ok(port)
    }

    /// Discard all data pending in the input and output queues.
    pub fn flush_queues(&self) -> Result<()> {
        // SAFETY: the descriptor is owned by `self.file` and open.
        let rc = unsafe { libc::tcflush(self.file.as_raw_fd(), libc::TCIOFLUSH) };
        if rc != 0 {
            return Err(TransportError::Io(std::io::Error::last_os_error()));
        }
        Ok(())
    }

    /// The device path this port was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl ByteChannel for SerialPort {
    fn wait_readable(&mut self) -> std::io::Result<Readiness> {
        poll_readable(self.file.as_raw_fd())
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        debug!(path = ?self.path, "closing serial device");
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("path", &self.path)
            .field("fd", &self.file.as_raw_fd())
            .finish()
    }
}

fn speed_for(baud_rate: u32) -> Option<libc::speed_t> {
    let speed = match baud_rate {
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

/// Put the line into raw 8N1 mode with no flow control and no timeout.
fn configure_raw(fd: RawFd, speed: libc::speed_t) -> std::io::Result<()> {
    // SAFETY: an all-zero termios is valid storage for tcgetattr to fill.
    let mut tty: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: `fd` is open and `tty` is a valid, writable termios.
    if unsafe { libc::tcgetattr(fd, &mut tty) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    tty.c_cflag &= !(libc::PARENB | libc::CSTOPB | libc::CSIZE | libc::CRTSCTS);
    tty.c_cflag |= libc::CS8 | libc::CREAD | libc::CLOCAL;

    tty.c_iflag &= !(libc::IXON
        | libc::IXOFF
        | libc::IXANY
        | libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL);

    tty.c_oflag &= !(libc::OPOST | libc::ONLCR);

    tty.c_lflag &= !(libc::ECHO
        | libc::ECHOE
        | libc::ECHONL
        | libc::ICANON
        | libc::ISIG
        | libc::IEXTEN);

    tty.c_cc[libc::VMIN] = 0;
    tty.c_cc[libc::VTIME] = 0;

    // SAFETY: `tty` is a valid termios obtained from tcgetattr above.
    if unsafe { libc::cfsetspeed(&mut tty, speed) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    // SAFETY: `fd` is open and `tty` is fully initialised.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tty) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(())
}
