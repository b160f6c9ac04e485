use std::path::{Path, PathBuf};

use zterm_transport::{ByteChannel, SerialConfig, SerialPort};

/// Opens a fresh channel for every session.
pub trait ChannelOpener {
    /// The channel type produced.
    type Channel: ByteChannel;

    /// Open the channel. Dropping the returned value closes it.
    fn open(&mut self) -> zterm_transport::Result<Self::Channel>;

    /// Human-readable name of what is opened, for reports.
    fn describe(&self) -> String;
}

/// Opens a serial device by path.
#[derive(Debug, Clone)]
pub struct SerialOpener {
    path: PathBuf,
    config: SerialConfig,
}

impl SerialOpener {
    /// Create an opener for the device at `path`.
    pub fn new(path: impl Into<PathBuf>, config: SerialConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// The device path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The serial configuration applied on every open.
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

impl ChannelOpener for SerialOpener {
    type Channel = SerialPort;

    fn open(&mut self) -> zterm_transport::Result<SerialPort> {
        SerialPort::open(&self.path, &self.config)
    }

    fn describe(&self) -> String {
        format!(
            "{} at {}bps 8n1",
            self.path.display(),
            self.config.baud_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use zterm_transport::TransportError;

    use super::*;

    #[test]
    fn describes_device_and_speed() {
        let opener = SerialOpener::new("/dev/ttyUSB0", SerialConfig { baud_rate: 57_600 });
        assert_eq!(opener.describe(), "/dev/ttyUSB0 at 57600bps 8n1");
        assert_eq!(opener.path(), Path::new("/dev/ttyUSB0"));
        assert_eq!(opener.config().baud_rate, 57_600);
    }

    #[test]
    fn open_missing_device_fails() {
        let path = std::env::temp_dir().join(format!("zterm-opener-{}", std::process::id()));
        let mut opener = SerialOpener::new(&path, SerialConfig::default());
        assert!(matches!(opener.open(), Err(TransportError::Open { .. })));
    }
}
