use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// Runs a recognized command to completion.
pub trait CommandRunner {
    /// Run `command` synchronously and return its exit status.
    ///
    /// A command killed by a signal reports `128 + signal`, as a shell would.
    fn run(&mut self, command: &[u8]) -> std::io::Result<i32>;
}

/// Runs commands through `/bin/sh -c`.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    working_dir: Option<PathBuf>,
}

impl ShellRunner {
    /// Create a runner that uses the current working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands from `dir`, where `./zdir` and `./zsend` are resolved.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &[u8]) -> std::io::Result<i32> {
        let mut shell = Command::new("/bin/sh");
        shell.arg("-c").arg(OsStr::from_bytes(command));
        if let Some(dir) = &self.working_dir {
            shell.current_dir(dir);
        }

        let status = shell.status()?;
        debug!(?status, "command finished");

        Ok(status
            .code()
            .unwrap_or_else(|| 128 + status.signal().unwrap_or(0)))
    }
}
