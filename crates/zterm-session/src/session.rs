use std::time::Duration;

use tracing::{debug, info, warn};
use zterm_line::{
    classify, write_parts, CommandKind, CommandView, LineBuffer, LineConfig, LineError,
    LineReceiver, Received,
};
use zterm_transport::ByteChannel;

use crate::cancel::CancellationToken;
use crate::error::{Result, SessionError};
use crate::opener::ChannelOpener;
use crate::runner::CommandRunner;

/// Sent to the remote terminal each time the channel is opened.
pub const GREETING: &[u8] = b"\r\n";

/// Sent instead of [`GREETING`] when the banner is enabled.
pub const BANNER: &[u8] = b"\r\nzterm\r\n\
Type \"zdir\" + ENTER to get list of available files\r\n\
Type \"zsend <file>\" + ENTER to request reception of a file\r\n";

/// Pause between a channel failure and the next open.
pub const DEFAULT_REOPEN_DELAY: Duration = Duration::from_millis(250);

/// Configuration for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Line buffer sizes.
    pub line: LineConfig,
    /// Greet with the usage banner instead of a bare newline.
    pub banner: bool,
    /// Pause after a channel failure before reopening. Zero reopens at once.
    pub reopen_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            line: LineConfig::default(),
            banner: false,
            reopen_delay: DEFAULT_REOPEN_DELAY,
        }
    }
}

/// How [`Session::serve`] let go of a channel.
enum Served {
    /// A command was recognized and is waiting to run.
    Command(CommandView),
    /// Shutdown or cancellation.
    Stopped,
    /// The channel failed and should be reopened.
    Failed,
}

/// Something that happened during a session, reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The channel was opened.
    Opened { channel: String },
    /// A completed line was not a command and was dropped.
    LineIgnored { len: usize },
    /// A line overflowed the buffer and was dropped.
    LineOverflow { capacity: usize },
    /// The remote side sent the shutdown keyword.
    ShutdownRequested,
    /// Cancellation was observed after a completed line.
    Cancelled,
    /// The channel failed; it is closed and reopened.
    ChannelError { message: String },
    /// The channel was closed.
    Closed,
    /// A command is about to run.
    Invoking { kind: CommandKind, command: String },
    /// A command finished with the given exit status.
    Invoked { kind: CommandKind, status: i32 },
    /// A command could not be started.
    InvokeFailed { kind: CommandKind, message: String },
}

/// Counters for a finished [`Session::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Times the channel was opened.
    pub sessions: usize,
    /// Completed lines received, commands included.
    pub lines: usize,
    /// Commands that ran to completion, whatever their exit status.
    pub commands: usize,
    /// Whether the loop ended on the shutdown keyword.
    pub shutdown_requested: bool,
}

/// The open / serve / close / invoke loop.
///
/// Each iteration opens a fresh channel and serves lines until a command is
/// recognized. The channel is closed before the command runs so the command
/// can use the device itself.
pub struct Session<O, R> {
    opener: O,
    runner: R,
    buffer: LineBuffer,
    greeting: &'static [u8],
    reopen_delay: Duration,
    cancel: CancellationToken,
}

impl<O: ChannelOpener, R: CommandRunner> Session<O, R> {
    /// Create a session. The line buffer is allocated once, here.
    pub fn new(
        config: SessionConfig,
        opener: O,
        runner: R,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let buffer = LineBuffer::new(&config.line)?;
        Ok(Self {
            opener,
            runner,
            buffer,
            greeting: if config.banner { BANNER } else { GREETING },
            reopen_delay: config.reopen_delay,
            cancel,
        })
    }

    /// The token this session stops on.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run until cancelled or the shutdown keyword arrives.
    ///
    /// Returns an error when the channel cannot be opened or the line buffer
    /// is unusable; everything else is reported through `on_event`.
    pub fn run<F>(&mut self, mut on_event: F) -> Result<SessionSummary>
    where
        F: FnMut(&SessionEvent),
    {
        let mut summary = SessionSummary::default();

        while !self.cancel.is_cancelled() {
            let channel = self.opener.open()?;
            summary.sessions += 1;
            info!(channel = %self.opener.describe(), "session opened");
            on_event(&SessionEvent::Opened {
                channel: self.opener.describe(),
            });

            let served = self.serve(channel, &mut summary, &mut on_event);
            debug!("session closed");
            on_event(&SessionEvent::Closed);

            match served? {
                Served::Command(view) => {
                    if !self.cancel.is_cancelled() {
                        self.invoke(view, &mut summary, &mut on_event);
                    }
                }
                Served::Failed => self.pause_before_reopen(),
                Served::Stopped => {}
            }
        }

        Ok(summary)
    }

    /// Serve lines on `channel` until a command is recognized or the channel
    /// has to be released. The channel is dropped on return.
    fn serve<C, F>(
        &mut self,
        channel: C,
        summary: &mut SessionSummary,
        on_event: &mut F,
    ) -> Result<Served>
    where
        C: ByteChannel,
        F: FnMut(&SessionEvent),
    {
        let mut receiver = LineReceiver::new(channel);

        if let Err(err) = write_parts(receiver.get_mut(), &[self.greeting]) {
            return channel_failed(err, on_event);
        }

        loop {
            match receiver.receive(&mut self.buffer) {
                Ok(Received::Line(len)) => {
                    summary.lines += 1;
                    if let Some(view) = classify(&mut self.buffer) {
                        return Ok(Served::Command(view));
                    }
                    debug!(len, "ignoring line");
                    on_event(&SessionEvent::LineIgnored { len });
                }
                Ok(Received::ShutdownRequested) => {
                    info!("shutdown keyword received, stopping");
                    summary.shutdown_requested = true;
                    self.cancel.cancel();
                    on_event(&SessionEvent::ShutdownRequested);
                    return Ok(Served::Stopped);
                }
                Err(LineError::Overflow { capacity }) => {
                    on_event(&SessionEvent::LineOverflow { capacity });
                }
                Err(err @ (LineError::Io(_) | LineError::ChannelClosed)) => {
                    return channel_failed(err, on_event);
                }
                Err(err) => return Err(SessionError::Line(err)),
            }

            if self.cancel.is_cancelled() {
                info!("cancelled, stopping");
                on_event(&SessionEvent::Cancelled);
                return Ok(Served::Stopped);
            }
        }
    }

    fn invoke<F>(&mut self, view: CommandView, summary: &mut SessionSummary, on_event: &mut F)
    where
        F: FnMut(&SessionEvent),
    {
        let kind = view.kind();
        let command = self.buffer.command_bytes(view);
        let shown = String::from_utf8_lossy(command).into_owned();

        info!(command = %shown, "invoking command");
        on_event(&SessionEvent::Invoking {
            kind,
            command: shown,
        });

        match self.runner.run(command) {
            Ok(status) => {
                summary.commands += 1;
                info!(command = kind.name(), status, "command finished");
                on_event(&SessionEvent::Invoked { kind, status });
            }
            Err(err) => {
                warn!(command = kind.name(), error = %err, "command failed to start");
                on_event(&SessionEvent::InvokeFailed {
                    kind,
                    message: err.to_string(),
                });
            }
        }
    }

    fn pause_before_reopen(&self) {
        if self.reopen_delay.is_zero() || self.cancel.is_cancelled() {
            return;
        }
        debug!(delay_ms = self.reopen_delay.as_millis() as u64, "waiting before reopen");
        std::thread::sleep(self.reopen_delay);
    }
}

fn channel_failed<F>(err: LineError, on_event: &mut F) -> Result<Served>
where
    F: FnMut(&SessionEvent),
{
    warn!(error = %err, "channel failed, reopening");
    on_event(&SessionEvent::ChannelError {
        message: err.to_string(),
    });
    Ok(Served::Failed)
}
