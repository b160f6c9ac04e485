use std::io::IsTerminal;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use serde::Serialize;
use zterm::session::{SessionEvent, SessionSummary};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Text
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize, Default)]
struct EventOutput<'a> {
    schema_id: &'a str,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    timestamp: String,
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    schema_id: &'a str,
    event: &'a str,
    sessions: usize,
    lines: usize,
    commands: usize,
    shutdown_requested: bool,
    timestamp: String,
}

const EVENT_SCHEMA: &str = "https://schemas.3leaps.dev/zterm/cli/v1/session-event.schema.json";

pub fn print_startup(device: &Path, format: OutputFormat) {
    tracing::debug!(?device, build_target = env!("ZTERM_BUILD_TARGET"), "starting");
    if let OutputFormat::Text = format {
        println!("Usage: zterm [tty-device]");
        println!("Default tty-device: {}", zterm::DEFAULT_DEVICE);
        println!("Press [CTRL + C] to quit");
        println!();
    }
}

pub fn print_event(event: &SessionEvent, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            if let Some(line) = event_text(event) {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            println!("{}", event_json(event));
        }
    }
}

pub fn print_summary(summary: &SessionSummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!(
                "sessions={} lines={} commands={}",
                summary.sessions, summary.lines, summary.commands
            );
        }
        OutputFormat::Json => {
            let out = SummaryOutput {
                schema_id: EVENT_SCHEMA,
                event: "summary",
                sessions: summary.sessions,
                lines: summary.lines,
                commands: summary.commands,
                shutdown_requested: summary.shutdown_requested,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}

/// Human-readable line for an event; quiet events return `None`.
fn event_text(event: &SessionEvent) -> Option<String> {
    let text = match event {
        SessionEvent::Opened { channel } => format!("Operating serial device {channel}"),
        SessionEvent::ShutdownRequested => "Quit program due to \"CLIENT\" request".to_string(),
        SessionEvent::Cancelled => "Interrupted, quitting".to_string(),
        SessionEvent::ChannelError { message } => format!("Channel error: {message}"),
        SessionEvent::Invoking { command, .. } => format!("Calling {command}"),
        SessionEvent::Invoked { status, .. } => format!("Exit status={status}"),
        SessionEvent::InvokeFailed { message, .. } => format!("Failed to call: {message}"),
        SessionEvent::LineIgnored { .. }
        | SessionEvent::LineOverflow { .. }
        | SessionEvent::Closed => return None,
    };
    Some(text)
}

fn event_json(event: &SessionEvent) -> String {
    let mut out = EventOutput {
        schema_id: EVENT_SCHEMA,
        timestamp: now_unix_seconds(),
        ..EventOutput::default()
    };

    match event {
        SessionEvent::Opened { channel } => {
            out.event = "opened";
            out.channel = Some(channel.as_str());
        }
        SessionEvent::LineIgnored { len } => {
            out.event = "line_ignored";
            out.len = Some(*len);
        }
        SessionEvent::LineOverflow { capacity } => {
            out.event = "line_overflow";
            out.len = Some(*capacity);
        }
        SessionEvent::ShutdownRequested => out.event = "shutdown_requested",
        SessionEvent::Cancelled => out.event = "cancelled",
        SessionEvent::ChannelError { message } => {
            out.event = "channel_error";
            out.message = Some(message.as_str());
        }
        SessionEvent::Closed => out.event = "closed",
        SessionEvent::Invoking { command, .. } => {
            out.event = "invoking";
            out.command = Some(command.as_str());
        }
        SessionEvent::Invoked { kind, status } => {
            out.event = "invoked";
            out.command = Some(kind.name());
            out.status = Some(*status);
        }
        SessionEvent::InvokeFailed { kind, message } => {
            out.event = "invoke_failed";
            out.command = Some(kind.name());
            out.message = Some(message.as_str());
        }
    }

    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use zterm::line::CommandKind;

    use super::*;

    fn parse(event: &SessionEvent) -> serde_json::Value {
        serde_json::from_str(&event_json(event)).expect("event json should parse")
    }

    #[test]
    fn invoking_event_as_json() {
        let value = parse(&SessionEvent::Invoking {
            kind: CommandKind::SendFile,
            command: "./zsend a.txt".to_string(),
        });

        assert_eq!(value["event"], "invoking");
        assert_eq!(value["command"], "./zsend a.txt");
        assert!(value.get("status").is_none());
        assert_eq!(value["schema_id"], EVENT_SCHEMA);
    }

    #[test]
    fn invoked_event_carries_status() {
        let value = parse(&SessionEvent::Invoked {
            kind: CommandKind::ListFiles,
            status: 3,
        });

        assert_eq!(value["event"], "invoked");
        assert_eq!(value["command"], "zdir");
        assert_eq!(value["status"], 3);
    }

    #[test]
    fn quiet_events_have_no_text() {
        assert!(event_text(&SessionEvent::Closed).is_none());
        assert!(event_text(&SessionEvent::LineIgnored { len: 2 }).is_none());
        assert_eq!(
            event_text(&SessionEvent::Invoking {
                kind: CommandKind::ListFiles,
                command: "./zdir".to_string(),
            })
            .as_deref(),
            Some("Calling ./zdir")
        );
    }
}
