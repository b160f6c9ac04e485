//! Recognized line commands.
//!
//! A completed line is matched against [`COMMAND_RULES`] in order. On a
//! match the command prefix `./` is written into the header margin, so the
//! command string is assembled in place without copying the line.

use tracing::debug;

use crate::buffer::LineBuffer;
use crate::protocol::COMMAND_PREFIX;

/// The commands a remote user can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `zdir`: list the files available for transfer.
    ListFiles,
    /// `zsend <file>`: transfer a file to the remote side.
    SendFile,
}

impl CommandKind {
    /// Returns a short name for logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::ListFiles => "zdir",
            CommandKind::SendFile => "zsend",
        }
    }
}

/// How a line is recognized as a command.
#[derive(Debug, Clone, Copy)]
pub struct CommandRule {
    /// Which command this rule produces.
    pub kind: CommandKind,
    /// Case-sensitive prefix the line must start with.
    pub keyword: &'static [u8],
    /// Minimum line length for a match.
    pub min_len: usize,
    /// Cut the line back to the keyword, dropping anything typed after it.
    pub truncate: bool,
}

/// Recognized commands, first match wins.
pub const COMMAND_RULES: &[CommandRule] = &[
    CommandRule {
        kind: CommandKind::ListFiles,
        keyword: b"zdir",
        min_len: 4,
        truncate: true,
    },
    CommandRule {
        kind: CommandKind::SendFile,
        keyword: b"zsend ",
        min_len: 7,
        truncate: false,
    },
];

/// A ready-to-run command inside a [`LineBuffer`].
///
/// The view spans the prefix in the header margin and the (possibly
/// truncated) line. Resolve it with [`LineBuffer::command_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandView {
    kind: CommandKind,
    offset: usize,
    len: usize,
}

impl CommandView {
    /// The recognized command.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Absolute offset of the command in the buffer storage.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Command length in bytes, terminator excluded.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a command contains at least the prefix and keyword.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Classify the completed line in `buf`.
///
/// Returns `None` for lines that are not a recognized command; the caller
/// drops those and waits for the next line. Never touches the channel.
pub fn classify(buf: &mut LineBuffer) -> Option<CommandView> {
    let rule = COMMAND_RULES
        .iter()
        .find(|rule| buf.len() >= rule.min_len && buf.line().starts_with(rule.keyword))?;

    if rule.truncate {
        buf.truncate(rule.keyword.len());
    }
    let offset = buf.write_prefix(COMMAND_PREFIX);

    debug!(command = rule.kind.name(), len = buf.len(), "recognized command");

    Some(CommandView {
        kind: rule.kind,
        offset,
        len: COMMAND_PREFIX.len() + buf.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LineConfig;

    fn buffer_with(line: &[u8]) -> LineBuffer {
        let mut buf = LineBuffer::new(&LineConfig::default()).unwrap();
        buf.fill(line);
        buf
    }

    #[test]
    fn zdir_becomes_local_command() {
        let mut buf = buffer_with(b"zdir");
        let view = classify(&mut buf).unwrap();

        assert_eq!(view.kind(), CommandKind::ListFiles);
        assert_eq!(buf.command_bytes(view), b"./zdir");
        assert_eq!(buf.line(), b"zdir");
    }

    #[test]
    fn zdir_drops_trailing_input() {
        let mut buf = buffer_with(b"zdir -la");
        let view = classify(&mut buf).unwrap();

        assert_eq!(buf.command_bytes(view), b"./zdir");
        assert_eq!(buf.terminated_line(), b"zdir\0");
    }

    #[test]
    fn zsend_keeps_argument() {
        let mut buf = buffer_with(b"zsend report.txt");
        let view = classify(&mut buf).unwrap();

        assert_eq!(view.kind(), CommandKind::SendFile);
        assert_eq!(buf.command_bytes(view), b"./zsend report.txt");
        assert_eq!(view.len(), 18);
    }

    #[test]
    fn zsend_requires_an_argument() {
        let mut buf = buffer_with(b"zsend ");
        assert!(classify(&mut buf).is_none());

        let mut buf = buffer_with(b"zsend");
        assert!(classify(&mut buf).is_none());
    }

    #[test]
    fn zdir_after_zsend_in_same_buffer() {
        let mut buf = buffer_with(b"zsend a-much-longer-file-name.bin");
        let first = classify(&mut buf).unwrap();
        assert_eq!(
            buf.command_bytes(first),
            b"./zsend a-much-longer-file-name.bin"
        );

        buf.fill(b"zdir");
        let second = classify(&mut buf).unwrap();
        assert_eq!(buf.command_bytes(second), b"./zdir");
        assert_eq!(buf.terminated_line(), b"zdir\0");
    }

    #[test]
    fn unknown_lines_are_not_commands() {
        let lines: [&[u8]; 6] = [b"help", b"", b"zdi", b"ZDIR", b" zdir", b"zsendfile"];
        for line in lines {
            let mut buf = buffer_with(line);
            assert!(classify(&mut buf).is_none(), "{line:?} should not match");
            assert_eq!(buf.line(), line);
        }
    }

    #[test]
    fn rules_are_checked_in_order() {
        assert_eq!(COMMAND_RULES[0].kind, CommandKind::ListFiles);
        assert_eq!(COMMAND_RULES[1].kind, CommandKind::SendFile);
        for rule in COMMAND_RULES {
            assert!(rule.min_len >= rule.keyword.len());
        }
    }

    #[test]
    fn command_names() {
        assert_eq!(CommandKind::ListFiles.name(), "zdir");
        assert_eq!(CommandKind::SendFile.name(), "zsend");
    }
}
