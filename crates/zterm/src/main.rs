mod exit;
mod logging;
mod output;
mod serve;

use clap::Parser;

use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;
use crate::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(
    name = "zterm",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ZTERM_BUILD_TARGET"), ")"),
    about = "Line terminal on a serial device"
)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    /// Report format (stdout).
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", env = "ZTERM_LOG_LEVEL")]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = serve::run(cli.serve, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn device_defaults_when_omitted() {
        let cli = Cli::try_parse_from(["zterm"]).expect("no args should parse");
        assert_eq!(cli.serve.device, Path::new(zterm::DEFAULT_DEVICE));
        assert_eq!(cli.serve.baud, zterm::transport::DEFAULT_BAUD_RATE);
        assert_eq!(cli.serve.max_line, zterm::line::DEFAULT_MAX_LINE_LEN);
        assert!(!cli.serve.banner);
        assert_eq!(
            cli.serve.reopen_delay_ms,
            zterm::session::DEFAULT_REOPEN_DELAY.as_millis() as u64
        );
    }

    #[test]
    fn parses_device_and_options() {
        let cli = Cli::try_parse_from([
            "zterm",
            "/dev/ttyS1",
            "--baud",
            "57600",
            "--max-line",
            "64",
            "--banner",
            "--workdir",
            "/srv/files",
            "--reopen-delay-ms",
            "0",
            "--format",
            "json",
        ])
        .expect("full args should parse");

        assert_eq!(cli.serve.device, Path::new("/dev/ttyS1"));
        assert_eq!(cli.serve.baud, 57_600);
        assert_eq!(cli.serve.max_line, 64);
        assert!(cli.serve.banner);
        assert_eq!(cli.serve.workdir.as_deref(), Some(Path::new("/srv/files")));
        assert_eq!(cli.serve.reopen_delay_ms, 0);
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }

    #[test]
    fn rejects_unsupported_baud() {
        let err = Cli::try_parse_from(["zterm", "--baud", "14400"])
            .expect_err("unsupported baud should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_second_device() {
        let err = Cli::try_parse_from(["zterm", "/dev/a", "/dev/b"])
            .expect_err("two devices should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
