use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use zterm::line::{LineConfig, DEFAULT_HEADER_MARGIN, DEFAULT_MAX_LINE_LEN};
use zterm::session::{
    CancellationToken, SerialOpener, Session, SessionConfig, ShellRunner, DEFAULT_REOPEN_DELAY,
};
use zterm::transport::{SerialConfig, DEFAULT_BAUD_RATE, SUPPORTED_BAUD_RATES};

use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::{print_event, print_startup, print_summary, OutputFormat};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Serial device to operate.
    #[arg(value_name = "DEVICE", default_value = zterm::DEFAULT_DEVICE, env = "ZTERM_DEVICE")]
    pub device: PathBuf,
    /// Line speed in bits per second.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE, env = "ZTERM_BAUD", value_parser = parse_baud)]
    pub baud: u32,
    /// Maximum line length in bytes, terminator slot included.
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LEN, env = "ZTERM_MAX_LINE", value_parser = parse_max_line)]
    pub max_line: usize,
    /// Greet the remote terminal with usage instructions.
    #[arg(long)]
    pub banner: bool,
    /// Directory the zdir and zsend helpers are run from.
    #[arg(long, value_name = "DIR", env = "ZTERM_WORKDIR")]
    pub workdir: Option<PathBuf>,
    /// Milliseconds to wait before reopening a failed device.
    #[arg(
        long,
        value_name = "MS",
        default_value_t = DEFAULT_REOPEN_DELAY.as_millis() as u64,
        env = "ZTERM_REOPEN_DELAY_MS"
    )]
    pub reopen_delay_ms: u64,
}

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    print_startup(&args.device, format);

    let cancel = CancellationToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let opener = SerialOpener::new(
        &args.device,
        SerialConfig {
            baud_rate: args.baud,
        },
    );
    let runner = match &args.workdir {
        Some(dir) => ShellRunner::new().with_working_dir(dir),
        None => ShellRunner::new(),
    };
    let config = SessionConfig {
        line: LineConfig {
            max_line_len: args.max_line,
            header_margin: DEFAULT_HEADER_MARGIN,
        },
        banner: args.banner,
        reopen_delay: Duration::from_millis(args.reopen_delay_ms),
    };

    let mut session = Session::new(config, opener, runner, cancel)
        .map_err(|err| session_error("session setup failed", err))?;
    let summary = session
        .run(|event| print_event(event, format))
        .map_err(|err| session_error("session failed", err))?;

    print_summary(&summary, format);
    Ok(SUCCESS)
}

fn install_ctrlc_handler(cancel: CancellationToken) -> CliResult<()> {
    ctrlc::set_handler(move || {
        cancel.cancel();
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

fn parse_baud(value: &str) -> Result<u32, String> {
    let rate: u32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if SUPPORTED_BAUD_RATES.contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("supported rates: {SUPPORTED_BAUD_RATES:?}"))
    }
}

fn parse_max_line(value: &str) -> Result<usize, String> {
    let len: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if len == 0 {
        return Err("must hold at least the terminator (1)".to_string());
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baud_must_be_supported() {
        assert_eq!(parse_baud("115200"), Ok(115_200));
        assert_eq!(parse_baud("9600"), Ok(9_600));
        assert!(parse_baud("14400").is_err());
        assert!(parse_baud("fast").is_err());
    }

    #[test]
    fn max_line_must_be_positive() {
        assert_eq!(parse_max_line("128"), Ok(128));
        assert_eq!(parse_max_line("1"), Ok(1));
        assert!(parse_max_line("0").is_err());
        assert!(parse_max_line("-1").is_err());
    }
}
