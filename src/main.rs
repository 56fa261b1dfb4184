use std::sync::Mutex;

use clap::Parser;
use plotline::cli::commands::Cli;
use plotline::cli::handlers;
use tracing_subscriber::{EnvFilter, fmt};

/// Log file for TUI sessions, created in the system temp directory.
const TUI_LOG_FILE: &str = "plotline.log";

/// Where log output goes for one invocation.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    /// The TUI owns the terminal, so its logs go to a file
    File,
}

fn main() {
    let cli = Cli::parse();

    if let Some(target) = log_target(cli.command.is_some(), cli.verbose) {
        init_logging(cli.verbose, target);
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn log_target(has_command: bool, verbose: u8) -> Option<LogTarget> {
    match (has_command, verbose) {
        (true, _) => Some(LogTarget::Stderr),
        (false, 0) => None,
        (false, _) => Some(LogTarget::File),
    }
}

fn init_logging(verbose: u8, target: LogTarget) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plotline={}", default_level)));
    let builder = fmt().with_env_filter(filter).with_target(false);

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File => {
            let path = std::env::temp_dir().join(TUI_LOG_FILE);
            match std::fs::File::create(&path) {
                Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
                Err(e) => eprintln!("warning: no log file at {}: {}", path.display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target() {
        assert_eq!(log_target(true, 0), Some(LogTarget::Stderr));
        assert_eq!(log_target(true, 2), Some(LogTarget::Stderr));
        assert_eq!(log_target(false, 0), None);
        assert_eq!(log_target(false, 1), Some(LogTarget::File));
    }
}
