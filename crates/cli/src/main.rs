use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use knobs_tui::RunOptions;
use knobs_types::{ValueFormat, parse_commit_text};
use knobs_util::{KnobsConfig, default_log_path};
use tracing::debug;

/// Edit device parameters from the terminal.
#[derive(Parser, Debug)]
#[command(name = "knobs", version, about)]
struct Args {
    /// Parameter sheet (YAML or JSON); overrides KNOBS_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Theme id or alias, e.g. `nord`
    #[arg(long)]
    theme: Option<String>,

    /// Start with the link down
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the parameter sheet and list its parameters
    Check,
    /// Parse TEXT the way an editor does on confirm and print the JSON value
    Parse {
        /// number, number+units, bool, string or json
        #[arg(long)]
        format: String,

        #[arg(allow_hyphen_values = true)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        // No subcommand => TUI
        None => {
            init_file_tracing()?;
            let config = KnobsConfig::load(args.config.as_deref()).context("failed to load parameter sheet")?;
            let options = RunOptions {
                theme: args.theme,
                offline: args.offline,
            };
            knobs_tui::run(config, options).await
        }
        Some(Command::Check) => {
            init_tracing();
            run_check(args.config.as_deref())
        }
        Some(Command::Parse { format, text }) => {
            init_tracing();
            run_parse(&format, &text)
        }
    }
}

fn env_filter() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
}

/// Headless commands log to stderr.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The TUI owns the terminal, so logs go to a file.
fn init_file_tracing() -> Result<()> {
    let path = default_log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    debug!(path = %path.display(), "Logging to file");
    Ok(())
}

fn run_check(config_path: Option<&Path>) -> Result<()> {
    let config = KnobsConfig::load(config_path).context("failed to load parameter sheet")?;
    for line in check_lines(&config) {
        println!("{line}");
    }
    Ok(())
}

/// One aligned `key  format  current` line per parameter.
fn check_lines(config: &KnobsConfig) -> Vec<String> {
    let key_width = config.parameters.keys().map(String::len).max().unwrap_or(0);
    let format_width = ValueFormat::ALL.iter().map(|format| format.as_str().len()).max().unwrap_or(0);

    config
        .parameters
        .values()
        .map(|parameter| {
            let current = match (&parameter.value, parameter.units.as_deref().filter(|_| parameter.format.has_units())) {
                (Some(value), Some(units)) => format!("{value} {units}"),
                (Some(value), None) => value.to_string(),
                (None, _) => "unset".to_string(),
            };
            format!(
                "{:key_width$}  {:format_width$}  {current}",
                parameter.key,
                parameter.format.as_str()
            )
        })
        .collect()
}

fn run_parse(format: &str, text: &str) -> Result<()> {
    let format: ValueFormat = format.parse()?;
    let value = parse_commit_text(format, text)?;
    println!("{}", serde_json::to_string(&value.to_json())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_lines_are_aligned() {
        let lines = check_lines(&KnobsConfig::builtin());
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("sample_rate  "));
        assert!(lines[1].ends_with("44100 Hz"));
        assert!(lines[4].ends_with("unset"));
        let value_column = lines[0].find("bench-01").expect("device name value");
        assert_eq!(lines[2].find("256"), Some(value_column));
    }

    #[test]
    fn parse_rejects_unknown_format_and_bad_text() {
        assert!(run_parse("number", "42").is_ok());
        assert!(run_parse("number", "abc").is_err());
        assert!(run_parse("colour", "red").is_err());
    }

    #[test]
    fn args_accept_subcommands() {
        let args = Args::try_parse_from(["knobs", "parse", "--format", "number", "7"]).expect("valid args");
        assert!(matches!(args.command, Some(Command::Parse { .. })));
        let args = Args::try_parse_from(["knobs", "--offline", "--theme", "nord"]).expect("valid args");
        assert!(args.offline && args.command.is_none());
    }
}
