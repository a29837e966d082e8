//! Command dispatch logic for pkg-rate

use super::{InitArgs, RateArgs, ScoreArgs, ValidateArgs, init_config, process_rate, process_score, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "pkg-rate", bin_name = "pkg-rate", version, author, long_about = None)]
#[command(about = "Rate the quality of open-source packages from their repository signals")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch repository data for packages and rate them
    Rate(Box<RateArgs>),
    /// Rate packages from repository snapshot files
    Score(Box<ScoreArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Rate(rate_args) => process_rate(host, rate_args).await,
        Command::Score(score_args) => process_score(host, score_args).await,
        Command::Init(init_args) => init_config(host, init_args),
        Command::Validate(validate_args) => validate_config(host, validate_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rate_arguments() {
        let cli = Cli::try_parse_from([
            "pkg-rate",
            "rate",
            "https://github.com/a/b",
            "https://github.com/c/d",
            "--min-net-score",
            "0.5",
            "--json",
            "out.ndjson",
        ])
        .unwrap();

        let Command::Rate(args) = cli.command else {
            unreachable!("expected the rate command");
        };
        assert_eq!(args.urls.len(), 2);
        assert_eq!(args.common.min_net_score, Some(0.5));
        assert_eq!(args.common.json.as_deref().map(camino::Utf8Path::as_str), Some("out.ndjson"));
    }

    #[test]
    fn test_rate_requires_urls() {
        assert!(Cli::try_parse_from(["pkg-rate", "rate"]).is_err());
    }

    #[test]
    fn test_score_arguments() {
        let cli = Cli::try_parse_from(["pkg-rate", "score", "a.json", "--console", "--log-level", "debug"]).unwrap();

        let Command::Score(args) = cli.command else {
            unreachable!("expected the score command");
        };
        assert_eq!(args.snapshots.len(), 1);
        assert!(args.common.console);
    }
}
