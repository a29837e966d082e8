//! Common processing logic shared between the rate and score commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::engine::{Dispatcher, Rater, ScoreCard};
use crate::reports::{RatedPackage, generate_console, generate_json};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use ohno::{IntoAppError, bail};
use std::fs;
use std::io::Write;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Common arguments shared between the rate and score commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file (default is `pkg-rate.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// Output score cards to a file, one JSON object per line
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Output score cards to the console. If omitted, console output is shown only when no other report is generated.
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,

    /// Exit with an error if any package could not be rated or its net score is below this threshold
    #[arg(long, value_name = "SCORE")]
    pub min_net_score: Option<f64>,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    host: &'a mut H,
    color: ColorMode,
    console: bool,
    json: Option<Utf8PathBuf>,
    min_net_score: Option<f64>,
}

impl<'a, H: Host> Common<'a, H> {
    /// Create a new Common processor with logger and config
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or the arguments are out of range
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        if let Some(min) = args.min_net_score
            && !(0.0..=1.0).contains(&min)
        {
            bail!("--min-net-score must be between 0 and 1, got {min}");
        }

        let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;

        Ok(Self {
            config,
            host,
            color: args.color,
            console: args.console,
            json: args.json.clone(),
            min_net_score: args.min_net_score,
        })
    }

    /// A rater running the standard metrics as configured
    #[must_use]
    pub fn rater(&self) -> Rater {
        let dispatcher = Dispatcher::new(self.config.metrics.clone(), self.config.task_timeout());
        Rater::new(dispatcher, self.config.weights.clone())
    }

    /// Emit every requested report and apply the net score gate
    ///
    /// Each rating is the package's URL together with its score card, or the reason no score
    /// card could be produced.
    pub fn report(&mut self, ratings: Vec<(String, Result<ScoreCard>)>) -> Result<()> {
        let failed = ratings.iter().filter(|(_, rating)| rating.is_err()).count();
        if failed > 0 {
            let _ = writeln!(self.host.error(), "\nUnable to rate {failed} package(s)");
            for (url, rating) in &ratings {
                if let Err(e) = rating {
                    let _ = writeln!(self.host.error(), "  Could not rate '{url}': {e:#}");
                }
            }
        }

        let packages: Vec<_> = ratings
            .into_iter()
            .map(|(url, rating)| RatedPackage::new(url, rating.ok()))
            .collect();

        // Show console output if it was asked for, or if no other report is being generated
        if self.console || self.json.is_none() {
            let mut console_output = String::new();
            let use_colors = match self.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => {
                    use std::io::{IsTerminal, stdout};
                    stdout().is_terminal()
                }
            };
            generate_console(&packages, use_colors, &mut console_output)?;
            let _ = write!(self.host.output(), "{console_output}");
        }

        if let Some(filename) = &self.json {
            let mut json_output = String::new();
            generate_json(&packages, &mut json_output)?;
            fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
        }

        if let Some(min) = self.min_net_score {
            let rejected = packages.iter().filter(|package| !package.passes(min)).count();
            if rejected > 0 {
                bail!("{rejected} package(s) could not be rated or scored below {min}");
            }
        }

        Ok(())
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
