//! Command-line interface and orchestration for pkg-rate
//!
//! This module implements the CLI commands and wires the other modules together to rate
//! packages end to end. It handles argument parsing, configuration management, and the
//! high-level workflows.
//!
//! # Commands
//!
//! - **rate**: Fetch repository data for packages given by URL, rate them, and report
//! - **score**: Rate packages from repository snapshot files, without network access
//! - **init**: Generate a default configuration file
//! - **validate**: Check configuration file syntax and value ranges
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the appropriate
//! command handler. The rate and score commands follow the same pattern:
//!
//! 1. Parse arguments, initialize logging, and load configuration
//! 2. Obtain a repository dataset per package
//! 3. Rate each dataset with the metric engine
//! 4. Generate reports and apply the optional net score gate
//!
//! Configuration is managed through a TOML file holding the metric weights, the metric
//! tunables, and the per-metric time limit.

mod common;
mod config;
mod host;
mod init;
mod rate;
mod run;
mod score;
mod validate;

pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use rate::{RateArgs, process_rate, rate_all};
pub use run::run;
pub use score::{ScoreArgs, process_score};
pub use validate::{ValidateArgs, validate_config};
