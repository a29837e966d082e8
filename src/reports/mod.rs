//! Report generation for rating results
//!
//! Two report generators are provided, each accessed through a `generate` function:
//! - **Console**: Human-readable terminal output with optional ANSI colors
//! - **JSON**: One line per rated package carrying the package URL followed by the score card
//!   fields, suitable for consumption by a registry pipeline
//!
//! Both generators operate on the same input, a slice of [`RatedPackage`]. Packages whose
//! dataset was unusable have no score card; the console report lists them as unrated and the
//! JSON report leaves them out.

mod console;
mod json;
mod rated_package;

pub use console::generate as generate_console;
pub use json::generate as generate_json;
pub use rated_package::RatedPackage;
