use super::RatedPackage;
use crate::Result;
use core::fmt::Write;
use serde_json::{Map, Value, json};

/// Write one JSON object per rated package, one per line.
///
/// Each object starts with the package `URL` followed by the sixteen score card fields.
/// Packages without a score card are skipped.
#[expect(unused_results, reason = "Map::insert intentionally overwrites values")]
pub fn generate<W: Write>(packages: &[RatedPackage], writer: &mut W) -> Result<()> {
    for package in packages {
        let Some(card) = &package.card else {
            continue;
        };

        let mut line = Map::new();
        line.insert("URL".to_string(), json!(package.url));

        if let Value::Object(fields) = serde_json::to_value(card)? {
            line.extend(fields);
        }

        writeln!(writer, "{}", serde_json::to_string(&line)?)?;
    }

    Ok(())
}
