use super::RatedPackage;
use crate::Result;
use crate::metrics::{MetricOutcome, definition};
use core::fmt::Write;
use owo_colors::OwoColorize;

const NET_SCORE_LABEL: &str = "NetScore";

pub fn generate<W: Write>(packages: &[RatedPackage], use_colors: bool, writer: &mut W) -> Result<()> {
    for (index, package) in packages.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
            writeln!(writer, "═══════════════════════════════════════")?;
            writeln!(writer)?;
        }

        let Some(card) = &package.card else {
            let status = "could not be rated";
            if use_colors {
                writeln!(writer, "{} {}", package.url, status.red().bold())?;
            } else {
                writeln!(writer, "{} {status}", package.url)?;
            }
            continue;
        };

        writeln!(writer, "{} is rated {}", package.url, format_score(card.net(), use_colors))?;
        writeln!(writer)?;

        let max_name_len = card
            .metrics()
            .map(|(kind, _)| kind.field().len())
            .chain(core::iter::once(NET_SCORE_LABEL.len()))
            .max()
            .unwrap_or(0);

        for (kind, outcome) in card.metrics() {
            let description = definition(kind).map_or("", |def| def.description);
            writeln!(
                writer,
                "  {:<width$} : {} in {:.3}s  {}",
                kind.field(),
                format_score(outcome, use_colors),
                outcome.latency_secs(),
                if use_colors { description.dimmed().to_string() } else { description.to_string() },
                width = max_name_len
            )?;
        }

        let net_label = if use_colors {
            format!("{:<width$}", NET_SCORE_LABEL, width = max_name_len).bold().to_string()
        } else {
            format!("{NET_SCORE_LABEL:<max_name_len$}")
        };
        writeln!(writer, "  {net_label} : {} in {:.3}s", format_score(card.net(), use_colors), card.net().latency_secs())?;
    }

    Ok(())
}

fn format_score(outcome: MetricOutcome, use_colors: bool) -> String {
    let Some(score) = outcome.score() else {
        let text = "  n/a";
        return if use_colors { text.red().to_string() } else { text.to_string() };
    };

    let text = format!("{score:.3}");
    if !use_colors {
        return text;
    }

    if score >= 0.7 {
        text.green().to_string()
    } else if score >= 0.4 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}
