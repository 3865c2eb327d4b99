use std::fmt::Display;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::tradespace::{
    assembler::Failure,
    capex::CapexRecord,
    confidence::ConfidenceSummary,
    reshape::SuccessCriterion,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn confidence_color(confidence: f64, threshold: f64) -> Color {
    if confidence >= threshold {
        Color::Green
    } else if confidence > 0.0 {
        Color::DarkYellow
    } else {
        Color::Red
    }
}

#[must_use]
pub fn build_summary_table(summary: &ConfidenceSummary, criterion: SuccessCriterion) -> Table {
    let mut table = new_table();
    table.set_header(
        ["PV", "Battery", "Energy", "Generator", "Tank"]
            .into_iter()
            .map(Cell::new)
            .chain(summary.durations.iter().map(|duration| {
                let cell = Cell::new(duration);
                if *duration == criterion.duration {
                    cell.add_attribute(Attribute::Bold)
                } else {
                    cell
                }
            })),
    );
    for row in &summary.rows {
        table.add_row(
            [
                Cell::new(row.config.solar_scale),
                Cell::new(row.config.battery_power).add_attribute(Attribute::Dim),
                Cell::new(row.config.battery_energy),
                Cell::new(row.config.generator_power).add_attribute(Attribute::Dim),
                Cell::new(row.config.generator_tank).add_attribute(Attribute::Dim),
            ]
            .into_iter()
            .chain(row.confidences.iter().map(|confidence| {
                Cell::new(format!("{confidence:.3}"))
                    .set_alignment(CellAlignment::Right)
                    .fg(confidence_color(*confidence, criterion.confidence))
            })),
        );
    }
    table
}

#[must_use]
pub fn build_shortlist_table(records: &[CapexRecord]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "PV", "Battery", "Energy", "Hours", "Generator", "Tank", "Confidence", "Capex",
    ]);
    for record in records {
        let config = record.point.config;
        table.add_row(vec![
            Cell::new(config.solar_scale).add_attribute(Attribute::Bold),
            Cell::new(config.battery_power).set_alignment(CellAlignment::Right),
            Cell::new(config.battery_energy).set_alignment(CellAlignment::Right),
            Cell::new(record.point.battery_hours)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(config.generator_power).set_alignment(CellAlignment::Right),
            Cell::new(config.generator_tank).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.3}", record.point.confidence)).set_alignment(CellAlignment::Right),
            Cell::new(record.capex).set_alignment(CellAlignment::Right).fg(Color::Cyan),
        ]);
    }
    table
}

#[must_use]
pub fn build_failures_table<Id: Display>(failures: &[Failure<Id>]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["File", "Reason"]);
    for failure in failures {
        table.add_row(vec![
            Cell::new(&failure.id),
            Cell::new(format!("{:#}", failure.error)).fg(Color::Red),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        prelude::*,
        quantity::time::Hours,
        tradespace::{capex::estimate, capex::tests::cost_model, reshape::tests::summary},
    };

    fn criterion() -> SuccessCriterion {
        SuccessCriterion::builder().duration(Hours::from(504.0)).confidence(0.5).build()
    }

    #[test]
    fn test_summary_table() {
        let table = build_summary_table(&summary(), criterion());
        assert_eq!(table.row_count(), 3);
        assert!(table.to_string().contains("504 h"));
    }

    #[test]
    fn test_shortlist_table() -> Result {
        let records = estimate(&summary().melt()?, Hours::from(504.0), &cost_model())?;
        let table = build_shortlist_table(&records);
        assert_eq!(table.row_count(), 3);
        Ok(())
    }

    #[test]
    fn test_failures_table() {
        let failures =
            vec![Failure { id: "a_resilience.csv", error: anyhow::anyhow!("no outages") }];
        let rendered = build_failures_table(&failures).to_string();
        assert!(rendered.contains("a_resilience.csv"));
        assert!(rendered.contains("no outages"));
    }
}
