//! CSV files written by the analysis.

use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::{Reader, StringRecord, Writer};
use itertools::Itertools;

use crate::{
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts, scalar::Scalar, time::Hours},
    tradespace::{
        TradespaceError,
        capex::CapexRecord,
        confidence::{ConfidenceSummary, SummaryRow},
        metadata::ConfigKey,
        reshape::TradespacePoint,
    },
};

pub const WIDE_FILE_NAME: &str = "summary_wide.csv";
pub const CAPEX_FILE_NAME: &str = "capex_table.csv";

const POINT_COLUMNS: [&str; 8] = ["pv", "bp", "be", "bh", "gp", "gt", "duration", "confidence"];

/// Write the wide table: configuration columns, then one column per duration label.
#[instrument(skip_all, fields(path = %path.display(), n_rows = summary.len()))]
pub fn write_wide(path: &Path, summary: &ConfidenceSummary) -> Result {
    let mut writer = create(path)?;
    writer.write_record(
        ConfigKey::COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain(summary.durations.iter().map(|duration| duration.label())),
    )?;
    for row in &summary.rows {
        writer.write_record(
            row.config
                .to_record()
                .into_iter()
                .chain(row.confidences.iter().map(ToString::to_string)),
        )?;
    }
    writer.flush()?;
    info!("written");
    Ok(())
}

/// Read a wide table back, parsing the duration labels into thresholds.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_wide(path: &Path) -> Result<ConfidenceSummary> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("failed to open `{}`", path.display()))?;
    let header = reader.headers()?.clone();
    parse_wide(&header, reader.records())
        .with_context(|| format!("failed to read `{}`", path.display()))
}

fn parse_wide(
    header: &StringRecord,
    records: impl Iterator<Item = csv::Result<StringRecord>>,
) -> Result<ConfidenceSummary> {
    let n_keys = ConfigKey::COLUMNS.len();
    for (column, expected) in ConfigKey::COLUMNS.iter().enumerate() {
        let actual = header.get(column).unwrap_or_default();
        if actual != *expected {
            return Err(TradespaceError::format(0, *expected, actual, "unexpected header").into());
        }
    }
    let durations = header
        .iter()
        .skip(n_keys)
        .map(|label| {
            label.parse::<Hours>().map_err(|error| TradespaceError::format(0, label, label, error))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = ConfidenceSummary::new(durations);
    for (index, record) in records.enumerate() {
        let record = record?;
        // Header is the first line.
        let line_index = index + 1;
        let cell = |column: usize| -> Result<f64, TradespaceError> {
            let value = record.get(column).unwrap_or_default();
            value.trim().parse().map_err(|error| {
                let column = header.get(column).unwrap_or_default();
                TradespaceError::format(line_index, column, value, error)
            })
        };
        let config = ConfigKey {
            solar_scale: Scalar::from(cell(0)?),
            battery_power: Kilowatts::from(cell(1)?),
            battery_energy: KilowattHours::from(cell(2)?),
            generator_power: Kilowatts::from(cell(3)?),
            generator_tank: Scalar::from(cell(4)?),
        };
        let confidences = (n_keys..header.len()).map(cell).collect::<Result<Vec<_>, _>>()?;
        summary.rows.push(SummaryRow { config, confidences });
    }
    Ok(summary)
}

/// Write the long-form points, one file per generator power tier.
///
/// Files are named `confidence_<title>_gen<gp>.csv`. Returns the written paths in ascending
/// generator power.
#[instrument(skip_all, fields(title = %title, n_points = points.len()))]
pub fn write_per_generator(
    directory: &Path,
    title: &str,
    points: &[TradespacePoint],
) -> Result<Vec<PathBuf>> {
    let tiers = points.iter().into_group_map_by(|point| point.config.generator_power);
    tiers
        .into_iter()
        .sorted_by_key(|(generator_power, _)| *generator_power)
        .map(|(generator_power, points)| {
            let path = directory.join(format!("confidence_{title}_gen{}.csv", generator_power.0));
            let mut writer = create(&path)?;
            writer.write_record(POINT_COLUMNS)?;
            for point in points {
                writer.write_record(point_record(point))?;
            }
            writer.flush()?;
            debug!(path = %path.display(), "written");
            Ok(path)
        })
        .collect()
}

/// Write the shortlist with its capex column.
#[instrument(skip_all, fields(path = %path.display(), n_records = records.len()))]
pub fn write_capex(path: &Path, records: &[CapexRecord]) -> Result {
    let mut writer = create(path)?;
    writer.write_record(POINT_COLUMNS.into_iter().chain(["capex"]))?;
    for record in records {
        writer.write_record(
            point_record(&record.point).into_iter().chain([record.capex.0.to_string()]),
        )?;
    }
    writer.flush()?;
    info!("written");
    Ok(())
}

fn point_record(point: &TradespacePoint) -> [String; 8] {
    let [pv, bp, be, gp, gt] = point.config.to_record();
    [
        pv,
        bp,
        be,
        point.battery_hours.0.to_string(),
        gp,
        gt,
        point.duration.label(),
        point.confidence.to_string(),
    ]
}

fn create(path: &Path) -> Result<Writer<fs::File>> {
    Writer::from_path(path).with_context(|| format!("failed to create `{}`", path.display()))
}
