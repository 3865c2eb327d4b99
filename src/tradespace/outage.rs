//! Per-outage event table of a resilience file.

use std::{collections::HashSet, str::FromStr};

use chrono::NaiveDateTime;
use csv::StringRecord;

use crate::{
    prelude::*,
    quantity::time::Hours,
    tradespace::{
        TradespaceError,
        metadata::{ConfigKey, ConfigParams},
    },
};

/// First cell of the event table header row.
pub const OUTAGE_MARKER: &str = "Outage";

/// Header row index assumed when the file has no [`OUTAGE_MARKER`] row.
pub const FALLBACK_HEADER_INDEX: usize = 60;

/// Data rows start this many rows below the header, past the units row.
const DATA_OFFSET: usize = 2;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where the event table header was taken from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeaderRow {
    /// Index of the last row starting with [`OUTAGE_MARKER`].
    Found(usize),

    /// No marker row, [`FALLBACK_HEADER_INDEX`] was used. Results are suspect.
    Fallback,
}

impl HeaderRow {
    pub fn locate(rows: &[StringRecord]) -> Self {
        rows.iter()
            .rposition(|row| row.get(0) == Some(OUTAGE_MARKER))
            .map_or(Self::Fallback, Self::Found)
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Found(index) => index,
            Self::Fallback => FALLBACK_HEADER_INDEX,
        }
    }

    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// One simulated outage.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutageRecord {
    pub outage: i64,
    pub start: NaiveDateTime,

    /// Time to first failure to meet the load.
    pub ttff: Hours,

    /// Cumulative outage time.
    pub cot: Hours,
}

impl OutageRecord {
    /// Parse a four-cell data row, `index` is the row position in the file.
    fn try_from_row(index: usize, row: &StringRecord) -> Result<Self, TradespaceError> {
        let cell = move |position: usize| row.get(position).unwrap_or_default().trim();
        let start = NaiveDateTime::parse_from_str(cell(1), TIMESTAMP_FORMAT)
            .map_err(|error| TradespaceError::format(index, "outage_start", cell(1), error))?;
        Ok(Self {
            outage: parse_cell(index, "outage", cell(0))?,
            start,
            ttff: parse_duration(index, "ttff", cell(2))?,
            cot: parse_duration(index, "cot", cell(3))?,
        })
    }
}

fn parse_cell<T: FromStr>(index: usize, column: &str, value: &str) -> Result<T, TradespaceError>
where
    T::Err: ToString,
{
    value.parse().map_err(|error| TradespaceError::format(index, column, value, error))
}

fn parse_duration(index: usize, column: &str, value: &str) -> Result<Hours, TradespaceError> {
    let duration: Hours = parse_cell(index, column, value)?;
    if duration.is_negative() || duration.0.is_nan() {
        return Err(TradespaceError::format(index, column, value, "must be non-negative"));
    }
    Ok(duration)
}

/// Whether the row would pass for an event table data row.
fn looks_like_data(row: &StringRecord) -> bool {
    row.len() == 4 && row.get(0).is_some_and(|cell| cell.trim().parse::<i64>().is_ok())
}

/// Outage record with the configuration broadcast as constant columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutageRow {
    pub record: OutageRecord,
    pub config: ConfigKey,
}

/// All outages simulated for one configuration.
#[must_use]
#[derive(Clone, Debug)]
pub struct OutageDataset {
    pub params: ConfigParams,
    pub rows: Vec<OutageRow>,
    pub header: HeaderRow,

    /// Rows below the header that did not have exactly four cells.
    pub n_skipped_rows: usize,
}

impl OutageDataset {
    /// Parse the event table out of the full row sequence of a file.
    ///
    /// Rows that do not have exactly four cells are skipped and counted. Every other row must
    /// parse, and outage ids must be unique.
    #[instrument(skip_all, fields(config = ?params.key))]
    pub fn load(rows: &[StringRecord], params: ConfigParams) -> Result<Self, TradespaceError> {
        let header = HeaderRow::locate(rows);
        if header.is_fallback() {
            warn!(
                index = FALLBACK_HEADER_INDEX,
                "no `{OUTAGE_MARKER}` header row, falling back to the default position",
            );
        }

        let units_index = header.index() + 1;
        if let Some(units) = rows.get(units_index)
            && looks_like_data(units)
        {
            return Err(TradespaceError::format(
                units_index,
                "outage",
                units.get(0).unwrap_or_default(),
                "expected a units or blank row below the header, found a data row",
            ));
        }

        let mut n_skipped_rows = 0;
        let mut seen = HashSet::new();
        let mut outage_rows = Vec::new();
        for (index, row) in rows.iter().enumerate().skip(header.index() + DATA_OFFSET) {
            if row.len() != 4 {
                trace!(index, n_cells = row.len(), "skipping");
                n_skipped_rows += 1;
                continue;
            }
            let record = OutageRecord::try_from_row(index, row)?;
            if !seen.insert(record.outage) {
                return Err(TradespaceError::DataIntegrity(format!(
                    "line {}: duplicate outage id {}",
                    index + 1,
                    record.outage,
                )));
            }
            outage_rows.push(OutageRow { record, config: params.key });
        }

        if n_skipped_rows != 0 {
            warn!(n_skipped_rows, "skipped rows without exactly four cells");
        }
        debug!(n_outages = outage_rows.len(), "loaded");
        Ok(Self { params, rows: outage_rows, header, n_skipped_rows })
    }
}
