//! Confidence of survival per duration threshold.

use itertools::Itertools;

use crate::{
    prelude::*,
    quantity::time::Hours,
    tradespace::{TradespaceError, metadata::ConfigKey, outage::OutageDataset},
};

/// One row of the wide confidence table.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub config: ConfigKey,

    /// Aligned with the table durations, each in `[0, 1]`.
    pub confidences: Vec<f64>,
}

/// Wide table: one row per configuration, one confidence column per duration threshold.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfidenceSummary {
    pub durations: Vec<Hours>,
    pub rows: Vec<SummaryRow>,
}

impl ConfidenceSummary {
    pub const fn new(durations: Vec<Hours>) -> Self {
        Self { durations, rows: Vec::new() }
    }

    /// Position of the confidence column for exactly this duration.
    pub fn column(&self, duration: Hours) -> Option<usize> {
        self.durations.iter().position(|candidate| *candidate == duration)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl OutageDataset {
    /// Fraction of the outages with `ttff ≥ d`, for every threshold `d` in order.
    pub fn confidences(&self, durations: &[Hours]) -> Result<Vec<f64>, TradespaceError> {
        if self.rows.is_empty() {
            return Err(TradespaceError::Division(
                "confidence of a configuration without outages".to_string(),
            ));
        }
        #[expect(clippy::cast_precision_loss)]
        let n_outages = self.rows.len() as f64;
        Ok(durations
            .iter()
            .map(|duration| {
                let n_survived =
                    self.rows.iter().filter(|row| row.record.ttff >= *duration).count();
                #[expect(clippy::cast_precision_loss)]
                let n_survived = n_survived as f64;
                n_survived / n_outages
            })
            .collect())
    }

    /// Collapse the dataset into its single summary row.
    ///
    /// The per-outage columns are dropped, and the remaining constant columns must deduplicate
    /// into exactly one row.
    #[instrument(skip_all, fields(config = ?self.params.key, n_outages = self.rows.len()))]
    pub fn summarize(&self, durations: &[Hours]) -> Result<SummaryRow, TradespaceError> {
        let confidences = self.confidences(durations)?;
        let configs = self.rows.iter().map(|row| row.config).unique().collect_vec();
        match configs.as_slice() {
            [config] => {
                debug!(?confidences, "summarized");
                Ok(SummaryRow { config: *config, confidences })
            }
            _ => Err(TradespaceError::DataIntegrity(format!(
                "{} distinct configurations within one dataset: {configs:?}",
                configs.len(),
            ))),
        }
    }
}
