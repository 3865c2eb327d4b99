//! Wide ↔ long conversion of the confidence table.

use bon::Builder;
use itertools::Itertools;

use crate::{
    prelude::*,
    quantity::time::Hours,
    tradespace::{
        TradespaceError,
        confidence::{ConfidenceSummary, SummaryRow},
        metadata::ConfigKey,
    },
};

/// Minimal confidence required at a reference duration.
#[derive(Copy, Clone, Debug, Builder)]
pub struct SuccessCriterion {
    pub duration: Hours,
    pub confidence: f64,
}

/// One configuration at one duration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TradespacePoint {
    pub config: ConfigKey,

    /// Battery hours derived as energy over power.
    pub battery_hours: Hours,

    pub duration: Hours,
    pub confidence: f64,
}

impl ConfidenceSummary {
    /// Keep the configurations meeting the criterion, with all their durations.
    #[instrument(skip_all, fields(duration = ?criterion.duration, confidence = criterion.confidence))]
    pub fn retain_successful(&self, criterion: SuccessCriterion) -> Result<Self, TradespaceError> {
        let column = self.column(criterion.duration).ok_or_else(|| {
            TradespaceError::InvalidInput(format!(
                "reference duration {} is not among the thresholds {:?}",
                criterion.duration, self.durations,
            ))
        })?;
        let rows = self
            .rows
            .iter()
            .filter(|row| row.confidences[column] >= criterion.confidence)
            .cloned()
            .collect_vec();
        info!(n_retained = rows.len(), n_total = self.rows.len(), "filtered");
        Ok(Self { durations: self.durations.clone(), rows })
    }

    /// Unpivot into one point per configuration and duration, duration-major.
    pub fn melt(&self) -> Result<Vec<TradespacePoint>, TradespaceError> {
        let battery_hours = self
            .rows
            .iter()
            .map(|row| battery_hours(&row.config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self
            .durations
            .iter()
            .enumerate()
            .flat_map(|(column, duration)| {
                self.rows.iter().zip(&battery_hours).map(move |(row, battery_hours)| {
                    TradespacePoint {
                        config: row.config,
                        battery_hours: *battery_hours,
                        duration: *duration,
                        confidence: row.confidences[column],
                    }
                })
            })
            .collect())
    }

    /// Melt, optionally keeping only the configurations that meet the criterion.
    pub fn to_long(
        &self,
        criterion: Option<SuccessCriterion>,
    ) -> Result<Vec<TradespacePoint>, TradespaceError> {
        match criterion {
            Some(criterion) => self.retain_successful(criterion)?.melt(),
            None => self.melt(),
        }
    }

    /// Pivot long-form points back into the wide table.
    ///
    /// Durations and configurations keep the order of their first appearance.
    pub fn pivot(points: &[TradespacePoint]) -> Result<Self, TradespaceError> {
        let durations = points.iter().map(|point| point.duration).unique().collect_vec();
        let configs = points.iter().map(|point| point.config).unique().collect_vec();
        let cells = points.iter().into_group_map_by(|point| (point.config, point.duration));

        let rows = configs
            .into_iter()
            .map(|config| -> Result<SummaryRow, TradespaceError> {
                let confidences = durations
                    .iter()
                    .map(|duration| match cells.get(&(config, *duration)).map(Vec::as_slice) {
                        Some([point]) => Ok(point.confidence),
                        Some(points) => Err(TradespaceError::DataIntegrity(format!(
                            "{} points for {config:?} at {duration}",
                            points.len(),
                        ))),
                        None => Err(TradespaceError::DataIntegrity(format!(
                            "no point for {config:?} at {duration}",
                        ))),
                    })
                    .collect::<Result<_, _>>()?;
                Ok(SummaryRow { config, confidences })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { durations, rows })
    }
}

fn battery_hours(config: &ConfigKey) -> Result<Hours, TradespaceError> {
    if config.battery_power.is_zero() {
        return Err(TradespaceError::Division(format!(
            "battery hours of {config:?} with zero battery power",
        )));
    }
    Ok(config.battery_energy / config.battery_power)
}
