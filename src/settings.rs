use std::{fs, path::Path};

use itertools::Itertools;
use serde::Deserialize;

use crate::{
    prelude::*,
    quantity::time::Hours,
    tradespace::{capex::CostModel, reshape::SuccessCriterion},
};

/// Analysis parameters, read from a TOML file.
#[must_use]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Duration thresholds of the confidence curves.
    pub durations: Durations,

    /// Duration at which success is judged and capex is reported.
    #[serde(rename = "reference_duration_hours")]
    pub reference_duration: Hours,

    /// Minimal confidence at the reference duration.
    pub confidence_threshold: f64,

    /// Number of cheapest configurations kept per solar tier.
    pub top_k: usize,

    pub cost: CostModel,
}

/// Either an explicit list of hours, or inclusive linear spacing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Durations {
    Explicit(Vec<Hours>),
    Linear { start: Hours, end: Hours, count: usize },
}

impl Durations {
    pub fn hours(&self) -> Vec<Hours> {
        match self {
            Self::Explicit(hours) => hours.clone(),
            Self::Linear { count: 0, .. } => Vec::new(),
            Self::Linear { start, count: 1, .. } => vec![*start],
            Self::Linear { start, end, count } => {
                #[expect(clippy::cast_precision_loss)]
                let step = (*end - *start) / (*count - 1) as f64;
                // Pinned to exactly `end`, stepping may land short by a rounding error.
                (0..*count - 1)
                    .map(|i| {
                        #[expect(clippy::cast_precision_loss)]
                        let i = i as f64;
                        *start + step * i
                    })
                    .chain([*end])
                    .collect()
            }
        }
    }
}

impl Settings {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read the settings from `{}`", path.display()))?;
        let this: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse the settings from `{}`", path.display()))?;
        this.validate()?;
        Ok(this)
    }

    fn validate(&self) -> Result {
        let durations = self.durations.hours();
        ensure!(!durations.is_empty(), "at least one duration threshold is required");
        ensure!(
            durations.iter().all(|duration| !duration.is_negative()),
            "duration thresholds must be non-negative: {durations:?}",
        );
        if !durations.iter().tuple_windows().all(|(lhs, rhs)| lhs < rhs) {
            warn!(?durations, "duration thresholds are not strictly increasing");
        }
        ensure!(
            durations.contains(&self.reference_duration),
            "reference duration {} is not among the thresholds {durations:?}",
            self.reference_duration,
        );
        ensure!(
            (0.0..=1.0).contains(&self.confidence_threshold),
            "confidence threshold must be within [0, 1], got {}",
            self.confidence_threshold,
        );
        ensure!(self.top_k != 0, "`top_k` must be positive");
        self.cost.validate()?;
        Ok(())
    }

    pub fn success_criterion(&self) -> SuccessCriterion {
        SuccessCriterion::builder()
            .duration(self.reference_duration)
            .confidence(self.confidence_threshold)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const SETTINGS: &str = r"
        durations = { start = 24, end = 504, count = 11 }
        reference_duration_hours = 504
        confidence_threshold = 0.5
        top_k = 10

        [cost]
        rooftop_rate = 2500
        rooftop_cap = 339.6
        groundmount_rate = 3500
        battery_power_rate = 100
        battery_energy_rate = 1000
    ";

    fn parse(text: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    #[test]
    fn test_linear_durations() -> Result {
        let settings = parse(SETTINGS)?;
        let durations = settings.durations.hours();
        assert_eq!(durations.len(), 11);
        assert_eq!(durations[0], Hours::from(24.0));
        assert_eq!(durations[1], Hours::from(72.0));
        assert_eq!(durations[10], Hours::from(504.0));
        assert_eq!(settings.top_k, 10);
        assert_abs_diff_eq!(settings.cost.rooftop_cap.0, 339.6);
        assert_abs_diff_eq!(settings.success_criterion().confidence, 0.5);
        Ok(())
    }

    #[test]
    fn test_linear_durations_end_exactly() -> Result {
        let settings = parse(&SETTINGS.replace(
            "{ start = 24, end = 504, count = 11 }",
            "{ start = 0, end = 504, count = 14 }",
        ))?;
        let durations = settings.durations.hours();
        assert_eq!(durations.len(), 14);
        assert_eq!(durations[0], Hours::ZERO);
        assert_eq!(durations[13], Hours::from(504.0));
        assert_eq!(durations[13].label(), "504");
        assert!(durations.iter().tuple_windows().all(|(lhs, rhs)| lhs < rhs));
        Ok(())
    }

    #[test]
    fn test_explicit_durations() -> Result {
        let settings = parse(&SETTINGS.replace(
            "{ start = 24, end = 504, count = 11 }",
            "[24, 168, 504]",
        ))?;
        assert_eq!(
            settings.durations.hours(),
            [Hours::from(24.0), Hours::from(168.0), Hours::from(504.0)],
        );
        Ok(())
    }

    #[test]
    fn test_reference_must_be_a_threshold() {
        assert!(parse(&SETTINGS.replace("reference_duration_hours = 504", "reference_duration_hours = 500")).is_err());
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert!(parse(&SETTINGS.replace("battery_power_rate = 100", "battery_power_rate = -100")).is_err());
    }

    #[test]
    fn test_missing_constant_rejected() {
        assert!(parse(&SETTINGS.replace("top_k = 10", "")).is_err());
    }
}
