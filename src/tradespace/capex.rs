//! Capital expenditure of the hardware of a configuration.

use bon::Builder;
use serde::Deserialize;

use crate::{
    prelude::*,
    quantity::{
        cost::{Cost, KilowattCost, KilowattHourCost},
        scalar::Scalar,
        time::Hours,
    },
    tradespace::{TradespaceError, metadata::ConfigKey, reshape::TradespacePoint},
};

/// Unit costs of solar and battery hardware.
///
/// Solar is priced per scaling unit: at the rooftop rate up to the rooftop cap, and at the
/// ground-mount rate for everything above it.
#[derive(Copy, Clone, Debug, Builder, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostModel {
    pub rooftop_rate: Cost,
    pub rooftop_cap: Scalar,
    pub groundmount_rate: Cost,
    pub battery_power_rate: KilowattCost,
    pub battery_energy_rate: KilowattHourCost,
}

impl CostModel {
    pub fn validate(&self) -> Result<(), TradespaceError> {
        let constants = [
            ("rooftop_rate", self.rooftop_rate.0),
            ("rooftop_cap", self.rooftop_cap.0),
            ("groundmount_rate", self.groundmount_rate.0),
            ("battery_power_rate", self.battery_power_rate.0),
            ("battery_energy_rate", self.battery_energy_rate.0),
        ];
        for (name, value) in constants {
            if value < 0.0 || value.is_nan() {
                return Err(TradespaceError::InvalidInput(format!(
                    "cost model `{name}` must be non-negative, got {value}",
                )));
            }
        }
        Ok(())
    }

    /// Piecewise-linear solar cost, continuous at the rooftop cap.
    pub fn solar(&self, solar_scale: Scalar) -> Cost {
        if solar_scale <= self.rooftop_cap {
            self.rooftop_rate * solar_scale
        } else {
            self.rooftop_rate * self.rooftop_cap
                + self.groundmount_rate * (solar_scale - self.rooftop_cap)
        }
    }

    pub fn capex(&self, config: &ConfigKey) -> Result<Cost, TradespaceError> {
        for (name, value) in [
            ("pv", config.solar_scale.0),
            ("bp", config.battery_power.0),
            ("be", config.battery_energy.0),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(TradespaceError::InvalidInput(format!(
                    "`{name}` must be non-negative to estimate capex of {config:?}",
                )));
            }
        }
        Ok(self.solar(config.solar_scale)
            + config.battery_power * self.battery_power_rate
            + config.battery_energy * self.battery_energy_rate)
    }
}

/// Tradespace point priced at the reference duration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CapexRecord {
    pub point: TradespacePoint,
    pub capex: Cost,
}

/// Price every point at exactly the reference duration.
///
/// No point at that duration is a valid outcome and gives an empty result.
#[instrument(skip_all, fields(n_points = points.len(), reference = ?reference))]
pub fn estimate(
    points: &[TradespacePoint],
    reference: Hours,
    cost_model: &CostModel,
) -> Result<Vec<CapexRecord>, TradespaceError> {
    cost_model.validate()?;
    let records = points
        .iter()
        .filter(|point| point.duration == reference)
        .map(|point| {
            cost_model.capex(&point.config).map(|capex| CapexRecord { point: *point, capex })
        })
        .collect::<Result<Vec<_>, TradespaceError>>()?;
    info!(n_records = records.len(), "estimated capex");
    Ok(records)
}
