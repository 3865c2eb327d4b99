//! Configuration parameters from the label/value header block of a resilience file.

use csv::StringRecord;
use enumset::{EnumSet, EnumSetType};

use crate::{
    quantity::{energy::KilowattHours, power::Kilowatts, scalar::Scalar, time::Hours},
    tradespace::TradespaceError,
};

#[derive(Debug, EnumSetType)]
pub enum Parameter {
    SolarScale,
    BatteryPower,
    BatteryEnergy,
    BatteryHours,
    GeneratorPower,
    GeneratorTank,
}

impl Parameter {
    /// Header label, matched exactly against the first cell of a row.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SolarScale => "PV scaling factor",
            Self::BatteryPower => "Battery power [kW]",
            Self::BatteryEnergy => "Battery energy [kWh]",
            Self::BatteryHours => "Battery hours [kWh]",
            Self::GeneratorPower => "Generator 1 power [kW]",
            Self::GeneratorTank => "Generator 1 tank [gal]",
        }
    }

    /// Short column name in the output tables.
    pub const fn column(self) -> &'static str {
        match self {
            Self::SolarScale => "pv",
            Self::BatteryPower => "bp",
            Self::BatteryEnergy => "be",
            Self::BatteryHours => "bh",
            Self::GeneratorPower => "gp",
            Self::GeneratorTank => "gt",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        EnumSet::<Self>::all().iter().find(|parameter| parameter.label() == label)
    }
}

/// Raw header value together with the row it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataValue {
    pub index: usize,
    pub text: String,
}

impl MetadataValue {
    fn parse<T: std::str::FromStr>(&self, parameter: Parameter) -> Result<T, TradespaceError>
    where
        T::Err: ToString,
    {
        self.text.trim().parse().map_err(|error| {
            TradespaceError::format(self.index, parameter.column(), &self.text, error)
        })
    }
}

/// All six header values, still as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub solar_scale: MetadataValue,
    pub battery_power: MetadataValue,
    pub battery_energy: MetadataValue,
    pub battery_hours: MetadataValue,
    pub generator_power: MetadataValue,
    pub generator_tank: MetadataValue,
}

impl Metadata {
    /// Scan every row for the recognised labels.
    ///
    /// Later occurrences override earlier ones. Fails with the complete set of labels that never
    /// appeared.
    pub fn extract(rows: &[StringRecord]) -> Result<Self, TradespaceError> {
        let mut values: [Option<MetadataValue>; 6] = Default::default();
        for (index, row) in rows.iter().enumerate() {
            let Some(parameter) = row.get(0).and_then(Parameter::from_label) else {
                continue;
            };
            let text = row.get(1).unwrap_or_default().to_string();
            values[parameter as usize] = Some(MetadataValue { index, text });
        }

        let missing: EnumSet<Parameter> = EnumSet::<Parameter>::all()
            .iter()
            .filter(|parameter| values[*parameter as usize].is_none())
            .collect();
        if !missing.is_empty() {
            return Err(TradespaceError::MissingParameter(missing));
        }

        let mut take = |parameter: Parameter| {
            values[parameter as usize]
                .take()
                .ok_or(TradespaceError::MissingParameter(EnumSet::only(parameter)))
        };
        Ok(Self {
            solar_scale: take(Parameter::SolarScale)?,
            battery_power: take(Parameter::BatteryPower)?,
            battery_energy: take(Parameter::BatteryEnergy)?,
            battery_hours: take(Parameter::BatteryHours)?,
            generator_power: take(Parameter::GeneratorPower)?,
            generator_tank: take(Parameter::GeneratorTank)?,
        })
    }
}

/// Identity of a configuration: every sizing parameter except the derivable battery hours.
///
/// Field order is the column order of the output tables and the sort order of the tradespace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey {
    pub solar_scale: Scalar,
    pub battery_power: Kilowatts,
    pub battery_energy: KilowattHours,
    pub generator_power: Kilowatts,

    /// Generator tank in gallons.
    pub generator_tank: Scalar,
}

impl ConfigKey {
    pub const COLUMNS: [&'static str; 5] = ["pv", "bp", "be", "gp", "gt"];

    pub fn to_record(&self) -> [String; 5] {
        [
            self.solar_scale.0.to_string(),
            self.battery_power.0.to_string(),
            self.battery_energy.0.to_string(),
            self.generator_power.0.to_string(),
            self.generator_tank.0.to_string(),
        ]
    }
}

/// Sizing parameters of one microgrid configuration.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConfigParams {
    pub key: ConfigKey,

    /// Informational, as reported by the simulator.
    pub battery_hours: Hours,
}

impl TryFrom<&Metadata> for ConfigParams {
    type Error = TradespaceError;

    fn try_from(metadata: &Metadata) -> Result<Self, Self::Error> {
        Ok(Self {
            key: ConfigKey {
                solar_scale: metadata.solar_scale.parse(Parameter::SolarScale)?,
                battery_power: metadata.battery_power.parse(Parameter::BatteryPower)?,
                battery_energy: metadata.battery_energy.parse(Parameter::BatteryEnergy)?,
                generator_power: metadata.generator_power.parse(Parameter::GeneratorPower)?,
                generator_tank: metadata.generator_tank.parse(Parameter::GeneratorTank)?,
            },
            battery_hours: metadata.battery_hours.parse(Parameter::BatteryHours)?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn header_rows() -> Vec<StringRecord> {
        vec![
            StringRecord::from(vec!["Site", "cvh"]),
            StringRecord::from(vec!["PV scaling factor", "500"]),
            StringRecord::from(vec!["Battery power [kW]", "50"]),
            StringRecord::from(vec!["Battery energy [kWh]", "200"]),
            StringRecord::from(vec!["Battery hours [kWh]", "4"]),
            StringRecord::new(),
            StringRecord::from(vec!["Generator 1 power [kW]", "60"]),
            StringRecord::from(vec!["Generator 1 tank [gal]", "250"]),
        ]
    }

    #[test]
    fn test_extract() {
        let params = ConfigParams::try_from(&Metadata::extract(&header_rows()).unwrap()).unwrap();
        assert_eq!(params.key.solar_scale, Scalar::from(500.0));
        assert_eq!(params.key.battery_power, Kilowatts::from(50.0));
        assert_eq!(params.key.battery_energy, KilowattHours::from(200.0));
        assert_eq!(params.key.generator_power, Kilowatts::from(60.0));
        assert_eq!(params.key.generator_tank, Scalar::from(250.0));
        assert_eq!(params.battery_hours, Hours::from(4.0));
    }

    #[test]
    fn test_extract_order_independent_last_wins() {
        let mut rows = header_rows();
        rows.reverse();
        rows.push(StringRecord::from(vec!["PV scaling factor", "250"]));
        let metadata = Metadata::extract(&rows).unwrap();
        assert_eq!(metadata.solar_scale.text, "250");
        assert_eq!(metadata.solar_scale.index, 8);
    }

    #[test]
    fn test_extract_reports_every_missing_parameter() {
        let rows: Vec<_> = header_rows()
            .into_iter()
            .filter(|row| {
                !matches!(row.get(0), Some("Battery energy [kWh]" | "Generator 1 power [kW]"))
            })
            .collect();
        match Metadata::extract(&rows) {
            Err(TradespaceError::MissingParameter(missing)) => {
                assert_eq!(missing, Parameter::BatteryEnergy | Parameter::GeneratorPower);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let mut rows = header_rows();
        rows[1] = StringRecord::from(vec!["pv scaling factor", "500"]);
        assert!(matches!(
            Metadata::extract(&rows),
            Err(TradespaceError::MissingParameter(missing)) if missing == EnumSet::only(Parameter::SolarScale),
        ));
    }

    #[test]
    fn test_unparsable_value() {
        let mut rows = header_rows();
        rows[2] = StringRecord::from(vec!["Battery power [kW]", "fifty"]);
        let metadata = Metadata::extract(&rows).unwrap();
        match ConfigParams::try_from(&metadata) {
            Err(TradespaceError::Format { line, column, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "bp");
                assert_eq!(value, "fifty");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_label_without_value() {
        let mut rows = header_rows();
        rows[7] = StringRecord::from(vec!["Generator 1 tank [gal]"]);
        let metadata = Metadata::extract(&rows).unwrap();
        assert!(matches!(
            ConfigParams::try_from(&metadata),
            Err(TradespaceError::Format { column, .. }) if column == "gt",
        ));
    }
}
