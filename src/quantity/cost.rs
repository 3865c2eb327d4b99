use std::{
    fmt::{Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, energy::KilowattHours, power::Kilowatts, scalar::Scalar};

pub type Cost = Quantity<0, 0, 1>;

/// Cost per kilowatt of installed power.
pub type KilowattCost = Quantity<-1, 0, 1>;

/// Cost per kilowatt-hour of installed storage.
pub type KilowattHourCost = Quantity<-1, -1, 1>;

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}", self.0)
    }
}

impl Display for KilowattCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/kW", self.0)
    }
}

impl Display for KilowattHourCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/kWh", self.0)
    }
}

/// Unit cost times a dimensionless amount, for example solar cost per scaling unit.
impl Mul<Scalar> for Cost {
    type Output = Self;

    fn mul(self, rhs: Scalar) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul<KilowattCost> for Kilowatts {
    type Output = Cost;

    fn mul(self, rhs: KilowattCost) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}

impl Mul<KilowattHourCost> for KilowattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourCost) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
