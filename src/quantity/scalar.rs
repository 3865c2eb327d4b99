use std::fmt::{Display, Formatter};

use crate::quantity::Quantity;

/// Dimensionless amount: solar scaling factor, generator tank gallons.
pub type Scalar = Quantity<0, 0, 0>;

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
