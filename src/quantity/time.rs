use std::fmt::{Display, Formatter};

use crate::quantity::Quantity;

pub type Hours = Quantity<0, 1, 0>;

impl Hours {
    /// Column label used for a duration threshold in wide tables.
    ///
    /// This is the shortest representation that parses back to the same value, so `24.0`
    /// becomes `24` and `72.5` stays `72.5`.
    pub fn label(self) -> String {
        self.0.to_string()
    }
}

impl Display for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} h", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(Hours::from(24.0).label(), "24");
        assert_eq!(Hours::from(72.5).label(), "72.5");
        assert_eq!(Hours::from(504.0).label().parse::<Hours>().unwrap(), Hours::from(504.0));
    }
}
