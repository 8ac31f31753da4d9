//! Brightness as reported to the host.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 100 percent.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MAX: u8 = 100;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Convert a unit level (0.0 to 1.0) to a percentage, rounding up.
    ///
    /// Levels above 1.0 saturate at 100; negative or NaN levels give 0.
    pub fn from_level(level: f64) -> Self {
        let pct = (level * 100.0).ceil();
        let value = if pct.is_nan() || pct <= 0.0 {
            0
        } else if pct >= f64::from(Self::MAX) {
            Self::MAX
        } else {
            pct as u8
        };
        Brightness { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_level() {
        assert_eq!(Brightness::from_level(0.5).value(), 50);
        assert_eq!(Brightness::from_level(1.0).value(), 100);
        assert_eq!(Brightness::from_level(0.011).value(), 2);
        assert_eq!(Brightness::from_level(0.0).value(), 0);
    }

    #[test]
    fn test_from_level_out_of_range() {
        assert_eq!(Brightness::from_level(1.7).value(), 100);
        assert_eq!(Brightness::from_level(-0.2).value(), 0);
        assert_eq!(Brightness::from_level(f64::NAN).value(), 0);
    }
}
