//! WBGT heat-stress levels used to colour readings.

use std::fmt;

use crate::constants::WBGT_RANGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeatLevel {
    Safe,
    Caution,
    Alert,
    Severe,
    Danger,
    /// Outside the measurable range.
    Unknown,
}

impl HeatLevel {
    pub fn from_wbgt(wbgt: f64) -> HeatLevel {
        let (min, max) = WBGT_RANGE;
        if !(min..=max).contains(&wbgt) {
            return HeatLevel::Unknown;
        }

        match wbgt {
            w if w < 21.0 => HeatLevel::Safe,
            w if w < 25.0 => HeatLevel::Caution,
            w if w < 28.0 => HeatLevel::Alert,
            w if w < 31.0 => HeatLevel::Severe,
            _ => HeatLevel::Danger,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeatLevel::Safe => "safe",
            HeatLevel::Caution => "caution",
            HeatLevel::Alert => "alert",
            HeatLevel::Severe => "severe",
            HeatLevel::Danger => "danger",
            HeatLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HeatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(HeatLevel::from_wbgt(15.0), HeatLevel::Safe);
        assert_eq!(HeatLevel::from_wbgt(20.9), HeatLevel::Safe);
        assert_eq!(HeatLevel::from_wbgt(21.0), HeatLevel::Caution);
        assert_eq!(HeatLevel::from_wbgt(25.0), HeatLevel::Alert);
        assert_eq!(HeatLevel::from_wbgt(28.0), HeatLevel::Severe);
        assert_eq!(HeatLevel::from_wbgt(30.0), HeatLevel::Severe);
        assert_eq!(HeatLevel::from_wbgt(31.0), HeatLevel::Danger);
        assert_eq!(HeatLevel::from_wbgt(44.0), HeatLevel::Danger);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(HeatLevel::from_wbgt(14.9), HeatLevel::Unknown);
        assert_eq!(HeatLevel::from_wbgt(44.5), HeatLevel::Unknown);
        assert_eq!(HeatLevel::from_wbgt(f64::NAN), HeatLevel::Unknown);
    }
}
