use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Fixed parameters of the loss formula.
///
/// Two parameterizations exist in the field; both are kept as named sets and
/// callers pick one through [`Market`]. Nothing here is user-configurable per
/// call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantSet {
    pub name: &'static str,
    pub working_weeks_per_year: u16,
    pub working_days_per_week: u16,
    /// Fraction of repetitive hours that automation recovers.
    pub ai_efficiency_gain: f64,
    /// Relative uplift applied multiplicatively to the closing rate.
    pub conversion_improvement: f64,
    /// Ceiling for the closing rate after uplift, as a fraction.
    pub closing_rate_cap: f64,
}

impl ConstantSet {
    pub fn working_days_per_year(&self) -> f64 {
        f64::from(self.working_weeks_per_year) * f64::from(self.working_days_per_week)
    }
}

pub static GENERIC: ConstantSet = ConstantSet {
    name: "generic",
    working_weeks_per_year: 48,
    working_days_per_week: 5,
    ai_efficiency_gain: 0.40,
    conversion_improvement: 0.08,
    closing_rate_cap: 0.90,
};

pub static IT: ConstantSet = ConstantSet {
    name: "it",
    working_weeks_per_year: 44,
    working_days_per_week: 5,
    ai_efficiency_gain: 0.40,
    conversion_improvement: 0.08,
    closing_rate_cap: 0.95,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Market {
    #[default]
    Generic,
    It,
}

impl Market {
    pub const ALL: [Self; 2] = [Self::Generic, Self::It];

    pub fn constants(self) -> &'static ConstantSet {
        match self {
            Self::Generic => &GENERIC,
            Self::It => &IT,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.constants().name
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown market '{0}', expected one of: generic, it")]
pub struct ParseMarketError(pub String);

impl FromStr for Market {
    type Err = ParseMarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "default" => Ok(Self::Generic),
            "it" | "italy" => Ok(Self::It),
            other => Err(ParseMarketError(other.to_string())),
        }
    }
}
