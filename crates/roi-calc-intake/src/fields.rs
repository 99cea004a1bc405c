use std::fmt;

use serde::{Deserialize, Serialize};

/// Pages of the intake wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Intro,
    Team,
    Business,
    Result,
}

impl Step {
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Intro | Self::Result => &[],
            Self::Team => &[Field::TeamSize, Field::HoursPerDay, Field::HourlyCost],
            Self::Business => &[
                Field::LeadsPerMonth,
                Field::CustomerLifetimeValue,
                Field::CurrentClosingRate,
                Field::AgreeWith20PercentIncrease,
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Team => "team",
            Self::Business => "business",
            Self::Result => "result",
        }
    }
}

/// Accepted range for a numeric field. `max` of `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    TeamSize,
    HoursPerDay,
    HourlyCost,
    LeadsPerMonth,
    CustomerLifetimeValue,
    CurrentClosingRate,
    AgreeWith20PercentIncrease,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::TeamSize,
        Self::HoursPerDay,
        Self::HourlyCost,
        Self::LeadsPerMonth,
        Self::CustomerLifetimeValue,
        Self::CurrentClosingRate,
        Self::AgreeWith20PercentIncrease,
    ];

    /// Wire key, as used in JSON payloads.
    pub fn key(self) -> &'static str {
        match self {
            Self::TeamSize => "teamSize",
            Self::HoursPerDay => "hoursPerDay",
            Self::HourlyCost => "hourlyCost",
            Self::LeadsPerMonth => "leadsPerMonth",
            Self::CustomerLifetimeValue => "customerLifetimeValue",
            Self::CurrentClosingRate => "currentClosingRate",
            Self::AgreeWith20PercentIncrease => "agreeWith20PercentIncrease",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TeamSize => "Operational team members",
            Self::HoursPerDay => "Daily hours lost to repetitive tasks (per person)",
            Self::HourlyCost => "Average gross hourly cost",
            Self::LeadsPerMonth => "Leads per month",
            Self::CustomerLifetimeValue => "Average customer lifetime value",
            Self::CurrentClosingRate => "Current closing rate (%)",
            Self::AgreeWith20PercentIncrease => "Include faster-response revenue estimate",
        }
    }

    /// Prompt shown next to the field when its value is rejected.
    pub fn hint(self) -> &'static str {
        match self {
            Self::TeamSize => "enter a valid number of team members",
            Self::HoursPerDay => "enter a valid number of hours (0.5 - 24)",
            Self::HourlyCost => "enter a valid hourly cost",
            Self::LeadsPerMonth => "enter a valid number of leads per month",
            Self::CustomerLifetimeValue => "enter a valid customer value",
            Self::CurrentClosingRate => "enter a valid percentage (0 - 100)",
            Self::AgreeWith20PercentIncrease => "choose whether to include the estimate",
        }
    }

    pub fn step(self) -> Step {
        match self {
            Self::TeamSize | Self::HoursPerDay | Self::HourlyCost => Step::Team,
            _ => Step::Business,
        }
    }

    /// Numeric bounds; `None` for the opt-in flag.
    pub fn bounds(self) -> Option<Bounds> {
        let at_least_one = Bounds {
            min: 1.0,
            max: None,
        };
        match self {
            Self::TeamSize | Self::HourlyCost | Self::LeadsPerMonth | Self::CustomerLifetimeValue => {
                Some(at_least_one)
            }
            Self::HoursPerDay => Some(Bounds {
                min: 0.5,
                max: Some(24.0),
            }),
            Self::CurrentClosingRate => Some(Bounds {
                min: 0.0,
                max: Some(100.0),
            }),
            Self::AgreeWith20PercentIncrease => None,
        }
    }

    /// Whether an absent or zero value counts as missing. The closing rate is
    /// the one numeric field where zero is a legitimate answer.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Self::CurrentClosingRate | Self::AgreeWith20PercentIncrease
        )
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
