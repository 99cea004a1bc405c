use serde::{Deserialize, Serialize};

use crate::fields::Field;

/// Raw answers as collected, before validation. Numeric fields stay `None`
/// until the user fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default)]
    pub team_size: Option<f64>,
    #[serde(default)]
    pub hours_per_day: Option<f64>,
    #[serde(default)]
    pub hourly_cost: Option<f64>,
    #[serde(default)]
    pub leads_per_month: Option<f64>,
    #[serde(default)]
    pub customer_lifetime_value: Option<f64>,
    #[serde(default)]
    pub current_closing_rate: Option<f64>,
    #[serde(default = "default_agree", rename = "agreeWith20PercentIncrease")]
    pub agree_with_20_percent_increase: bool,
}

fn default_agree() -> bool {
    true
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            team_size: None,
            hours_per_day: None,
            hourly_cost: None,
            leads_per_month: None,
            customer_lifetime_value: None,
            current_closing_rate: None,
            agree_with_20_percent_increase: default_agree(),
        }
    }
}

impl FormData {
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::TeamSize => self.team_size,
            Field::HoursPerDay => self.hours_per_day,
            Field::HourlyCost => self.hourly_cost,
            Field::LeadsPerMonth => self.leads_per_month,
            Field::CustomerLifetimeValue => self.customer_lifetime_value,
            Field::CurrentClosingRate => self.current_closing_rate,
            Field::AgreeWith20PercentIncrease => None,
        }
    }

    /// Stores a numeric answer. Returns `false` for the opt-in flag, which
    /// only takes a boolean.
    pub fn set_number(&mut self, field: Field, value: f64) -> bool {
        let slot = match field {
            Field::TeamSize => &mut self.team_size,
            Field::HoursPerDay => &mut self.hours_per_day,
            Field::HourlyCost => &mut self.hourly_cost,
            Field::LeadsPerMonth => &mut self.leads_per_month,
            Field::CustomerLifetimeValue => &mut self.customer_lifetime_value,
            Field::CurrentClosingRate => &mut self.current_closing_rate,
            Field::AgreeWith20PercentIncrease => return false,
        };
        *slot = Some(value);
        true
    }
}
