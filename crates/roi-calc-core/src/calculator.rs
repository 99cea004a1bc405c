use crate::constants::{ConstantSet, GENERIC, MONTHS_PER_YEAR};

/// Business metrics collected from the intake form.
///
/// The caller guarantees every value is finite and inside its documented
/// range; nothing here re-checks. Out-of-range values propagate through the
/// arithmetic unchanged (a negative hourly cost yields a negative salary cost,
/// NaN yields NaN).
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    /// People on the operational team, at least 1.
    pub team_size: f64,
    /// Hours one person spends per day on repetitive work, 0.5 to 24.
    pub hours_per_day: f64,
    /// Gross hourly labor cost, at least 1.
    pub hourly_cost: f64,
    pub leads_per_month: f64,
    pub customer_lifetime_value: f64,
    /// Current closing rate as a percentage, 0 to 100. A rate above the
    /// closing-rate cap makes the leads and revenue components negative.
    pub current_closing_rate: f64,
    /// Whether the faster-response revenue uplift is part of the estimate.
    pub agree_with_20_percent_increase: bool,
}

/// Yearly loss estimate. Every field is rounded to the nearest whole unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub total_loss: f64,
    pub salary_cost: f64,
    pub missed_revenue: f64,
    pub hours_wasted: f64,
    pub leads_lost: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct RoiCalculator {
    constants: &'static ConstantSet,
}

impl Default for RoiCalculator {
    fn default() -> Self {
        Self::new(&GENERIC)
    }
}

impl RoiCalculator {
    pub fn new(constants: &'static ConstantSet) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &'static ConstantSet {
        self.constants
    }

    pub fn calculate(&self, input: &CalculationInput) -> CalculationResult {
        let c = self.constants;

        let hours_per_person_per_year = input.hours_per_day * c.working_days_per_year();
        let total_hours_all_team_per_year = hours_per_person_per_year * input.team_size;
        let hours_automatable_per_year = total_hours_all_team_per_year * c.ai_efficiency_gain;

        let salary_cost = hours_automatable_per_year * input.hourly_cost;

        let (leads_lost, missed_revenue) = if input.agree_with_20_percent_increase {
            let current_rate = input.current_closing_rate / 100.0;
            let rate_difference = improved_closing_rate(input.current_closing_rate, c) - current_rate;
            let leads_per_year = input.leads_per_month * MONTHS_PER_YEAR;
            let leads_lost = leads_per_year * rate_difference;
            (leads_lost, leads_lost * input.customer_lifetime_value)
        } else {
            (0.0, 0.0)
        };

        let total_loss = salary_cost + missed_revenue;

        CalculationResult {
            total_loss: total_loss.round(),
            salary_cost: salary_cost.round(),
            missed_revenue: missed_revenue.round(),
            hours_wasted: hours_automatable_per_year.round(),
            leads_lost: leads_lost.round(),
        }
    }
}

/// Closing rate after the multiplicative uplift, as a fraction, capped at
/// the set's ceiling. `current_closing_rate` is a percentage.
pub fn improved_closing_rate(current_closing_rate: f64, constants: &ConstantSet) -> f64 {
    let current_rate = current_closing_rate / 100.0;
    (current_rate * (1.0 + constants.conversion_improvement)).min(constants.closing_rate_cap)
}

/// Computes the loss estimate with the canonical `generic` constant set.
pub fn calculate_roi(input: &CalculationInput) -> CalculationResult {
    RoiCalculator::default().calculate(input)
}
