use crate::constants::ConstantSet;

/// Human-readable summary of the constants behind an estimate.
pub fn methodology(constants: &ConstantSet) -> String {
    format!(
        "Calculation methodology:\n\
         - Working year: {weeks} weeks x {days} days = {year} days\n\
         - Automation efficiency: {efficiency:.0}% of repetitive tasks can be automated\n\
         - Conversion uplift: {uplift:.0}% with instant automated response\n\
         - Closing rate cap after uplift: {cap:.0}%",
        weeks = constants.working_weeks_per_year,
        days = constants.working_days_per_week,
        year = constants.working_days_per_year(),
        efficiency = constants.ai_efficiency_gain * 100.0,
        uplift = constants.conversion_improvement * 100.0,
        cap = constants.closing_rate_cap * 100.0,
    )
}
