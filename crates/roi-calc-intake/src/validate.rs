use roi_calc_core::CalculationInput;

use crate::error::{FieldError, ValidationErrors};
use crate::fields::{Field, Step};
use crate::form::FormData;

/// Checks one numeric field and returns the value to feed the calculator.
///
/// A required field that is absent or zero is `Missing`. The closing rate
/// falls back to 0 when absent.
pub fn check_field(form: &FormData, field: Field) -> Result<f64, FieldError> {
    let Some(bounds) = field.bounds() else {
        return Ok(0.0);
    };

    let value = match form.number(field) {
        Some(v) if !v.is_finite() => return Err(FieldError::NotFinite { field }),
        Some(v) if v == 0.0 && field.is_required() => return Err(FieldError::Missing { field }),
        Some(v) => v,
        None if field.is_required() => return Err(FieldError::Missing { field }),
        None => 0.0,
    };

    if value < bounds.min {
        return Err(FieldError::BelowMinimum {
            field,
            min: bounds.min,
            value,
        });
    }
    if let Some(max) = bounds.max.filter(|max| value > *max) {
        return Err(FieldError::AboveMaximum { field, max, value });
    }
    Ok(value)
}

/// Validates only the fields shown on `step`.
pub fn validate_step(form: &FormData, step: Step) -> Result<(), ValidationErrors> {
    let errors = step
        .fields()
        .iter()
        .filter_map(|field| check_field(form, *field).err())
        .collect::<Vec<_>>();
    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(()),
    }
}

/// Validates every field and builds the calculator input.
pub fn validate(form: &FormData) -> Result<CalculationInput, ValidationErrors> {
    let mut errors = Vec::new();
    let mut take = |field: Field| {
        check_field(form, field).unwrap_or_else(|err| {
            errors.push(err);
            f64::NAN
        })
    };

    let input = CalculationInput {
        team_size: take(Field::TeamSize),
        hours_per_day: take(Field::HoursPerDay),
        hourly_cost: take(Field::HourlyCost),
        leads_per_month: take(Field::LeadsPerMonth),
        customer_lifetime_value: take(Field::CustomerLifetimeValue),
        current_closing_rate: take(Field::CurrentClosingRate),
        agree_with_20_percent_increase: form.agree_with_20_percent_increase,
    };

    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormData {
        FormData {
            team_size: Some(5.0),
            hours_per_day: Some(3.0),
            hourly_cost: Some(25.0),
            leads_per_month: Some(100.0),
            customer_lifetime_value: Some(5000.0),
            current_closing_rate: Some(15.0),
            agree_with_20_percent_increase: true,
        }
    }

    #[test]
    fn complete_form_builds_input() {
        let input = validate(&filled()).unwrap_or_else(|e| panic!("unexpected: {e}"));
        assert_eq!(input.team_size, 5.0);
        assert_eq!(input.current_closing_rate, 15.0);
        assert!(input.agree_with_20_percent_increase);
    }

    #[test]
    fn zero_counts_as_missing_for_required_fields() {
        let mut form = filled();
        form.team_size = Some(0.0);
        assert_eq!(
            check_field(&form, Field::TeamSize),
            Err(FieldError::Missing {
                field: Field::TeamSize
            })
        );
    }

    #[test]
    fn closing_rate_accepts_zero_and_absence() {
        let mut form = filled();
        form.current_closing_rate = Some(0.0);
        assert_eq!(check_field(&form, Field::CurrentClosingRate), Ok(0.0));
        form.current_closing_rate = None;
        assert_eq!(check_field(&form, Field::CurrentClosingRate), Ok(0.0));
    }

    #[test]
    fn hour_bounds_are_inclusive() {
        let mut form = filled();
        for ok in [0.5, 24.0] {
            form.hours_per_day = Some(ok);
            assert_eq!(check_field(&form, Field::HoursPerDay), Ok(ok));
        }
        form.hours_per_day = Some(0.4);
        assert_eq!(
            check_field(&form, Field::HoursPerDay).map_err(|e| e.code()),
            Err("below_minimum")
        );
        form.hours_per_day = Some(24.5);
        assert_eq!(
            check_field(&form, Field::HoursPerDay).map_err(|e| e.code()),
            Err("above_maximum")
        );
    }

    #[test]
    fn closing_rate_above_hundred_is_rejected() {
        let mut form = filled();
        form.current_closing_rate = Some(100.0);
        assert!(validate(&form).is_ok());
        form.current_closing_rate = Some(100.1);
        assert!(validate(&form).is_err());
        form.current_closing_rate = Some(-1.0);
        assert!(validate(&form).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut form = filled();
        form.hourly_cost = Some(f64::NAN);
        form.leads_per_month = Some(f64::INFINITY);
        let Err(errors) = validate(&form) else {
            panic!("expected errors");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code() == "not_finite"));
    }

    #[test]
    fn step_validation_ignores_other_steps() {
        let mut form = FormData::default();
        form.team_size = Some(2.0);
        form.hours_per_day = Some(1.0);
        form.hourly_cost = Some(30.0);
        assert!(validate_step(&form, Step::Team).is_ok());

        let Err(errors) = validate_step(&form, Step::Business) else {
            panic!("expected business errors");
        };
        let fields = errors.iter().map(FieldError::field).collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![Field::LeadsPerMonth, Field::CustomerLifetimeValue]
        );
    }

    #[test]
    fn every_error_is_reported_at_once() {
        let Err(errors) = validate(&FormData::default()) else {
            panic!("expected errors");
        };
        assert_eq!(errors.len(), 5);
        assert!(errors.for_field(Field::CurrentClosingRate).is_none());
    }
}
