use roi_calc_core::{CalculationResult, RoiCalculator};
use tracing::debug;

use crate::error::FieldError;
use crate::fields::{Field, Step};
use crate::form::FormData;
use crate::validate::{validate, validate_step};

/// Step-by-step intake: intro, team metrics, business metrics, result.
///
/// Moving forward past a data step requires that step to validate; the
/// rejected fields stay available through [`IntakeSession::errors`] until
/// the user edits them.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    calculator: RoiCalculator,
    step: Step,
    form: FormData,
    errors: Vec<FieldError>,
    result: Option<CalculationResult>,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new(RoiCalculator::default())
    }
}

impl IntakeSession {
    pub fn new(calculator: RoiCalculator) -> Self {
        Self {
            calculator,
            step: Step::Intro,
            form: FormData::default(),
            errors: Vec::new(),
            result: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|err| err.field() == field)
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        self.result.as_ref()
    }

    pub fn set_number(&mut self, field: Field, value: f64) {
        if self.form.set_number(field, value) {
            self.clear_error(field);
        } else {
            debug!(field = %field, "ignoring numeric value for flag field");
        }
    }

    pub fn set_agree(&mut self, agree: bool) {
        self.form.agree_with_20_percent_increase = agree;
        self.clear_error(Field::AgreeWith20PercentIncrease);
    }

    /// Advances one step if the current one validates and returns the step
    /// the session is on afterwards.
    ///
    /// On the business step its own fields are reported first; team fields
    /// are only re-checked once those pass.
    pub fn next(&mut self) -> Step {
        let from = self.step;
        match from {
            Step::Intro => self.step = Step::Team,
            Step::Team => match validate_step(&self.form, Step::Team) {
                Ok(()) => {
                    self.errors.clear();
                    self.step = Step::Business;
                }
                Err(errors) => self.errors = errors.into_vec(),
            },
            Step::Business => match validate_step(&self.form, Step::Business)
                .and_then(|()| validate(&self.form))
            {
                Ok(input) => {
                    self.errors.clear();
                    self.result = Some(self.calculator.calculate(&input));
                    self.step = Step::Result;
                }
                Err(errors) => self.errors = errors.into_vec(),
            },
            Step::Result => {}
        }
        debug!(
            from = from.as_str(),
            to = self.step.as_str(),
            rejected = self.errors.len(),
            "intake next"
        );
        self.step
    }

    /// Goes back one data step. The result page only leaves through
    /// [`IntakeSession::reset`].
    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::Business => Step::Team,
            Step::Team => Step::Intro,
            other => other,
        };
        self.step
    }

    pub fn reset(&mut self) {
        debug!(from = self.step.as_str(), "intake reset");
        *self = Self::new(self.calculator);
    }

    fn clear_error(&mut self, field: Field) {
        self.errors.retain(|err| err.field() != field);
    }
}
