use thiserror::Error;

use crate::fields::Field;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("{field} is required")]
    Missing { field: Field },

    #[error("{field} must be a finite number")]
    NotFinite { field: Field },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum { field: Field, min: f64, value: f64 },

    #[error("{field} must be at most {max}, got {value}")]
    AboveMaximum { field: Field, max: f64, value: f64 },
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            Self::Missing { field }
            | Self::NotFinite { field }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. } => *field,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::NotFinite { .. } => "not_finite",
            Self::BelowMinimum { .. } => "below_minimum",
            Self::AboveMaximum { .. } => "above_maximum",
        }
    }

    /// User-facing prompt for the offending field.
    pub fn hint(&self) -> &'static str {
        self.field().hint()
    }
}

/// One or more rejected fields. Never empty.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input: {}", join(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub(crate) fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|err| err.field() == field)
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
