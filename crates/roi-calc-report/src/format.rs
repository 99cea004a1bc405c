use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Digit grouping convention for displayed numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    /// `108.000`, as rendered for `it-IT`.
    #[default]
    Italian,
    /// `108,000`.
    English,
}

impl NumberStyle {
    pub fn thousands_separator(self) -> char {
        match self {
            Self::Italian => '.',
            Self::English => ',',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Italian => "italian",
            Self::English => "english",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown number style '{0}', expected italian or english")]
pub struct ParseNumberStyleError(pub String);

impl FromStr for NumberStyle {
    type Err = ParseNumberStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "italian" | "it" | "it-it" => Ok(Self::Italian),
            "english" | "en" | "en-us" | "en-gb" => Ok(Self::English),
            other => Err(ParseNumberStyleError(other.to_string())),
        }
    }
}

/// Rounds to a whole number and groups thousands. Non-finite values are
/// rendered as-is.
pub fn format_integer(value: f64, style: NumberStyle) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let separator = style.thousands_separator();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

pub fn format_currency(value: f64, style: NumberStyle, symbol: &str) -> String {
    let grouped = format_integer(value, style);
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-{symbol}{rest}"),
        None => format!("{symbol}{grouped}"),
    }
}

pub fn format_hours(value: f64, style: NumberStyle) -> String {
    format!("{} h", format_integer(value, style))
}
