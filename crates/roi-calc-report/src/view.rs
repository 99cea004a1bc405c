use roi_calc_core::CalculationResult;
use serde::Serialize;

use crate::format::{format_currency, format_hours, format_integer, NumberStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub style: NumberStyle,
    pub currency_symbol: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            style: NumberStyle::Italian,
            currency_symbol: "€".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Currency,
    Hours,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultLine {
    pub key: &'static str,
    pub category: &'static str,
    pub label: &'static str,
    pub caption: &'static str,
    pub unit: Unit,
    pub value: f64,
    pub formatted: String,
}

/// Display-ready rendering of a [`CalculationResult`]: the headline loss
/// followed by the four breakdown cards, in page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub headline: ResultLine,
    pub breakdown: Vec<ResultLine>,
}

struct LineDef {
    key: &'static str,
    category: &'static str,
    label: &'static str,
    caption: &'static str,
    unit: Unit,
    pick: fn(&CalculationResult) -> f64,
}

static HEADLINE: LineDef = LineDef {
    key: "totalLoss",
    category: "Analysis result",
    label: "Estimated yearly loss",
    caption: "Money the business leaves on the table every year.",
    unit: Unit::Currency,
    pick: |r| r.total_loss,
};

static BREAKDOWN: [LineDef; 4] = [
    LineDef {
        key: "salaryCost",
        category: "Operational efficiency",
        label: "Salary waste",
        caption: "Cost of hours lost to automatable manual tasks.",
        unit: Unit::Currency,
        pick: |r| r.salary_cost,
    },
    LineDef {
        key: "missedRevenue",
        category: "Commercial opportunity",
        label: "Missed revenue",
        caption: "Revenue lost to slow response times.",
        unit: Unit::Currency,
        pick: |r| r.missed_revenue,
    },
    LineDef {
        key: "hoursWasted",
        category: "Recoverable time",
        label: "Hours per year",
        caption: "Yearly working hours that could be reinvested.",
        unit: Unit::Hours,
        pick: |r| r.hours_wasted,
    },
    LineDef {
        key: "leadsLost",
        category: "Pipeline",
        label: "Leads lost",
        caption: "Potential customers lost every year.",
        unit: Unit::Count,
        pick: |r| r.leads_lost,
    },
];

impl LineDef {
    fn render(&self, result: &CalculationResult, options: &ReportOptions) -> ResultLine {
        let value = (self.pick)(result);
        let formatted = match self.unit {
            Unit::Currency => format_currency(value, options.style, &options.currency_symbol),
            Unit::Hours => format_hours(value, options.style),
            Unit::Count => format_integer(value, options.style),
        };
        ResultLine {
            key: self.key,
            category: self.category,
            label: self.label,
            caption: self.caption,
            unit: self.unit,
            value,
            formatted,
        }
    }
}

impl ResultView {
    pub fn build(result: &CalculationResult, options: &ReportOptions) -> Self {
        Self {
            headline: HEADLINE.render(result, options),
            breakdown: BREAKDOWN
                .iter()
                .map(|def| def.render(result, options))
                .collect(),
        }
    }

    pub fn line(&self, key: &str) -> Option<&ResultLine> {
        std::iter::once(&self.headline)
            .chain(self.breakdown.iter())
            .find(|line| line.key == key)
    }

    /// Plain-text rendering, one line per figure.
    pub fn render_text(&self) -> String {
        let mut out = format!("{}: {}", self.headline.label, self.headline.formatted);
        for line in &self.breakdown {
            out.push_str(&format!("\n- {}: {}", line.label, line.formatted));
        }
        out
    }
}
