//! Plot, table, calculator, domain and scale values.
//!
//! These only describe what a host should render or ask for; the core
//! builds and passes them around but never draws anything.

use std::fmt;

use super::{format_number, SDate};
use crate::{DistHandle, ErrorMessage, Lambda, Value, ValueKind};

#[derive(Clone, Debug, PartialEq)]
pub enum ScaleKind {
    Linear,
    Log,
    Symlog { constant: f64 },
    Power { exponent: f64 },
    Date,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    pub kind: ScaleKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub tick_format: Option<String>,
    pub title: Option<String>,
}

impl Scale {
    pub fn new(kind: ScaleKind) -> Self {
        Scale {
            kind,
            min: None,
            max: None,
            tick_format: None,
            title: None,
        }
    }

    pub fn linear() -> Self {
        Scale::new(ScaleKind::Linear)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScaleKind::Linear => write!(f, "Linear scale")?,
            ScaleKind::Log => write!(f, "Logarithmic scale")?,
            ScaleKind::Symlog { constant } => {
                write!(f, "Symlog scale (constant {})", format_number(*constant))?;
            }
            ScaleKind::Power { exponent } => {
                write!(f, "Power scale (exponent {})", format_number(*exponent))?;
            }
            ScaleKind::Date => write!(f, "Date scale")?,
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            write!(f, " [{}, {}]", format_number(min), format_number(max))?;
        }
        Ok(())
    }
}

/// Admissible inputs of a function parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum Domain {
    NumericRange { min: f64, max: f64 },
    DateRange { min: SDate, max: SDate },
}

impl Domain {
    /// Check that `value` lies inside the domain.
    pub fn validate(&self, value: &Value) -> Result<(), ErrorMessage> {
        let inside = match (self, value.kind()) {
            (Domain::NumericRange { min, max }, ValueKind::Number(n)) => min <= n && n <= max,
            (Domain::DateRange { min, max }, ValueKind::Date(d)) => min <= d && d <= max,
            (Domain::NumericRange { .. }, _) => {
                return Err(ErrorMessage::expected_type("Number", value));
            }
            (Domain::DateRange { .. }, _) => {
                return Err(ErrorMessage::expected_type("Date", value));
            }
        };
        if inside {
            Ok(())
        } else {
            Err(ErrorMessage::other(format!(
                "Parameter {value} must be in domain {self}"
            )))
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::NumericRange { min, max } => write!(
                f,
                "Number.rangeDomain({}, {})",
                format_number(*min),
                format_number(*max)
            ),
            Domain::DateRange { min, max } => write!(f, "Date.rangeDomain({min}, {max})"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LabeledDistribution {
    pub name: Option<String>,
    pub dist: DistHandle,
}

#[derive(Clone, Debug)]
pub enum PlotKind {
    NumericFn {
        function: Lambda,
        x_scale: Scale,
        y_scale: Scale,
        points: Option<usize>,
    },
    DistFn {
        function: Lambda,
        x_scale: Scale,
        y_scale: Scale,
    },
    Dists {
        dists: Vec<LabeledDistribution>,
        x_scale: Scale,
        y_scale: Scale,
        show_summary: bool,
    },
    Scatter {
        x: DistHandle,
        y: DistHandle,
        x_scale: Scale,
        y_scale: Scale,
    },
}

#[derive(Clone, Debug)]
pub struct Plot {
    pub kind: PlotKind,
    pub title: Option<String>,
}

impl fmt::Display for Plot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PlotKind::NumericFn { .. } => write!(f, "Plot for numeric function"),
            PlotKind::DistFn { .. } => write!(f, "Plot for dist function"),
            PlotKind::Dists { dists, .. } => {
                write!(f, "Plot containing {} distribution(s)", dists.len())
            }
            PlotKind::Scatter { .. } => write!(f, "Scatter plot"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TableColumn {
    pub name: Option<String>,
    pub function: Lambda,
}

#[derive(Clone, Debug)]
pub struct Table {
    pub data: Vec<Value>,
    pub columns: Vec<TableColumn>,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Table with {}x{} elements",
            self.data.len(),
            self.columns.len()
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorInput {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Calculator {
    pub function: Lambda,
    pub inputs: Vec<CalculatorInput>,
    pub autorun: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sample_count: Option<usize>,
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.inputs.iter().map(|i| i.name.as_str()).collect();
        write!(f, "Calculator({})", names.join(", "))
    }
}
