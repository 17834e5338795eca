use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    List(Vec<f64>),
    Text(String),
}

impl InputValue {
    /// Parses a raw form/query/CLI value: a number, a comma-separated
    /// number list, or free text for choices.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(v) = trimmed.parse::<f64>() {
            return InputValue::Number(v);
        }
        if trimmed.contains(',') {
            let parsed: Result<Vec<f64>, _> = trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<f64>)
                .collect();
            if let Ok(values) = parsed {
                return InputValue::List(values);
            }
        }
        InputValue::Text(trimmed.to_string())
    }
}

/// Raw, unvalidated inputs for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord(BTreeMap<String, InputValue>);

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.set(name, InputValue::Number(value));
        self
    }

    pub fn with_choice(mut self, name: &str, value: &str) -> Self {
        self.set(name, InputValue::Text(value.to_string()));
        self
    }

    pub fn with_list(mut self, name: &str, values: &[f64]) -> Self {
        self.set(name, InputValue::List(values.to_vec()));
        self
    }

    pub fn set(&mut self, name: &str, value: InputValue) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, InputValue)> for InputRecord {
    fn from_iter<T: IntoIterator<Item = (String, InputValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Constraint {
    Finite,
    Positive,
    NonNegative,
    Range { min: f64, max: f64 },
    IntegerRange { min: i64, max: i64 },
}

impl Constraint {
    pub fn check(self, field: &str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: field.to_string(),
            });
        }
        match self {
            Constraint::Finite => Ok(()),
            Constraint::Positive if value > 0.0 => Ok(()),
            Constraint::Positive => Err(ValidationError::NotPositive {
                field: field.to_string(),
                value,
            }),
            Constraint::NonNegative if value >= 0.0 => Ok(()),
            Constraint::NonNegative => Err(ValidationError::Negative {
                field: field.to_string(),
                value,
            }),
            Constraint::Range { min, max } => {
                if (min..=max).contains(&value) {
                    Ok(())
                } else {
                    Err(ValidationError::OutOfRange {
                        field: field.to_string(),
                        value,
                        min,
                        max,
                    })
                }
            }
            Constraint::IntegerRange { min, max } => {
                if value.fract() != 0.0 {
                    return Err(ValidationError::NotInteger {
                        field: field.to_string(),
                        value,
                    });
                }
                if (min as f64..=max as f64).contains(&value) {
                    Ok(())
                } else {
                    Err(ValidationError::OutOfRange {
                        field: field.to_string(),
                        value,
                        min: min as f64,
                        max: max as f64,
                    })
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldKind {
    Number {
        constraint: Constraint,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
    },
    NumberList {
        constraint: Constraint,
    },
    Choice {
        options: &'static [&'static str],
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<&'static str>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn number(name: &'static str, label: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            label,
            required: true,
            kind: FieldKind::Number {
                constraint,
                default: None,
            },
        }
    }

    pub const fn number_or(
        name: &'static str,
        label: &'static str,
        constraint: Constraint,
        default: f64,
    ) -> Self {
        Self {
            name,
            label,
            required: false,
            kind: FieldKind::Number {
                constraint,
                default: Some(default),
            },
        }
    }

    pub const fn list(name: &'static str, label: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            label,
            required: true,
            kind: FieldKind::NumberList { constraint },
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            label,
            required: true,
            kind: FieldKind::Choice {
                options,
                default: None,
            },
        }
    }

    pub const fn choice_or(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            required: false,
            kind: FieldKind::Choice {
                options,
                default: Some(default),
            },
        }
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FieldKind::Number { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved {
    Number(f64),
    List(Vec<f64>),
    Choice(&'static str),
}

/// Inputs that passed field validation. Accessors only fail for
/// optional fields that were left empty or for a compute function asking
/// for a field it never declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    values: BTreeMap<&'static str, Resolved>,
}

impl Inputs {
    pub(crate) fn insert(&mut self, name: &'static str, value: Resolved) {
        self.values.insert(name, value);
    }

    pub fn number(&self, name: &str) -> Result<f64, ValidationError> {
        match self.values.get(name) {
            Some(Resolved::Number(v)) => Ok(*v),
            Some(_) => Err(wrong_kind(name, "a number")),
            None => Err(missing(name)),
        }
    }

    pub fn optional_number(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(Resolved::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Whole-number field, already range checked by its constraint.
    pub fn count(&self, name: &str) -> Result<u32, ValidationError> {
        let value = self.number(name)?;
        if value < 0.0 || value > u32::MAX as f64 || value.fract() != 0.0 {
            return Err(ValidationError::NotInteger {
                field: name.to_string(),
                value,
            });
        }
        Ok(value as u32)
    }

    pub fn list(&self, name: &str) -> Result<&[f64], ValidationError> {
        match self.values.get(name) {
            Some(Resolved::List(v)) => Ok(v.as_slice()),
            Some(_) => Err(wrong_kind(name, "a list of numbers")),
            None => Err(missing(name)),
        }
    }

    pub fn choice(&self, name: &str) -> Result<&'static str, ValidationError> {
        match self.values.get(name) {
            Some(Resolved::Choice(v)) => Ok(*v),
            Some(_) => Err(wrong_kind(name, "one of the listed options")),
            None => Err(missing(name)),
        }
    }
}

fn missing(name: &str) -> ValidationError {
    ValidationError::Missing {
        field: name.to_string(),
    }
}

fn wrong_kind(name: &str, expected: &'static str) -> ValidationError {
    ValidationError::WrongKind {
        field: name.to_string(),
        expected,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputValue {
    Number(f64),
    Text(String),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub name: &'static str,
    pub label: &'static str,
    pub value: OutputValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub decimals: u8,
}

impl Output {
    pub fn number(name: &'static str, label: &'static str, value: f64, decimals: u8) -> Self {
        Self {
            name,
            label,
            value: OutputValue::Number(value),
            unit: None,
            decimals,
        }
    }

    pub fn text(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            value: OutputValue::Text(value.into()),
            unit: None,
            decimals: 0,
        }
    }

    pub fn null(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            value: OutputValue::Null,
            unit: None,
            decimals: 0,
        }
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            OutputValue::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Human-readable rendering using the output's display precision.
    pub fn display(&self) -> String {
        let body = match &self.value {
            OutputValue::Number(v) => format!("{:.*}", self.decimals as usize, v),
            OutputValue::Text(s) => s.clone(),
            OutputValue::Null => return "-".to_string(),
        };
        match self.unit {
            Some(unit) => format!("{body} {unit}"),
            None => body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub table: &'static str,
    pub label: &'static str,
    pub advice: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub calculator: &'static str,
    pub outputs: Vec<Output>,
    pub classifications: Vec<Classification>,
}

impl Evaluation {
    pub fn new(calculator: &'static str) -> Self {
        Self {
            calculator,
            outputs: Vec::new(),
            classifications: Vec::new(),
        }
    }

    pub fn push(&mut self, output: Output) {
        self.outputs.push(output);
    }

    pub fn classify(&mut self, classification: Classification) {
        self.classifications.push(classification);
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.output(name).and_then(Output::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.output(name).map(|o| &o.value) {
            Some(OutputValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn label(&self, table: &str) -> Option<&'static str> {
        self.classifications
            .iter()
            .find(|c| c.table == table)
            .map(|c| c.label)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Conversion,
    Finance,
    Health,
    Home,
}

pub type ComputeFn = fn(&Inputs, &mut Evaluation) -> Result<(), ValidationError>;

#[derive(Clone, Copy, Debug)]
pub struct Calculator {
    pub id: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub fields: &'static [FieldSpec],
    pub compute: ComputeFn,
}

impl Calculator {
    pub fn info(&self) -> CalculatorInfo {
        CalculatorInfo {
            id: self.id,
            title: self.title,
            category: self.category,
            fields: self.fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculatorInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub fields: &'static [FieldSpec],
}
