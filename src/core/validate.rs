use super::error::ValidationError;
use super::types::{FieldKind, FieldSpec, InputRecord, InputValue, Inputs, Resolved};

/// Checks a raw record against the declared fields and resolves defaults.
///
/// Empty text counts as "not provided", so a blank form field behaves the
/// same as an absent key.
pub fn validate(fields: &'static [FieldSpec], record: &InputRecord) -> Result<Inputs, ValidationError> {
    if let Some((name, _)) = record
        .iter()
        .find(|(name, _)| !fields.iter().any(|f| f.name == *name))
    {
        return Err(ValidationError::UnknownField {
            field: name.to_string(),
        });
    }

    let mut inputs = Inputs::default();
    for field in fields {
        let provided = record.get(field.name).filter(|v| !is_blank(v));
        let resolved = match (provided, field.kind) {
            (Some(value), _) => resolve(field, value)?,
            (None, FieldKind::Number { default: Some(d), .. }) => Resolved::Number(d),
            (None, FieldKind::Choice { default: Some(d), .. }) => Resolved::Choice(d),
            (None, _) if field.required => {
                return Err(ValidationError::Missing {
                    field: field.name.to_string(),
                });
            }
            (None, _) => continue,
        };
        inputs.insert(field.name, resolved);
    }
    Ok(inputs)
}

fn is_blank(value: &InputValue) -> bool {
    matches!(value, InputValue::Text(s) if s.trim().is_empty())
}

fn resolve(field: &FieldSpec, value: &InputValue) -> Result<Resolved, ValidationError> {
    match field.kind {
        FieldKind::Number { constraint, .. } => {
            let v = as_number(field.name, value)?;
            constraint.check(field.name, v)?;
            Ok(Resolved::Number(v))
        }
        FieldKind::NumberList { constraint } => {
            let values = as_list(field.name, value)?;
            if values.is_empty() {
                return Err(ValidationError::EmptyList {
                    field: field.name.to_string(),
                });
            }
            for v in &values {
                constraint.check(field.name, *v)?;
            }
            Ok(Resolved::List(values))
        }
        FieldKind::Choice { options, .. } => {
            let InputValue::Text(raw) = value else {
                return Err(ValidationError::WrongKind {
                    field: field.name.to_string(),
                    expected: "one of the listed options",
                });
            };
            let wanted = normalize_choice(raw);
            options
                .iter()
                .copied()
                .find(|opt| normalize_choice(opt) == wanted)
                .map(Resolved::Choice)
                .ok_or_else(|| ValidationError::UnknownChoice {
                    field: field.name.to_string(),
                    value: raw.clone(),
                    options: options.join(", "),
                })
        }
    }
}

fn as_number(name: &str, value: &InputValue) -> Result<f64, ValidationError> {
    match value {
        InputValue::Number(v) => Ok(*v),
        InputValue::Text(s) => s.trim().parse::<f64>().map_err(|_| ValidationError::WrongKind {
            field: name.to_string(),
            expected: "a number",
        }),
        InputValue::List(_) => Err(ValidationError::WrongKind {
            field: name.to_string(),
            expected: "a number",
        }),
    }
}

fn as_list(name: &str, value: &InputValue) -> Result<Vec<f64>, ValidationError> {
    match value {
        InputValue::List(values) => Ok(values.clone()),
        InputValue::Number(v) => Ok(vec![*v]),
        InputValue::Text(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>().map_err(|_| ValidationError::WrongKind {
                    field: name.to_string(),
                    expected: "a comma-separated list of numbers",
                })
            })
            .collect(),
    }
}

// "Semi_Annual", "semi-annual" and "semiannual" all name the same option.
fn normalize_choice(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
