use tracing::debug;

use super::calculators::CATALOG;
use super::error::{EvalError, ValidationError};
use super::types::{Calculator, Evaluation, InputRecord};
use super::validate::validate;

pub fn calculators() -> impl Iterator<Item = &'static Calculator> {
    CATALOG.iter().copied().flatten()
}

pub fn find_calculator(id: &str) -> Option<&'static Calculator> {
    calculators().find(|c| c.id == id)
}

/// Validates `inputs` against the calculator's fields and runs its formula.
pub fn evaluate(id: &str, inputs: &InputRecord) -> Result<Evaluation, EvalError> {
    let calculator = find_calculator(id).ok_or_else(|| EvalError::UnknownCalculator(id.to_string()))?;
    run_calculator(calculator, inputs)
}

pub(crate) fn run_calculator(
    calculator: &'static Calculator,
    record: &InputRecord,
) -> Result<Evaluation, EvalError> {
    let inputs = validate(calculator.fields, record)?;
    let mut evaluation = Evaluation::new(calculator.id);
    (calculator.compute)(&inputs, &mut evaluation)?;
    ensure_finite(&evaluation)?;
    debug!(
        calculator = calculator.id,
        outputs = evaluation.outputs.len(),
        labels = evaluation.classifications.len(),
        "evaluated"
    );
    Ok(evaluation)
}

fn ensure_finite(evaluation: &Evaluation) -> Result<(), ValidationError> {
    match evaluation
        .outputs
        .iter()
        .find(|o| o.as_number().is_some_and(|v| !v.is_finite()))
    {
        Some(output) => Err(ValidationError::NonFiniteResult {
            output: output.name.to_string(),
        }),
        None => Ok(()),
    }
}
