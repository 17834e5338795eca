//! Goal seek: find the value of one numeric input that drives one numeric
//! output to a target, by bisection between two bounds.

use serde::Serialize;
use tracing::debug;

use super::engine::{find_calculator, run_calculator};
use super::error::{EvalError, SolveError};
use super::types::{Calculator, Constraint, FieldKind, FieldSpec, InputRecord, InputValue};

pub const DEFAULT_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct GoalSolveConfig {
    pub field: String,
    pub output: String,
    pub target: f64,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl GoalSolveConfig {
    pub fn new(field: &str, output: &str, target: f64, search_min: f64, search_max: f64) -> Self {
        Self {
            field: field.to_string(),
            output: output.to_string(),
            target,
            search_min,
            search_max,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub output_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveResult {
    pub calculator: &'static str,
    pub field: String,
    pub output: String,
    pub target: f64,
    pub search_min: f64,
    pub search_max: f64,
    pub solved_value: Option<f64>,
    pub achieved_output: Option<f64>,
    pub iterations: Vec<GoalSolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

struct Probe<'a> {
    calculator: &'static Calculator,
    base: &'a InputRecord,
    config: &'a GoalSolveConfig,
}

impl Probe<'_> {
    fn output_at(&self, value: f64) -> Result<f64, SolveError> {
        let mut record = self.base.clone();
        record.set(&self.config.field, InputValue::Number(value));
        let evaluation = run_calculator(self.calculator, &record)?;
        evaluation
            .number(&self.config.output)
            .ok_or_else(|| SolveError::UnknownOutput {
                calculator: self.calculator.id.to_string(),
                output: self.config.output.clone(),
            })
    }
}

pub fn solve_goal(
    id: &str,
    base: &InputRecord,
    config: &GoalSolveConfig,
) -> Result<GoalSolveResult, SolveError> {
    let calculator = find_calculator(id).ok_or_else(|| EvalError::UnknownCalculator(id.to_string()))?;
    let field = validate_config(calculator, config)?;

    // Whole-number fields are searched over integers only.
    let integer = matches!(
        field.kind,
        FieldKind::Number {
            constraint: Constraint::IntegerRange { .. },
            ..
        }
    );
    let (search_min, search_max) = if integer {
        (config.search_min.ceil(), config.search_max.floor())
    } else {
        (config.search_min, config.search_max)
    };
    if search_max <= search_min {
        return Err(SolveError::Config(format!(
            "search bounds must contain at least two whole numbers for {}",
            config.field
        )));
    }

    let probe = Probe {
        calculator,
        base,
        config,
    };
    let tol = config.tolerance;
    let mut low_out = probe.output_at(search_min)?;
    let mut high_out = probe.output_at(search_max)?;

    let mut result = GoalSolveResult {
        calculator: calculator.id,
        field: config.field.clone(),
        output: config.output.clone(),
        target: config.target,
        search_min: config.search_min,
        search_max: config.search_max,
        solved_value: None,
        achieved_output: None,
        iterations: Vec::new(),
        converged: false,
        feasible: false,
        message: String::new(),
    };

    if (low_out - config.target).abs() <= tol {
        result.solved_value = Some(search_min);
        result.achieved_output = Some(low_out);
        result.converged = true;
        result.feasible = true;
        result.message = "Target already met at the lower search bound.".to_string();
        return Ok(result);
    }
    if (high_out - config.target).abs() <= tol {
        result.solved_value = Some(search_max);
        result.achieved_output = Some(high_out);
        result.converged = true;
        result.feasible = true;
        result.message = "Target already met at the upper search bound.".to_string();
        return Ok(result);
    }
    if (low_out < config.target) == (high_out < config.target) {
        result.message = "No value within the search bounds reaches the target.".to_string();
        return Ok(result);
    }

    result.feasible = true;
    let increasing = high_out > low_out;
    let mut lo = search_min;
    let mut hi = search_max;
    let mut closest_whole = false;
    for it in 1..=config.max_iterations {
        if integer && hi - lo <= 1.0 {
            let (value, out) = if (low_out - config.target).abs() <= (high_out - config.target).abs() {
                (lo, low_out)
            } else {
                (hi, high_out)
            };
            result.solved_value = Some(value);
            result.achieved_output = Some(out);
            result.converged = true;
            closest_whole = true;
            break;
        }

        let mid = if integer {
            ((lo + hi) * 0.5).floor()
        } else {
            (lo + hi) * 0.5
        };
        let out = probe.output_at(mid)?;
        result.iterations.push(GoalSolveIteration {
            iteration: it,
            lower_bound: lo,
            upper_bound: hi,
            candidate_value: mid,
            output_value: out,
        });
        result.solved_value = Some(mid);
        result.achieved_output = Some(out);

        if (out - config.target).abs() <= tol || (!integer && (hi - lo) * 0.5 <= tol) {
            result.converged = true;
            break;
        }
        if (out < config.target) == increasing {
            lo = mid;
            low_out = out;
        } else {
            hi = mid;
            high_out = out;
        }
    }

    result.message = if closest_whole {
        "Closest whole-number value to the target.".to_string()
    } else if result.converged {
        "Converged to target within tolerance.".to_string()
    } else {
        "Stopped at max iterations before reaching tolerance.".to_string()
    };
    debug!(
        calculator = calculator.id,
        field = %config.field,
        integer,
        iterations = result.iterations.len(),
        converged = result.converged,
        "goal seek finished"
    );
    Ok(result)
}

fn validate_config(
    calculator: &Calculator,
    config: &GoalSolveConfig,
) -> Result<&'static FieldSpec, SolveError> {
    let field = calculator
        .field(&config.field)
        .filter(|f| f.is_numeric())
        .ok_or_else(|| SolveError::UnknownInput {
            calculator: calculator.id.to_string(),
            field: config.field.clone(),
        })?;
    if !config.target.is_finite() {
        return Err(SolveError::Config("target must be finite".to_string()));
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return Err(SolveError::Config("search bounds must be finite".to_string()));
    }
    if config.search_max <= config.search_min {
        return Err(SolveError::Config(
            "search_max must be greater than search_min".to_string(),
        ));
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err(SolveError::Config("tolerance must be > 0".to_string()));
    }
    if config.max_iterations == 0 {
        return Err(SolveError::Config("max_iterations must be > 0".to_string()));
    }
    Ok(field)
}
