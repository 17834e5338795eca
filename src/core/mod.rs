mod calculators;
mod engine;
mod error;
mod solver;
mod threshold;
mod types;
mod validate;

pub use calculators::{CATALOG, threshold_tables};
pub use engine::{calculators, evaluate, find_calculator};
pub use error::{EvalError, SolveError, ValidationError};
pub use solver::{GoalSolveConfig, GoalSolveIteration, GoalSolveResult, solve_goal};
pub use threshold::{Band, TableError, ThresholdTable};
pub use types::{
    Calculator, CalculatorInfo, Category, Classification, Constraint, Evaluation, FieldKind,
    FieldSpec, InputRecord, InputValue, Inputs, Output, OutputValue,
};
pub use validate::validate;
