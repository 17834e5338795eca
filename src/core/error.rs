//! Error types for evaluation and goal seeking.

/// An input field failed its declared constraint, or the inputs as a whole
/// cannot produce a finite result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: String },

    #[error("{field} must be {expected}")]
    WrongKind {
        field: String,
        expected: &'static str,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    #[error("{field} must be > 0 (got {value})")]
    NotPositive { field: String, value: f64 },

    #[error("{field} must be >= 0 (got {value})")]
    Negative { field: String, value: f64 },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a whole number (got {value})")]
    NotInteger { field: String, value: f64 },

    #[error("{field} must be one of {options} (got '{value}')")]
    UnknownChoice {
        field: String,
        value: String,
        options: String,
    },

    #[error("{field} needs at least one value")]
    EmptyList { field: String },

    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("{field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("inputs produce no finite value for {output}")]
    NonFiniteResult { output: String },
}

impl ValidationError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the field (or output) the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field }
            | Self::WrongKind { field, .. }
            | Self::NotFinite { field }
            | Self::NotPositive { field, .. }
            | Self::Negative { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotInteger { field, .. }
            | Self::UnknownChoice { field, .. }
            | Self::EmptyList { field }
            | Self::UnknownField { field }
            | Self::Invalid { field, .. } => field,
            Self::NonFiniteResult { output } => output,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Goal seek failures that are not a property of the inputs themselves.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("{0}")]
    Config(String),

    #[error("{calculator} has no numeric input named {field}")]
    UnknownInput { calculator: String, field: String },

    #[error("{calculator} produced no numeric output named {output}")]
    UnknownOutput { calculator: String, output: String },

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<ValidationError> for SolveError {
    fn from(value: ValidationError) -> Self {
        SolveError::Eval(EvalError::Validation(value))
    }
}
