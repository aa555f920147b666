use std::fmt;

use crate::expr::ExprError;

/// Result alias for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

/// Errors surfaced by the FEM pipeline.
///
/// `InvalidInput` and `SolveFailure` are the two kinds the core itself
/// produces; the remaining variants wrap failures of the binary's
/// parameter-file and export plumbing.
#[derive(Debug)]
pub enum SolverError {
    /// Non-positive domain length, zero element count, or a coefficient
    /// sample that came back non-finite.
    InvalidInput { context: String },

    /// The dense direct solve detected a singular or numerically unstable
    /// system.
    SolveFailure { context: String },

    /// A coefficient expression failed to lex, parse, or resolve.
    Expr(ExprError),

    /// Parameter file or output directory could not be accessed.
    Io(std::io::Error),

    /// Parameter file could not be deserialized.
    Json(serde_json::Error),

    /// Solution export failed.
    Csv(csv::Error),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { context } => write!(f, "Invalid input: {}", context),
            Self::SolveFailure { context } => write!(f, "Solve failure: {}", context),
            Self::Expr(err) => write!(f, "Expression error: {}", err),
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::Json(err) => write!(f, "Parameter file error: {}", err),
            Self::Csv(err) => write!(f, "CSV export error: {}", err),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<ExprError> for SolverError {
    fn from(err: ExprError) -> Self {
        Self::Expr(err)
    }
}

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for SolverError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
