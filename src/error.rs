use thiserror::Error;

/// Error types for the minos-rs library.
///
/// Numerical outcomes of a crossing search (limits, new minima, exhausted
/// budgets) are reported through [`crate::cross::CrossingStatus`], not here.
#[derive(Error, Debug)]
pub enum MinosError {
    /// Error indicating a mismatch in vector or matrix dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error indicating a singular matrix was encountered.
    #[error("Singular matrix encountered")]
    SingularMatrix,

    /// Error for parameter-related problems.
    #[error("Parameter error: {0}")]
    ParameterError(String),

    /// Error for boundary constraint violations.
    #[error("Bounds error: {0}")]
    BoundsError(String),

    /// Error during function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Invalid input data, such as a malformed crossing request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parameter not found.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// Linear algebra error.
    #[error("Linear algebra error: {0}")]
    LinearAlgebraError(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<crate::parameters::parameter::ParameterError> for MinosError {
    fn from(err: crate::parameters::parameter::ParameterError) -> Self {
        match err {
            crate::parameters::parameter::ParameterError::ParameterNotFound { name } => {
                MinosError::ParameterNotFound(name)
            }
            other => MinosError::ParameterError(format!("{}", other)),
        }
    }
}

impl From<crate::parameters::bounds::BoundsError> for MinosError {
    fn from(err: crate::parameters::bounds::BoundsError) -> Self {
        MinosError::BoundsError(format!("{}", err))
    }
}

/// Result type alias for minos-rs operations.
pub type Result<T> = std::result::Result<T, MinosError>;
