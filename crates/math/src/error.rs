//! Error types for the math crate

use thiserror::Error;

/// Errors that can occur while typesetting math
#[derive(Error, Debug)]
pub enum MathError {
    /// No typesetting backend is available
    #[error("Math typesetter unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the expression
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// The backend failed while rendering
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type for math operations
pub type MathResult<T> = Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::Unavailable("no backend".to_string());
        assert_eq!(err.to_string(), "Math typesetter unavailable: no backend");
    }
}
