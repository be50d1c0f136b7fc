use thiserror::Error;

#[derive(Debug, Error)]
pub enum AthenaError {
    #[error("Unsupported Bezier degree {degree}: supported degrees are 1 to 4")]
    UnsupportedDegree { degree: usize },

    #[error("Invalid knot vector length: expected {expected} knots, got {actual}")]
    InvalidKnotVectorLength { expected: usize, actual: usize },

    #[error("Invalid knot vector: {0}")]
    InvalidKnotVectorContent(String),

    #[error("Index out of range: {0}")]
    IndexRange(String),

    #[error("Expected {expected} control points, got {actual}")]
    ControlPointCount { expected: usize, actual: usize },

    #[error("Invalid control point: {0}")]
    InvalidControlPoint(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Dimension error: {0}")]
    Dimension(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AthenaError>;
