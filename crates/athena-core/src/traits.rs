use crate::error::Result;

/// Validate an input value before it is used for evaluation.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
