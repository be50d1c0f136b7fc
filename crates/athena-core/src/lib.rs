pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{AthenaError, Result};
pub use tolerance::Tolerance;
