/// Tolerances for curve evaluation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Tolerance for parameter-space comparisons (knots, weights)
    pub parametric: f64,
}

impl Tolerance {
    pub const DEFAULT_PARAMETRIC: f64 = 1e-12;

    pub fn new(parametric: f64) -> Self {
        Self { parametric }
    }

    pub fn default_precision() -> Self {
        Self::new(Self::DEFAULT_PARAMETRIC)
    }

    /// Check if two parameter values are equal within parametric tolerance
    pub fn parametric_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.parametric
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
