//! Curve evaluators.

mod bezier;
mod bspline;

use athena_core::Result;
use athena_math::CurvePoint;

use crate::polygon::{ControlPolygon, SampledCurve};

pub use bezier::{basis_matrix, evaluate_bezier, BezierEvaluator, MAX_BEZIER_DEGREE};
pub use bspline::{curve_point, evaluate_bspline, BSplineEvaluator};

/// Turns a control polygon into a sampled curve.
pub trait CurveEvaluator<P: CurvePoint>: Send + Sync {
    /// Evaluate the curve over its whole parameter domain.
    fn evaluate(&self, polygon: &ControlPolygon<P>) -> Result<SampledCurve<P>>;
}
