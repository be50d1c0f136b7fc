//! Project Athena curve evaluation: Bezier curves, B-splines, and NURBS.

pub mod batch;
pub mod curve;
pub mod nurbs;
pub mod polygon;
pub mod request;
pub mod sampler;

pub use batch::{evaluate_batch, evaluate_many};
pub use curve::{evaluate_bezier, evaluate_bspline, BSplineEvaluator, BezierEvaluator, CurveEvaluator};
pub use nurbs::{KnotType, KnotVector};
pub use polygon::{ControlPolygon, SampledCurve};
pub use request::{CurveKind, CurveRequest, EvaluatedCurve, SampledPoints};
pub use sampler::{CurveSampler, SamplingConfig};
