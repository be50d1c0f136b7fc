//! Parallel evaluation of independent curves.

use athena_core::Result;
use athena_math::CurvePoint;
use log::trace;
use rayon::prelude::*;

use crate::curve::CurveEvaluator;
use crate::polygon::{ControlPolygon, SampledCurve};
use crate::request::{CurveRequest, EvaluatedCurve};

/// Evaluate every request in parallel. Results keep the input order; one failing
/// request does not affect the others.
pub fn evaluate_batch(requests: &[CurveRequest]) -> Vec<Result<EvaluatedCurve>> {
    trace!("Evaluating {} curve requests", requests.len());
    requests.par_iter().map(CurveRequest::evaluate).collect()
}

/// Run one evaluator over many control polygons in parallel.
pub fn evaluate_many<P, E>(evaluator: &E, polygons: &[ControlPolygon<P>]) -> Vec<Result<SampledCurve<P>>>
where
    P: CurvePoint,
    E: CurveEvaluator<P>,
{
    trace!("Evaluating {} control polygons", polygons.len());
    polygons
        .par_iter()
        .map(|polygon| evaluator.evaluate(polygon))
        .collect()
}
