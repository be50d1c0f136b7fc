//! B-spline and NURBS curve sampling.

use athena_core::{AthenaError, Result, Tolerance};
use athena_math::CurvePoint;
use log::{debug, warn};

use super::CurveEvaluator;
use crate::nurbs::{check_degree, BasisTable, KnotType, KnotVector};
use crate::polygon::{ControlPolygon, SampledCurve};
use crate::sampler::{CurveSampler, SamplingConfig};

/// Rational weighted sum `Σ V[i]·N(i,k)(t)·w[i] / Σ N(i,k)(t)·w[i]` at parameter `t`.
///
/// Fails with [`AthenaError::InvalidWeights`] where every control point supporting `t`
/// has zero weight and the quotient is undefined.
pub fn curve_point<P: CurvePoint>(
    knots: &KnotVector,
    degree: usize,
    control_points: &[P],
    weights: &[f64],
    t: f64,
) -> Result<P> {
    let expected = KnotVector::required_len(control_points.len(), degree);
    if knots.len() != expected {
        return Err(AthenaError::InvalidKnotVectorLength {
            expected,
            actual: knots.len(),
        });
    }
    if weights.len() != control_points.len() {
        return Err(AthenaError::InvalidWeights(format!(
            "{} weights for {} control points",
            weights.len(),
            control_points.len()
        )));
    }

    let basis = BasisTable::evaluate(knots, degree, t)?;

    let mut point = P::ZERO;
    let mut w = 0.0;
    for (i, (&cp, &weight)) in control_points.iter().zip(weights).enumerate() {
        let bw = basis.get(i) * weight;
        point += cp * bw;
        w += bw;
    }

    if w.abs() < 1e-15 {
        return Err(AthenaError::InvalidWeights(format!(
            "weights vanish at t={}: every control point supporting it has weight 0",
            t
        )));
    }
    Ok(point / w)
}

/// Samples a B-spline (optionally rational) of fixed degree over its knot domain.
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineEvaluator {
    degree: usize,
    knot_type: KnotType,
    custom_knots: Option<Vec<f64>>,
    weights: Option<Vec<f64>>,
    sampling: SamplingConfig,
    tolerance: Tolerance,
}

impl BSplineEvaluator {
    pub fn new(degree: usize, knot_type: KnotType) -> Self {
        Self {
            degree,
            knot_type,
            custom_knots: None,
            weights: None,
            sampling: SamplingConfig::default(),
            tolerance: Tolerance::default(),
        }
    }

    /// Knots used when the knot type is [`KnotType::Custom`].
    pub fn with_custom_knots(mut self, knots: Vec<f64>) -> Self {
        self.custom_knots = Some(knots);
        self
    }

    /// Per-control-point NURBS weights. Without them every weight is 1.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knot_type(&self) -> KnotType {
        self.knot_type
    }

    /// Whether the supplied weights differ from one another. Equal weights cancel in the
    /// quotient and give the plain B-spline.
    pub fn is_rational(&self) -> bool {
        match self.weights.as_deref() {
            Some([first, rest @ ..]) => rest
                .iter()
                .any(|w| !self.tolerance.parametric_eq(*w, *first)),
            _ => false,
        }
    }

    /// The knot vector this evaluator uses for `point_count` control points.
    pub fn knot_vector(&self, point_count: usize) -> Result<KnotVector> {
        KnotVector::build(
            self.knot_type,
            point_count,
            self.degree,
            self.custom_knots.as_deref(),
        )
    }

    fn resolve_weights(&self, point_count: usize) -> Result<Vec<f64>> {
        let Some(weights) = &self.weights else {
            return Ok(vec![1.0; point_count]);
        };
        if weights.len() != point_count {
            return Err(AthenaError::InvalidWeights(format!(
                "{} weights for {} control points",
                weights.len(),
                point_count
            )));
        }
        if let Some(i) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
            return Err(AthenaError::InvalidWeights(format!(
                "weight {} is {}; weights must be finite and non-negative",
                i, weights[i]
            )));
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err(AthenaError::InvalidWeights(
                "at least one weight must be positive".into(),
            ));
        }
        Ok(weights.clone())
    }
}

/// Fix the end samples the half-open basis leaves ill-defined for the integer knot types.
fn apply_boundary_conditions<P: CurvePoint>(
    knot_type: KnotType,
    polygon: &ControlPolygon<P>,
    points: &mut [P],
) {
    let n = polygon.last_index();
    let last = points.len() - 1;
    match knot_type {
        KnotType::Uniform => {
            points[0] = polygon[0].midpoint(polygon[1]);
            points[last] = polygon[n].midpoint(polygon[n - 1]);
        }
        KnotType::UniformOpen => {
            points[0] = polygon[0];
            points[last] = polygon[n];
        }
        KnotType::Custom => {}
    }
}

impl<P: CurvePoint> CurveEvaluator<P> for BSplineEvaluator {
    fn evaluate(&self, polygon: &ControlPolygon<P>) -> Result<SampledCurve<P>> {
        let point_count = polygon.len();
        check_degree(point_count, self.degree)?;
        let knots = self.knot_vector(point_count)?;
        let weights = self.resolve_weights(point_count)?;

        let (start, end) = knots.domain(self.degree);
        let params = CurveSampler::new(start, end, self.sampling)?.parameters();
        debug!(
            "B-spline degree {} over {} control points: {} samples on [{}, {}], rational={}",
            self.degree,
            point_count,
            params.len(),
            start,
            end,
            self.is_rational()
        );

        let mut points = params
            .iter()
            .map(|&t| curve_point(&knots, self.degree, polygon.points(), &weights, t))
            .collect::<Result<Vec<P>>>()?;

        apply_boundary_conditions(self.knot_type, polygon, &mut points);

        Ok(SampledCurve::new(points, params, polygon.clone()))
    }
}

/// Sample a B-spline of degree `k` (`1 <= k <= n`) at 101 parameter values spanning
/// `knots[k]..=knots[n+1]`.
///
/// `knots` is required for [`KnotType::Custom`] and ignored otherwise; `weights`
/// defaults to all ones.
pub fn evaluate_bspline<P: CurvePoint>(
    degree: usize,
    control_points: &[P],
    knot_type: KnotType,
    knots: Option<&[f64]>,
    weights: Option<&[f64]>,
) -> Result<SampledCurve<P>> {
    let polygon = ControlPolygon::new(control_points.to_vec())?;
    let mut evaluator = BSplineEvaluator::new(degree, knot_type);
    match (knot_type, knots) {
        (KnotType::Custom, Some(knots)) => evaluator = evaluator.with_custom_knots(knots.to_vec()),
        (_, Some(_)) => warn!("Ignoring supplied knots for a {} knot vector", knot_type),
        (_, None) => {}
    }
    if let Some(weights) = weights {
        evaluator = evaluator.with_weights(weights.to_vec());
    }
    evaluator.evaluate(&polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use athena_math::{DVec2, DVec3};
    use approx::assert_abs_diff_eq;

    fn arch() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(3.0, 0.0),
        ]
    }

    #[test]
    fn test_uniform_open_interpolates_ends() {
        let curve = evaluate_bspline(2, &arch(), KnotType::UniformOpen, None, None).unwrap();
        assert_eq!(curve.len(), 101);
        assert_eq!(curve.first().unwrap(), DVec2::new(0.0, 0.0));
        assert_eq!(curve.last().unwrap(), DVec2::new(3.0, 0.0));
        assert_eq!(curve.parameters()[0], 2.0);
        assert_eq!(curve.parameters()[100], 4.0);
    }

    #[test]
    fn test_uniform_end_midpoints() {
        let curve = evaluate_bspline(2, &arch(), KnotType::Uniform, None, None).unwrap();
        assert_eq!(curve.first().unwrap(), DVec2::new(0.5, 0.5));
        assert_eq!(curve.last().unwrap(), DVec2::new(2.5, 0.5));
    }

    #[test]
    fn test_uniform_quadratic_interior() {
        // On each span a uniform quadratic blends 1/2, 1/2 at the span start
        let curve = evaluate_bspline(2, &arch(), KnotType::Uniform, None, None).unwrap();
        // t = 3.0 is sample 50
        let p = curve.points()[50];
        assert_abs_diff_eq!(p.x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_clamped_reaches_last_point() {
        let knots = [0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0];
        let curve = evaluate_bspline(2, &arch(), KnotType::Custom, Some(&knots), None).unwrap();
        let last = curve.last().unwrap();
        assert_abs_diff_eq!(last.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(last.y, 0.0, epsilon = 1e-12);
        let first = curve.first().unwrap();
        assert_abs_diff_eq!(first.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_uniform_matches_interior_of_uniform() {
        let knots: Vec<f64> = (0..8).map(f64::from).collect();
        let custom = evaluate_bspline(3, &arch(), KnotType::Custom, Some(&knots), None).unwrap();
        let uniform = evaluate_bspline(3, &arch(), KnotType::Uniform, None, None).unwrap();
        for i in 1..100 {
            let (a, b) = (custom.points()[i], uniform.points()[i]);
            assert!((a - b).length() < 1e-12, "sample {} differs: {:?} vs {:?}", i, a, b);
        }
        // Custom ends keep the evaluated value: V1/6 + 2*V2/3 + V3/6 at t = 4
        let end = custom.last().unwrap();
        assert_abs_diff_eq!(end.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end.y, 5.0 / 6.0, epsilon = 1e-12);
        assert_eq!(uniform.last().unwrap(), DVec2::new(2.5, 0.5));
    }

    #[test]
    fn test_custom_requires_knots() {
        let err = evaluate_bspline(2, &arch(), KnotType::Custom, None, None).unwrap_err();
        assert!(matches!(err, AthenaError::InvalidKnotVectorContent(_)));
    }

    #[test]
    fn test_custom_wrong_length() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        let err = evaluate_bspline(2, &arch(), KnotType::Custom, Some(&knots), None).unwrap_err();
        assert!(matches!(
            err,
            AthenaError::InvalidKnotVectorLength {
                expected: 7,
                actual: 4
            }
        ));
    }

    #[test]
    fn test_degree_out_of_range() {
        for degree in [0, 4, 9] {
            let err = evaluate_bspline(degree, &arch(), KnotType::Uniform, None, None).unwrap_err();
            assert!(matches!(err, AthenaError::IndexRange(_)), "degree {}", degree);
        }
    }

    #[test]
    fn test_equal_weights_match_unweighted() {
        let plain = evaluate_bspline(3, &arch(), KnotType::UniformOpen, None, None).unwrap();
        let weights = [2.5; 4];
        let weighted =
            evaluate_bspline(3, &arch(), KnotType::UniformOpen, None, Some(&weights)).unwrap();
        for (a, b) in plain.points().iter().zip(weighted.points()) {
            assert!((*a - *b).length() < 1e-12);
        }
    }

    #[test]
    fn test_is_rational() {
        let plain = BSplineEvaluator::new(2, KnotType::Uniform);
        assert!(!plain.is_rational());
        assert!(!plain.clone().with_weights(vec![3.0; 4]).is_rational());
        assert!(plain.clone().with_weights(vec![1.0, 2.0, 1.0]).is_rational());
        let coarse = plain
            .with_tolerance(Tolerance::new(1e-3))
            .with_weights(vec![1.0, 1.0001, 1.0]);
        assert!(!coarse.is_rational());
    }

    #[test]
    fn test_heavier_weight_pulls_curve() {
        let pts = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 2.0), DVec2::new(2.0, 0.0)];
        let plain = evaluate_bspline(2, &pts, KnotType::UniformOpen, None, None).unwrap();
        let heavy =
            evaluate_bspline(2, &pts, KnotType::UniformOpen, None, Some(&[1.0, 4.0, 1.0])).unwrap();
        assert!(heavy.points()[50].y > plain.points()[50].y);
    }

    #[test]
    fn test_nurbs_circle() {
        // Unit circle as a rational quadratic with 9 control points
        let w = 1.0_f64 / 2.0_f64.sqrt();
        let knots = [0.0, 0.0, 0.0, 0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 1.0, 1.0];
        let cps = [
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(-1.0, 1.0, 0.0),
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(0.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
        ];
        let weights = [1.0, w, 1.0, w, 1.0, w, 1.0, w, 1.0];
        let curve =
            evaluate_bspline(2, &cps, KnotType::Custom, Some(&knots), Some(&weights)).unwrap();
        for (t, p) in curve.parameters().iter().zip(curve.points()) {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!(
                (r - 1.0).abs() < 1e-8,
                "NURBS circle point at t={} has radius {}, expected 1.0",
                t,
                r
            );
            assert!(p.z.abs() < 1e-10);
        }
    }

    #[test]
    fn test_invalid_weights() {
        let err = evaluate_bspline(2, &arch(), KnotType::Uniform, None, Some(&[1.0, 1.0]))
            .unwrap_err();
        assert!(matches!(err, AthenaError::InvalidWeights(_)));

        let err = evaluate_bspline(2, &arch(), KnotType::Uniform, None, Some(&[1.0, -1.0, 1.0, 1.0]))
            .unwrap_err();
        assert!(matches!(err, AthenaError::InvalidWeights(_)));

        let err = evaluate_bspline(2, &arch(), KnotType::Uniform, None, Some(&[0.0; 4]))
            .unwrap_err();
        assert!(matches!(err, AthenaError::InvalidWeights(_)));
    }

    #[test]
    fn test_zero_weight_span_rejected() {
        let pts = [
            DVec2::new(5.0, 5.0),
            DVec2::new(6.0, 7.0),
            DVec2::new(8.0, 7.0),
            DVec2::new(9.0, 5.0),
        ];
        let weights = [1.0, 0.0, 0.0, 1.0];
        let err = evaluate_bspline(1, &pts, KnotType::UniformOpen, None, Some(&weights)).unwrap_err();
        assert!(matches!(err, AthenaError::InvalidWeights(_)));

        // The middle span [2, 3] is supported only by V1 and V2
        let kv = KnotVector::uniform_open(4, 1).unwrap();
        assert!(curve_point(&kv, 1, &pts, &weights, 2.5).is_err());
        let p = curve_point(&kv, 1, &pts, &weights, 1.5).unwrap();
        assert_eq!(p, pts[0]);
    }

    #[test]
    fn test_single_zero_weight_allowed() {
        let pts = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 2.0), DVec2::new(2.0, 0.0)];
        let curve =
            evaluate_bspline(2, &pts, KnotType::UniformOpen, None, Some(&[1.0, 0.0, 1.0])).unwrap();
        // A zero-weight middle point flattens the curve onto the chord
        assert!(curve.points().iter().all(|p| p.y.abs() < 1e-12));
    }

    #[test]
    fn test_curve_point_checks_lengths() {
        let kv = KnotVector::uniform(4, 2).unwrap();
        let err = curve_point(&kv, 3, &arch(), &[1.0; 4], 2.5).unwrap_err();
        assert!(matches!(err, AthenaError::InvalidKnotVectorLength { .. }));
    }

    #[test]
    fn test_evaluator_reusable_across_polygons() {
        let evaluator = BSplineEvaluator::new(1, KnotType::UniformOpen)
            .with_sampling(SamplingConfig::new(3));
        let a = ControlPolygon::new(vec![DVec2::ZERO, DVec2::new(2.0, 0.0)]).unwrap();
        let b = ControlPolygon::new(vec![DVec3::ZERO, DVec3::Z, DVec3::ONE]).unwrap();
        let ca = evaluator.evaluate(&a).unwrap();
        let cb = evaluator.evaluate(&b).unwrap();
        assert_eq!(ca.points(), &[DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)]);
        assert_eq!(cb.len(), 3);
        assert_eq!(cb.points()[1], DVec3::Z);
    }
}
