//! Bezier curves in basis-matrix form.
//!
//! A degree-`n` curve is `point(t) = T(t) · M · V` where `T(t) = [t^n, ..., t, 1]`,
//! `V` holds one control point per row and `M` converts the Bernstein basis to the
//! power basis: row `r` carries the coefficients of `t^(n-r)`, column `c` belongs to
//! control point `V[c]`.

use athena_core::{AthenaError, Result};
use athena_math::CurvePoint;
use log::debug;
use nalgebra::DMatrix;

use super::CurveEvaluator;
use crate::polygon::{ControlPolygon, SampledCurve};
use crate::sampler::{CurveSampler, SamplingConfig};

/// Highest degree with a basis matrix.
pub const MAX_BEZIER_DEGREE: usize = 4;

#[rustfmt::skip]
const BASIS_ORDER_2: [f64; 4] = [
    -1.0, 1.0,
    1.0, 0.0,
];

#[rustfmt::skip]
const BASIS_ORDER_3: [f64; 9] = [
    1.0, -2.0, 1.0,
    -2.0, 2.0, 0.0,
    1.0, 0.0, 0.0,
];

#[rustfmt::skip]
const BASIS_ORDER_4: [f64; 16] = [
    -1.0, 3.0, -3.0, 1.0,
    3.0, -6.0, 3.0, 0.0,
    -3.0, 3.0, 0.0, 0.0,
    1.0, 0.0, 0.0, 0.0,
];

#[rustfmt::skip]
const BASIS_ORDER_5: [f64; 25] = [
    1.0, -4.0, 6.0, -4.0, 1.0,
    -4.0, 12.0, -12.0, 4.0, 0.0,
    6.0, -12.0, 6.0, 0.0, 0.0,
    -4.0, 4.0, 0.0, 0.0, 0.0,
    1.0, 0.0, 0.0, 0.0, 0.0,
];

/// Basis matrix for a curve of the given degree, in row-major order.
fn basis_entries(degree: usize) -> Option<&'static [f64]> {
    match degree {
        1 => Some(&BASIS_ORDER_2[..]),
        2 => Some(&BASIS_ORDER_3[..]),
        3 => Some(&BASIS_ORDER_4[..]),
        4 => Some(&BASIS_ORDER_5[..]),
        _ => None,
    }
}

/// The `(degree+1) x (degree+1)` Bernstein-to-power basis matrix.
pub fn basis_matrix(degree: usize) -> Result<DMatrix<f64>> {
    let entries = basis_entries(degree).ok_or(AthenaError::UnsupportedDegree { degree })?;
    let order = degree + 1;
    Ok(DMatrix::from_row_slice(order, order, entries))
}

/// Power-basis rows `[t^n, ..., t, 1]`, one per parameter value.
fn power_basis(degree: usize, params: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(params.len(), degree + 1, |row, col| {
        params[row].powi((degree - col) as i32)
    })
}

/// Control points as a matrix with one point per row.
fn point_matrix<P: CurvePoint>(points: &[P]) -> DMatrix<f64> {
    DMatrix::from_row_iterator(points.len(), P::DIM, points.iter().flat_map(|p| p.coords()))
}

/// Samples a Bezier curve of fixed degree over `t` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierEvaluator {
    degree: usize,
    basis: DMatrix<f64>,
    sampling: SamplingConfig,
}

impl BezierEvaluator {
    /// Fails with [`AthenaError::UnsupportedDegree`] outside `1..=4`.
    pub fn new(degree: usize) -> Result<Self> {
        Ok(Self {
            degree,
            basis: basis_matrix(degree)?,
            sampling: SamplingConfig::default(),
        })
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    fn check_polygon<P: CurvePoint>(&self, polygon: &ControlPolygon<P>) -> Result<()> {
        if polygon.len() != self.degree + 1 {
            return Err(AthenaError::ControlPointCount {
                expected: self.degree + 1,
                actual: polygon.len(),
            });
        }
        Ok(())
    }

    /// `T · M · V` for each parameter value.
    fn evaluate_params<P: CurvePoint>(
        &self,
        polygon: &ControlPolygon<P>,
        params: &[f64],
    ) -> Result<Vec<P>> {
        let product = power_basis(self.degree, params) * &self.basis * point_matrix(polygon.points());
        product
            .row_iter()
            .map(|row| {
                let coords: Vec<f64> = row.iter().copied().collect();
                P::from_coords(&coords).ok_or_else(|| {
                    AthenaError::Dimension(format!(
                        "expected {} coordinates, got {}",
                        P::DIM,
                        coords.len()
                    ))
                })
            })
            .collect()
    }

    /// Evaluate a single point at parameter `t`.
    pub fn point_at<P: CurvePoint>(&self, polygon: &ControlPolygon<P>, t: f64) -> Result<P> {
        self.check_polygon(polygon)?;
        let mut points = self.evaluate_params(polygon, &[t])?;
        points
            .pop()
            .ok_or_else(|| AthenaError::IndexRange("no point evaluated".into()))
    }
}

impl<P: CurvePoint> CurveEvaluator<P> for BezierEvaluator {
    fn evaluate(&self, polygon: &ControlPolygon<P>) -> Result<SampledCurve<P>> {
        self.check_polygon(polygon)?;
        let params = CurveSampler::unit(self.sampling)?.parameters();
        debug!(
            "Bezier degree {}: {} samples over [0, 1]",
            self.degree,
            params.len()
        );
        let points = self.evaluate_params(polygon, &params)?;
        Ok(SampledCurve::new(points, params, polygon.clone()))
    }
}

/// Sample a Bezier curve of degree `1..=4` at 101 evenly spaced `t` in `[0, 1]`.
///
/// `control_points` must hold exactly `degree + 1` points.
pub fn evaluate_bezier<P: CurvePoint>(degree: usize, control_points: &[P]) -> Result<SampledCurve<P>> {
    let evaluator = BezierEvaluator::new(degree)?;
    let polygon = ControlPolygon::new(control_points.to_vec())?;
    evaluator.evaluate(&polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use athena_math::{DVec2, DVec3};
    use approx::assert_abs_diff_eq;

    fn binomial(n: usize, k: usize) -> f64 {
        (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
    }

    /// Coefficient of `t^p` in the Bernstein polynomial `B(c, n)`.
    fn bernstein_coefficient(n: usize, c: usize, p: usize) -> f64 {
        if p < c {
            return 0.0;
        }
        let sign = if (p - c) % 2 == 0 { 1.0 } else { -1.0 };
        sign * binomial(n, c) * binomial(n - c, p - c)
    }

    #[test]
    fn test_matrices_match_binomial_expansion() {
        for degree in 1..=MAX_BEZIER_DEGREE {
            let m = basis_matrix(degree).unwrap();
            for row in 0..=degree {
                for col in 0..=degree {
                    let expected = bernstein_coefficient(degree, col, degree - row);
                    assert_eq!(m[(row, col)], expected, "degree {} at ({}, {})", degree, row, col);
                }
            }
        }
    }

    #[test]
    fn test_unsupported_degree() {
        assert!(matches!(
            BezierEvaluator::new(0),
            Err(AthenaError::UnsupportedDegree { degree: 0 })
        ));
        assert!(matches!(
            BezierEvaluator::new(5),
            Err(AthenaError::UnsupportedDegree { degree: 5 })
        ));
    }

    #[test]
    fn test_cubic_midpoint() {
        let polygon = ControlPolygon::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 2.0),
            DVec2::new(3.0, 2.0),
            DVec2::new(4.0, 0.0),
        ])
        .unwrap();
        let bezier = BezierEvaluator::new(3).unwrap();
        let p = bezier.point_at(&polygon, 0.5).unwrap();
        assert_abs_diff_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_is_lerp() {
        let curve = evaluate_bezier(1, &[DVec3::new(0.0, 0.0, 0.0), DVec3::new(2.0, 4.0, 6.0)]).unwrap();
        assert_eq!(curve.len(), 101);
        let p = curve.points()[25];
        assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_point_count() {
        let err = evaluate_bezier(3, &[DVec2::ZERO, DVec2::X, DVec2::Y]).unwrap_err();
        assert!(matches!(
            err,
            AthenaError::ControlPointCount {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_custom_sample_count() {
        let polygon = ControlPolygon::new(vec![DVec2::ZERO, DVec2::new(1.0, 1.0), DVec2::X]).unwrap();
        let curve = BezierEvaluator::new(2)
            .unwrap()
            .with_sampling(SamplingConfig::new(11))
            .evaluate(&polygon)
            .unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(curve.parameters()[10], 1.0);
        // Quadratic apex: 0.25*P0 + 0.5*P1 + 0.25*P2
        assert_abs_diff_eq!(curve.points()[5].y, 0.5, epsilon = 1e-12);
    }
}
