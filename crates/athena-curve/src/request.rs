//! Curve requests in plain coordinates, as a front end collects them.
//!
//! A request carries points as coordinate lists of length 2 or 3; evaluation checks
//! that the dimensionality is uniform and dispatches to the typed evaluators.

use std::fmt;

use athena_core::traits::Validate;
use athena_core::{AthenaError, Result, Tolerance};
use athena_math::{Aabb3, CurvePoint, DVec2, DVec3};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::curve::{BSplineEvaluator, BezierEvaluator, CurveEvaluator};
use crate::nurbs::{parse_knots, KnotType};
use crate::polygon::{ControlPolygon, SampledCurve};
use crate::sampler::SamplingConfig;

/// Which family of curve to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    #[serde(rename = "bezier")]
    Bezier,
    #[serde(rename = "bspline", alias = "b_spline")]
    BSpline,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Bezier => write!(f, "Bezier Curve"),
            CurveKind::BSpline => write!(f, "B-Spline"),
        }
    }
}

/// Custom knots, either as numbers or in the `[0, 1, 2, ...]` text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomKnots {
    List(Vec<f64>),
    Text(String),
}

impl CustomKnots {
    pub fn values(&self) -> Result<Vec<f64>> {
        match self {
            CustomKnots::List(knots) => Ok(knots.clone()),
            CustomKnots::Text(text) => parse_knots(text),
        }
    }
}

fn default_samples() -> usize {
    SamplingConfig::DEFAULT_SAMPLES
}

/// One curve evaluation: curve family, control points, and the settings for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRequest {
    pub curve: CurveKind,
    pub points: Vec<Vec<f64>>,
    /// Bezier degree (defaults to `points - 1`) or B-spline degree `k`
    /// (defaults to 2, or 1 for two control points).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<usize>,
    #[serde(default)]
    pub knots: KnotType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_knots: Option<CustomKnots>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Weights closer than this count as equal.
    #[serde(default)]
    pub tolerance: Tolerance,
}

impl CurveRequest {
    pub fn bezier(points: Vec<Vec<f64>>) -> Self {
        Self {
            curve: CurveKind::Bezier,
            points,
            degree: None,
            knots: KnotType::default(),
            custom_knots: None,
            weights: None,
            samples: default_samples(),
            tolerance: Tolerance::default(),
        }
    }

    pub fn bspline(points: Vec<Vec<f64>>, degree: usize, knots: KnotType) -> Self {
        Self {
            curve: CurveKind::BSpline,
            degree: Some(degree),
            knots,
            ..Self::bezier(points)
        }
    }

    /// The degree this request evaluates with.
    pub fn resolved_degree(&self) -> usize {
        let n = self.points.len().saturating_sub(1);
        match (self.degree, self.curve) {
            (Some(degree), _) => degree,
            (None, CurveKind::Bezier) => n,
            (None, CurveKind::BSpline) => n.clamp(1, 2),
        }
    }

    /// Coordinate count shared by every point (2 or 3).
    pub fn dimension(&self) -> Result<usize> {
        let first = self.points.first().ok_or(AthenaError::ControlPointCount {
            expected: 2,
            actual: 0,
        })?;
        let dim = first.len();
        if dim != 2 && dim != 3 {
            return Err(AthenaError::Dimension(format!(
                "points must have 2 or 3 coordinates, V0 has {}",
                dim
            )));
        }
        if let Some(i) = self.points.iter().position(|p| p.len() != dim) {
            return Err(AthenaError::Dimension(format!(
                "V0 has {} coordinates but V{} has {}",
                dim,
                i,
                self.points[i].len()
            )));
        }
        Ok(dim)
    }

    fn polygon<P: CurvePoint>(&self) -> Result<ControlPolygon<P>> {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, coords)| {
                P::from_coords(coords).ok_or_else(|| {
                    AthenaError::Dimension(format!(
                        "V{} has {} coordinates, expected {}",
                        i,
                        coords.len(),
                        P::DIM
                    ))
                })
            })
            .collect::<Result<Vec<P>>>()?;
        ControlPolygon::new(points)
    }

    /// The sampled curve and whether its weights make it rational.
    fn evaluate_typed<P: CurvePoint>(&self) -> Result<(SampledCurve<P>, bool)> {
        let polygon = self.polygon::<P>()?;
        let sampling = SamplingConfig::new(self.samples);
        let degree = self.resolved_degree();

        match self.curve {
            CurveKind::Bezier => {
                if self.weights.is_some() || self.custom_knots.is_some() {
                    warn!("Bezier request ignores knots and weights");
                }
                let curve = BezierEvaluator::new(degree)?
                    .with_sampling(sampling)
                    .evaluate(&polygon)?;
                Ok((curve, false))
            }
            CurveKind::BSpline => {
                let mut evaluator = BSplineEvaluator::new(degree, self.knots)
                    .with_sampling(sampling)
                    .with_tolerance(self.tolerance);
                if self.knots == KnotType::Custom {
                    if let Some(custom) = &self.custom_knots {
                        evaluator = evaluator.with_custom_knots(custom.values()?);
                    }
                }
                if let Some(weights) = &self.weights {
                    evaluator = evaluator.with_weights(weights.clone());
                }
                let curve = evaluator.evaluate(&polygon)?;
                Ok((curve, evaluator.is_rational()))
            }
        }
    }

    /// Evaluate into a planar or spatial curve depending on the point dimension.
    pub fn evaluate(&self) -> Result<EvaluatedCurve> {
        let (curve, rational) = match self.dimension()? {
            2 => {
                let (curve, rational) = self.evaluate_typed::<DVec2>()?;
                (SampledPoints::Planar(curve), rational)
            }
            _ => {
                let (curve, rational) = self.evaluate_typed::<DVec3>()?;
                (SampledPoints::Spatial(curve), rational)
            }
        };
        Ok(EvaluatedCurve {
            kind: self.curve,
            rational,
            curve,
        })
    }
}

impl Validate for CurveRequest {
    fn validate(&self) -> Result<()> {
        self.dimension()?;
        SamplingConfig::new(self.samples).validate()
    }
}

/// A sampled curve of either dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampledPoints {
    Planar(SampledCurve<DVec2>),
    Spatial(SampledCurve<DVec3>),
}

/// The result of a [`CurveRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedCurve {
    pub kind: CurveKind,
    /// Whether non-uniform weights were applied.
    pub rational: bool,
    pub curve: SampledPoints,
}

fn coords_of<P: CurvePoint>(points: &[P]) -> Vec<Vec<f64>> {
    points.iter().map(|p| p.coords()).collect()
}

impl EvaluatedCurve {
    pub fn dimension(&self) -> usize {
        match &self.curve {
            SampledPoints::Planar(_) => DVec2::DIM,
            SampledPoints::Spatial(_) => DVec3::DIM,
        }
    }

    pub fn len(&self) -> usize {
        match &self.curve {
            SampledPoints::Planar(c) => c.len(),
            SampledPoints::Spatial(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sampled curve points as coordinate lists.
    pub fn points(&self) -> Vec<Vec<f64>> {
        match &self.curve {
            SampledPoints::Planar(c) => coords_of(c.points()),
            SampledPoints::Spatial(c) => coords_of(c.points()),
        }
    }

    /// The originating control points as coordinate lists.
    pub fn control_points(&self) -> Vec<Vec<f64>> {
        match &self.curve {
            SampledPoints::Planar(c) => coords_of(c.control_polygon().points()),
            SampledPoints::Spatial(c) => coords_of(c.control_polygon().points()),
        }
    }

    /// Bounds of the curve together with its control polygon.
    pub fn bounds(&self) -> Option<Aabb3> {
        fn both<P: CurvePoint>(c: &SampledCurve<P>) -> Option<Aabb3> {
            let curve = Aabb3::from_points(c.points())?;
            let polygon = Aabb3::from_points(c.control_polygon().points())?;
            Some(curve.merge(&polygon))
        }
        match &self.curve {
            SampledPoints::Planar(c) => both(c),
            SampledPoints::Spatial(c) => both(c),
        }
    }
}
