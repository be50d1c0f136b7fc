//! Control polygons and sampled curves.

use std::ops::Index;

use athena_core::{AthenaError, Result};
use athena_math::CurvePoint;
use serde::{Deserialize, Serialize};

/// An ordered, fixed sequence of control points `V[0..=n]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPolygon<P> {
    points: Vec<P>,
}

impl<P: CurvePoint> ControlPolygon<P> {
    /// Create a polygon, rejecting empty input and non-finite coordinates.
    pub fn new(points: Vec<P>) -> Result<Self> {
        if points.is_empty() {
            return Err(AthenaError::ControlPointCount {
                expected: 1,
                actual: 0,
            });
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(AthenaError::InvalidControlPoint(format!(
                "control point V{} has a non-finite coordinate: {:?}",
                i, points[i]
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `n`, the index of the last control point.
    pub fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    pub fn first(&self) -> P {
        self.points[0]
    }

    pub fn last(&self) -> P {
        self.points[self.points.len() - 1]
    }
}

impl<P> Index<usize> for ControlPolygon<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.points[index]
    }
}

/// Points evaluated along a curve, paired with the polygon they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledCurve<P> {
    points: Vec<P>,
    parameters: Vec<f64>,
    control_polygon: ControlPolygon<P>,
}

impl<P: CurvePoint> SampledCurve<P> {
    pub(crate) fn new(points: Vec<P>, parameters: Vec<f64>, control_polygon: ControlPolygon<P>) -> Self {
        debug_assert_eq!(points.len(), parameters.len());
        Self {
            points,
            parameters,
            control_polygon,
        }
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Parameter value each point was sampled at.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn control_polygon(&self) -> &ControlPolygon<P> {
        &self.control_polygon
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<P> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<P> {
        self.points.last().copied()
    }
}
