//! Control-point abstraction over planar and spatial coordinates.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use glam::{DVec2, DVec3};

/// A point a curve can be evaluated over: 2D (`DVec2`) or 3D (`DVec3`).
///
/// Every control point of a polygon, and every sampled curve point, shares one
/// implementing type, so a polygon can never mix dimensionalities.
pub trait CurvePoint:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + AddAssign
    + 'static
{
    /// Number of coordinates (2 or 3).
    const DIM: usize;

    /// The origin.
    const ZERO: Self;

    /// Build a point from exactly `DIM` coordinates.
    fn from_coords(coords: &[f64]) -> Option<Self>;

    /// The coordinates in x, y(, z) order.
    fn coords(&self) -> Vec<f64>;

    /// Embed into 3D space (planar points land on z = 0).
    fn to_point3(self) -> DVec3;

    fn is_finite(self) -> bool;

    fn midpoint(self, other: Self) -> Self {
        (self + other) * 0.5
    }
}

impl CurvePoint for DVec2 {
    const DIM: usize = 2;
    const ZERO: Self = DVec2::ZERO;

    fn from_coords(coords: &[f64]) -> Option<Self> {
        match coords {
            [x, y] => Some(DVec2::new(*x, *y)),
            _ => None,
        }
    }

    fn coords(&self) -> Vec<f64> {
        vec![self.x, self.y]
    }

    fn to_point3(self) -> DVec3 {
        self.extend(0.0)
    }

    fn is_finite(self) -> bool {
        DVec2::is_finite(self)
    }
}

impl CurvePoint for DVec3 {
    const DIM: usize = 3;
    const ZERO: Self = DVec3::ZERO;

    fn from_coords(coords: &[f64]) -> Option<Self> {
        match coords {
            [x, y, z] => Some(DVec3::new(*x, *y, *z)),
            _ => None,
        }
    }

    fn coords(&self) -> Vec<f64> {
        vec![self.x, self.y, self.z]
    }

    fn to_point3(self) -> DVec3 {
        self
    }

    fn is_finite(self) -> bool {
        DVec3::is_finite(self)
    }
}
