//! Knot vector construction and validation for B-spline/NURBS evaluation.

use std::fmt;
use std::str::FromStr;

use athena_core::{AthenaError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Category of knot vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnotType {
    /// Strictly increasing integers `0, 1, ..., m`.
    #[default]
    Uniform,
    /// Integers with `k + 1` clamped knots at each end; the curve interpolates
    /// its first and last control points.
    UniformOpen,
    /// Caller-supplied sequence.
    Custom,
}

impl fmt::Display for KnotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnotType::Uniform => write!(f, "Uniform"),
            KnotType::UniformOpen => write!(f, "Uniform Open"),
            KnotType::Custom => write!(f, "Custom"),
        }
    }
}

impl FromStr for KnotType {
    type Err = AthenaError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "uniform" => Ok(KnotType::Uniform),
            "uniform_open" | "open" | "clamped" => Ok(KnotType::UniformOpen),
            "custom" => Ok(KnotType::Custom),
            _ => Err(AthenaError::InvalidKnotVectorContent(format!(
                "unknown knot vector category '{}'",
                s
            ))),
        }
    }
}

/// Check that a B-spline of degree `k` can be built over `point_count` control points.
///
/// Requires `1 <= k <= n` where `n + 1 == point_count`.
pub fn check_degree(point_count: usize, degree: usize) -> Result<()> {
    if point_count < 2 {
        return Err(AthenaError::IndexRange(format!(
            "a B-spline needs at least 2 control points, got {}",
            point_count
        )));
    }
    let n = point_count - 1;
    if degree < 1 || degree > n {
        return Err(AthenaError::IndexRange(format!(
            "B-spline degree {} must lie in 1..={} for {} control points",
            degree, n, point_count
        )));
    }
    Ok(())
}

/// A validated, non-decreasing knot vector of length `n + k + 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnotVector {
    knots: Vec<f64>,
}

impl KnotVector {
    /// Number of knots `m + 1` for `point_count = n + 1` control points and degree `k`.
    pub fn required_len(point_count: usize, degree: usize) -> usize {
        point_count + degree + 1
    }

    /// Build a knot vector of the given category.
    ///
    /// `custom` is only read for [`KnotType::Custom`].
    pub fn build(
        knot_type: KnotType,
        point_count: usize,
        degree: usize,
        custom: Option<&[f64]>,
    ) -> Result<Self> {
        let knots = match knot_type {
            KnotType::Uniform => Self::uniform(point_count, degree)?,
            KnotType::UniformOpen => Self::uniform_open(point_count, degree)?,
            KnotType::Custom => {
                let knots = custom.ok_or_else(|| {
                    AthenaError::InvalidKnotVectorContent(
                        "custom knot vector selected but no knots were supplied".into(),
                    )
                })?;
                Self::custom(point_count, degree, knots.to_vec())?
            }
        };
        debug!("{} knot vector (k={}): {}", knot_type, degree, knots);
        Ok(knots)
    }

    /// `0, 1, ..., m`.
    pub fn uniform(point_count: usize, degree: usize) -> Result<Self> {
        check_degree(point_count, degree)?;
        let len = Self::required_len(point_count, degree);
        Ok(Self {
            knots: (0..len).map(|i| i as f64).collect(),
        })
    }

    /// `0, 1, ..., m` with indices `0..k` forced to `k` and `n+2..=m` forced to `n+1`.
    pub fn uniform_open(point_count: usize, degree: usize) -> Result<Self> {
        let mut knots = Self::uniform(point_count, degree)?.knots;
        let n = point_count - 1;
        let k = degree as f64;
        let end = (n + 1) as f64;
        for knot in &mut knots[..degree] {
            *knot = k;
        }
        for knot in &mut knots[n + 2..] {
            *knot = end;
        }
        Ok(Self { knots })
    }

    /// Validate a caller-supplied sequence.
    ///
    /// The length must be exactly `n + k + 2`; values must be finite and non-decreasing,
    /// and the sampling domain `knots[k]..knots[n+1]` must not be empty.
    pub fn custom(point_count: usize, degree: usize, knots: Vec<f64>) -> Result<Self> {
        check_degree(point_count, degree)?;
        let expected = Self::required_len(point_count, degree);
        if knots.len() != expected {
            return Err(AthenaError::InvalidKnotVectorLength {
                expected,
                actual: knots.len(),
            });
        }
        if let Some(i) = knots.iter().position(|k| !k.is_finite()) {
            return Err(AthenaError::InvalidKnotVectorContent(format!(
                "knot {} is not a finite number",
                i
            )));
        }
        if let Some(i) = knots.windows(2).position(|w| w[1] < w[0]) {
            return Err(AthenaError::InvalidKnotVectorContent(format!(
                "knots must be non-decreasing, but knot {} ({}) is greater than knot {} ({})",
                i,
                knots[i],
                i + 1,
                knots[i + 1]
            )));
        }
        let (start, end) = (knots[degree], knots[point_count]);
        if start >= end {
            return Err(AthenaError::InvalidKnotVectorContent(format!(
                "empty parameter domain: knot {} and knot {} are both {}",
                degree, point_count, start
            )));
        }
        Ok(Self { knots })
    }

    /// Parse the bracketed text form (`[0, 1, 2.5, ...]`) and validate it.
    pub fn parse(text: &str, point_count: usize, degree: usize) -> Result<Self> {
        Self::custom(point_count, degree, parse_knots(text)?)
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Parameter domain `(knots[k], knots[n+1])` of a degree-`k` curve.
    pub fn domain(&self, degree: usize) -> (f64, f64) {
        (self.knots[degree], self.knots[self.knots.len() - degree - 1])
    }
}

impl fmt::Display for KnotVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, knot) in self.knots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", knot)?;
        }
        write!(f, "]")
    }
}

/// Parse a comma separated list of numbers, optionally wrapped in `[...]` or `(...)`.
///
/// Only the syntax is checked here; length and ordering are checked by
/// [`KnotVector::custom`].
pub fn parse_knots(text: &str) -> Result<Vec<f64>> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')))
        .unwrap_or(trimmed)
        .trim();

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .trim_end_matches(',')
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| {
                AthenaError::InvalidKnotVectorContent(format!("'{}' is not a number", token))
            })
        })
        .collect()
}
