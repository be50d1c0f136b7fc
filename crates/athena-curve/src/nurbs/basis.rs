//! Cox–de Boor basis functions.
//!
//! The degree-0 functions are indicators of the half-open spans
//! `knots[i] <= t < knots[i+1]`. That rule leaves the right end of the parameter
//! domain uncovered, so when `t` equals the domain end `knots[n+1]` the span that
//! ends there is treated as closed and the span that starts there as empty.

use athena_core::{AthenaError, Result};

use super::knot::KnotVector;

/// A parameter value tagged with whether it sits on the domain's right end.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Param {
    t: f64,
    at_end: bool,
}

impl Param {
    fn new(knots: &[f64], degree: usize, t: f64) -> Self {
        let end = knots[knots.len() - degree - 1];
        Self { t, at_end: t == end }
    }
}

/// `N(i,0)(t)`.
#[inline]
fn span_indicator(knots: &[f64], i: usize, p: Param) -> f64 {
    let (lo, hi) = (knots[i], knots[i + 1]);
    let inside = if p.at_end {
        lo < p.t && p.t <= hi
    } else {
        lo <= p.t && p.t < hi
    };
    if inside {
        1.0
    } else {
        0.0
    }
}

/// Left blending factor `(t - knots[i]) / (knots[i+k] - knots[i])`, zero for repeated knots.
#[inline]
fn left_factor(knots: &[f64], i: usize, k: usize, t: f64) -> f64 {
    let span = knots[i + k] - knots[i];
    if span == 0.0 {
        0.0
    } else {
        (t - knots[i]) / span
    }
}

/// Right blending factor `(knots[i+k+1] - t) / (knots[i+k+1] - knots[i+1])`.
#[inline]
fn right_factor(knots: &[f64], i: usize, k: usize, t: f64) -> f64 {
    let span = knots[i + k + 1] - knots[i + 1];
    if span == 0.0 {
        0.0
    } else {
        (knots[i + k + 1] - t) / span
    }
}

fn cox_de_boor(knots: &[f64], i: usize, k: usize, p: Param) -> f64 {
    if k == 0 {
        return span_indicator(knots, i, p);
    }

    let left = left_factor(knots, i, k, p.t);
    let term1 = if left == 0.0 {
        0.0
    } else {
        left * cox_de_boor(knots, i, k - 1, p)
    };

    let right = right_factor(knots, i, k, p.t);
    let term2 = if right == 0.0 {
        0.0
    } else {
        right * cox_de_boor(knots, i + 1, k - 1, p)
    };

    term1 + term2
}

/// Evaluate the basis function `N(i,k)(t)` by direct recursion.
///
/// Fails with [`AthenaError::IndexRange`] when `N(i,k)` would read past the end of the
/// knot vector (`i + k + 1 >= knots.len()`).
pub fn basis_function(knots: &KnotVector, i: usize, k: usize, t: f64) -> Result<f64> {
    let len = knots.len();
    if i + k + 1 >= len {
        return Err(AthenaError::IndexRange(format!(
            "basis function N({},{}) needs knot {} but the knot vector has {} knots",
            i,
            k,
            i + k + 1,
            len
        )));
    }
    let p = Param::new(knots.knots(), k, t);
    Ok(cox_de_boor(knots.knots(), i, k, p))
}

/// All degree-`k` basis functions `N(0,k)(t) ..= N(n,k)(t)` at one parameter value.
///
/// Filled bottom-up one degree at a time, so every `N(i,j)` is computed once instead of
/// being re-derived by each recursive caller.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisTable {
    values: Vec<f64>,
}

impl BasisTable {
    pub fn evaluate(knots: &KnotVector, k: usize, t: f64) -> Result<Self> {
        let knots_ref = knots.knots();
        let len = knots_ref.len();
        if len < k + 2 {
            return Err(AthenaError::IndexRange(format!(
                "degree {} needs at least {} knots, got {}",
                k,
                k + 2,
                len
            )));
        }
        let p = Param::new(knots_ref, k, t);

        // Degree 0: one indicator per span.
        let mut values: Vec<f64> = (0..len - 1)
            .map(|i| span_indicator(knots_ref, i, p))
            .collect();

        // Raising the degree reads N(i,j-1) and N(i+1,j-1); ascending i keeps
        // N(i+1,j-1) intact until it has been used.
        for j in 1..=k {
            let count = len - 1 - j;
            for i in 0..count {
                let term1 = left_factor(knots_ref, i, j, t) * values[i];
                let term2 = right_factor(knots_ref, i, j, t) * values[i + 1];
                values[i] = term1 + term2;
            }
            values.truncate(count);
        }

        Ok(Self { values })
    }

    /// `N(i,k)(t)` for `i` in `0..=n`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, i: usize) -> f64 {
        self.values.get(i).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}
