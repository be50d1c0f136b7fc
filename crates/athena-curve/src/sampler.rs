//! Sampling of a curve's parameter domain.

use athena_core::traits::Validate;
use athena_core::{AthenaError, Result};
use serde::{Deserialize, Serialize};

/// How densely a curve's domain is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Number of parameter values, both domain endpoints included.
    pub samples: usize,
}

impl SamplingConfig {
    pub const DEFAULT_SAMPLES: usize = 101;
    pub const MAX_SAMPLES: usize = 1_000_000;

    pub fn new(samples: usize) -> Self {
        Self { samples }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples: Self::DEFAULT_SAMPLES,
        }
    }
}

impl Validate for SamplingConfig {
    fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            return Err(AthenaError::IndexRange(format!(
                "at least 2 samples are required to cover a domain, got {}",
                self.samples
            )));
        }
        if self.samples > Self::MAX_SAMPLES {
            return Err(AthenaError::IndexRange(format!(
                "at most {} samples are supported, got {}",
                Self::MAX_SAMPLES,
                self.samples
            )));
        }
        Ok(())
    }
}

/// Equally spaced parameter values over `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSampler {
    start: f64,
    end: f64,
    samples: usize,
}

impl CurveSampler {
    pub fn new(start: f64, end: f64, config: SamplingConfig) -> Result<Self> {
        config.validate()?;
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(AthenaError::IndexRange(format!(
                "invalid sampling domain [{}, {}]",
                start, end
            )));
        }
        Ok(Self {
            start,
            end,
            samples: config.samples,
        })
    }

    /// Sampler over the Bezier domain `[0, 1]`.
    pub fn unit(config: SamplingConfig) -> Result<Self> {
        Self::new(0.0, 1.0, config)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    pub fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// The `i`-th parameter value. The last one is exactly `end`.
    pub fn parameter(&self, i: usize) -> f64 {
        let divs = self.samples - 1;
        if i >= divs {
            self.end
        } else {
            self.start + (self.end - self.start) * i as f64 / divs as f64
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.samples).map(move |i| self.parameter(i))
    }

    pub fn parameters(&self) -> Vec<f64> {
        self.iter().collect()
    }
}
