//! Trace bookkeeping and posterior summaries for a single chain.

use std::time::Duration;

use ndarray::ArrayView1;

use crate::error::{McmcError, Result};
use crate::model::LinearParams;

/// Accepted samples, indexed by acceptance count rather than iteration count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trace {
    a: Vec<f64>,
    b: Vec<f64>,
}

impl Trace {
    /// Largest number of samples reserved up front; longer traces grow on demand.
    pub const MAX_PREALLOCATED: usize = 1 << 20;

    /// Reserves room for `capacity` samples, capped at [`Trace::MAX_PREALLOCATED`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(Self::MAX_PREALLOCATED);
        Self {
            a: Vec::with_capacity(capacity),
            b: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, params: LinearParams) {
        self.a.push(params.a);
        self.b.push(params.b);
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn a(&self) -> &[f64] {
        &self.a
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Arithmetic mean of the samples at indices `[burn_in, len)`.
    pub fn posterior_mean(&self, burn_in: usize) -> Result<LinearParams> {
        let (a, b) = self.kept(burn_in)?;
        // `kept` guarantees at least one sample, so the means exist.
        Ok(LinearParams {
            a: a.mean().unwrap_or(f64::NAN),
            b: b.mean().unwrap_or(f64::NAN),
        })
    }

    /// Sample standard deviation (ddof = 1) over `[burn_in, len)`; zero with fewer than two samples.
    pub fn posterior_std(&self, burn_in: usize) -> Result<LinearParams> {
        let (a, b) = self.kept(burn_in)?;
        if a.len() < 2 {
            return Ok(LinearParams::default());
        }
        Ok(LinearParams {
            a: a.std(1.0),
            b: b.std(1.0),
        })
    }

    fn kept(&self, burn_in: usize) -> Result<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        if burn_in >= self.len() {
            return Err(McmcError::InvalidConfig(format!(
                "burn-in {burn_in} leaves no samples out of {}",
                self.len()
            )));
        }
        Ok((
            ArrayView1::from(&self.a[burn_in..]),
            ArrayView1::from(&self.b[burn_in..]),
        ))
    }
}

/// Summary of one finished chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Accepted proposals, `i`.
    pub accepted: usize,
    /// Total proposals, `j`.
    pub proposals: u64,
    /// Posterior mean of the slope.
    pub a: f64,
    /// Posterior mean of the intercept.
    pub b: f64,
    pub a_std: f64,
    pub b_std: f64,
    /// Wall-clock time spent in the sampling loop.
    pub elapsed: Duration,
}

impl Estimate {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.proposals == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.proposals as f64
    }

    pub fn params(&self) -> LinearParams {
        LinearParams::new(self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn trace_of(values: &[(f64, f64)]) -> Trace {
        let mut trace = Trace::with_capacity(values.len());
        values
            .iter()
            .for_each(|&(a, b)| trace.push(LinearParams::new(a, b)));
        trace
    }

    #[test]
    fn mean_skips_burn_in() {
        let trace = trace_of(&[(100.0, -100.0), (1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]);
        let mean = trace.posterior_mean(1).unwrap();
        assert_abs_diff_eq!(mean.a, 2.0);
        assert_abs_diff_eq!(mean.b, 20.0);
    }

    #[test]
    fn zero_burn_in_uses_full_trace() {
        let trace = trace_of(&[(100.0, -100.0), (1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]);
        let mean = trace.posterior_mean(0).unwrap();
        assert_abs_diff_eq!(mean.a, 26.5);
        assert_abs_diff_eq!(mean.b, -10.0);
    }

    #[test]
    fn std_uses_unbiased_estimator() {
        let trace = trace_of(&[(1.0, 2.0), (3.0, 2.0)]);
        let std = trace.posterior_std(0).unwrap();
        assert_abs_diff_eq!(std.a, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(std.b, 0.0);

        let single = trace.posterior_std(1).unwrap();
        assert_eq!(single, LinearParams::default());
    }

    #[test]
    fn burn_in_past_end_is_an_error() {
        let trace = trace_of(&[(1.0, 1.0), (2.0, 2.0)]);
        assert!(matches!(
            trace.posterior_mean(2),
            Err(McmcError::InvalidConfig(_))
        ));
        assert!(Trace::default().posterior_mean(0).is_err());
    }

    #[test]
    fn huge_capacity_request_is_capped() {
        let mut trace = Trace::with_capacity(usize::MAX / 4);
        assert!(trace.a.capacity() <= Trace::MAX_PREALLOCATED);
        trace.push(LinearParams::new(1.0, 2.0));
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn acceptance_ratio() {
        let estimate = Estimate {
            accepted: 250,
            proposals: 1000,
            a: 0.0,
            b: 0.0,
            a_std: 0.0,
            b_std: 0.0,
            elapsed: Duration::ZERO,
        };
        assert_abs_diff_eq!(estimate.acceptance_ratio(), 0.25);
    }
}
