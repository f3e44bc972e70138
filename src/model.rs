/*!
The straight-line model `y = a·x + b` and its goodness-of-fit statistic.

Chi-squared plays the role of `-2 · log-likelihood` under independent Gaussian
errors, so the sampler only ever needs differences of [`chi_squared`] values.

# Examples

```rust
use linfit_mcmc::model::{chi_squared, linear_model};

let x = [0.0, 1.0, 2.0];
let predicted = linear_model(&x, 2.0, 1.0);
assert_eq!(predicted, vec![1.0, 3.0, 5.0]);

let observed = [1.0, 4.0, 5.0];
let variance = [1.0, 0.5, 2.0];
assert_eq!(chi_squared(&predicted, &observed, &variance), 2.0);
```
*/

use crate::dataset::Dataset;
use crate::error::{McmcError, Result};

/// Slope `a` and intercept `b` of the line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearParams {
    pub a: f64,
    pub b: f64,
}

impl LinearParams {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

/// Returns `a·x[i] + b` for every `i`.
pub fn linear_model(x: &[f64], a: f64, b: f64) -> Vec<f64> {
    x.iter().map(|&xi| a * xi + b).collect()
}

/// Writes `params.a·x[i] + params.b` into `out[i]`. `out` must be as long as `x`.
pub fn linear_model_into(x: &[f64], params: LinearParams, out: &mut [f64]) {
    debug_assert_eq!(x.len(), out.len());
    for (yi, &xi) in out.iter_mut().zip(x) {
        *yi = params.a * xi + params.b;
    }
}

/**
Inverse-variance weighted sum of squared residuals, `Σ (ŷ[i] − y[i])² / σ²[i]`.

# Preconditions

All three slices have the same length and every `variance[i] > 0`. Neither is
checked here: a zero variance yields `inf`/`NaN`. A [`Dataset`] guarantees both,
which is why the sampler only ever calls this with dataset slices.
*/
pub fn chi_squared(predicted: &[f64], observed: &[f64], variance: &[f64]) -> f64 {
    debug_assert!(predicted.len() == observed.len() && observed.len() == variance.len());
    predicted
        .iter()
        .zip(observed)
        .zip(variance)
        .map(|((&p, &o), &v)| (p - o).powi(2) / v)
        .sum()
}

/// Chi-squared of `params` against `data`, using `scratch` for the predictions.
pub(crate) fn chi_squared_at(data: &Dataset, params: LinearParams, scratch: &mut [f64]) -> f64 {
    linear_model_into(data.x(), params, scratch);
    chi_squared(scratch, data.y(), data.variance())
}

/// Closed-form inverse-variance weighted least-squares solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastSquaresFit {
    pub params: LinearParams,
    /// 1σ uncertainty of the slope.
    pub a_err: f64,
    /// 1σ uncertainty of the intercept.
    pub b_err: f64,
}

/// Weighted least-squares line through `data`, with weights `1 / variance[i]`.
///
/// Fails with [`McmcError::InvalidDataset`] when every `x` is identical, since the
/// slope is then undetermined.
pub fn weighted_least_squares(data: &Dataset) -> Result<LeastSquaresFit> {
    let (mut s, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for ((&x, &y), &var) in data.x().iter().zip(data.y()).zip(data.variance()) {
        let w = 1.0 / var;
        s += w;
        sx += w * x;
        sy += w * y;
        sxx += w * x * x;
        sxy += w * x * y;
    }
    let det = s * sxx - sx * sx;
    if det <= 0.0 || !det.is_finite() {
        return Err(McmcError::InvalidDataset(
            "x values are degenerate, slope is undetermined".into(),
        ));
    }
    Ok(LeastSquaresFit {
        params: LinearParams {
            a: (s * sxy - sx * sy) / det,
            b: (sxx * sy - sx * sxy) / det,
        },
        a_err: (s / det).sqrt(),
        b_err: (sxx / det).sqrt(),
    })
}
