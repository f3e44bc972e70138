/*!
Observations for the straight-line fit.

A [`Dataset`] holds index-aligned `x`, `y` and variance sequences. It can only be
constructed through [`Dataset::new`], which checks every precondition the
chi-squared statistic relies on, so the sampling loop never re-validates.

# Examples

```rust
use linfit_mcmc::dataset::Dataset;

let data = Dataset::new(vec![1.0, 2.0], vec![3.0, 5.0], vec![1.0, 0.5]).unwrap();
assert_eq!(data.len(), 2);

// A zero variance is rejected before any sampling can happen.
assert!(Dataset::new(vec![1.0], vec![3.0], vec![0.0]).is_err());
```
*/

use crate::error::{McmcError, Result};

/// Independent variable of the reference problem.
pub const REFERENCE_X: [f64; 16] = [
    203.0, 58.0, 210.0, 202.0, 198.0, 158.0, 165.0, 201.0, 157.0, 131.0, 166.0, 160.0, 186.0,
    125.0, 218.0, 146.0,
];

/// Observed dependent variable of the reference problem.
pub const REFERENCE_Y: [f64; 16] = [
    495.0, 173.0, 479.0, 504.0, 510.0, 416.0, 393.0, 442.0, 317.0, 311.0, 400.0, 337.0, 423.0,
    334.0, 533.0, 344.0,
];

/// Observation variances (not standard deviations) of the reference problem.
pub const REFERENCE_VARIANCE: [f64; 16] = [
    21.0, 15.0, 27.0, 14.0, 30.0, 16.0, 14.0, 25.0, 52.0, 16.0, 34.0, 31.0, 42.0, 26.0, 16.0,
    22.0,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Vec<f64>,
    y: Vec<f64>,
    variance: Vec<f64>,
}

impl Dataset {
    /// Builds a dataset, failing with [`McmcError::InvalidDataset`] if the sequences
    /// differ in length, are empty, contain non-finite values, or if any variance
    /// is not strictly positive.
    pub fn new(x: Vec<f64>, y: Vec<f64>, variance: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() || x.len() != variance.len() {
            return Err(McmcError::InvalidDataset(format!(
                "sequence lengths differ: x={}, y={}, variance={}",
                x.len(),
                y.len(),
                variance.len()
            )));
        }
        if x.is_empty() {
            return Err(McmcError::InvalidDataset(
                "dataset has no observations".into(),
            ));
        }
        for (name, values) in [("x", &x), ("y", &y), ("variance", &variance)] {
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(McmcError::InvalidDataset(format!(
                    "{name}[{i}] is not finite ({})",
                    values[i]
                )));
            }
        }
        if let Some(i) = variance.iter().position(|&v| v <= 0.0) {
            return Err(McmcError::InvalidDataset(format!(
                "variance[{i}] must be > 0, got {}",
                variance[i]
            )));
        }
        Ok(Self { x, y, variance })
    }

    /// The 16-point reference dataset.
    pub fn reference() -> Self {
        Self {
            x: REFERENCE_X.to_vec(),
            y: REFERENCE_Y.to_vec(),
            variance: REFERENCE_VARIANCE.to_vec(),
        }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn variance(&self) -> &[f64] {
        &self.variance
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_dataset_passes_validation() {
        let validated = Dataset::new(
            REFERENCE_X.to_vec(),
            REFERENCE_Y.to_vec(),
            REFERENCE_VARIANCE.to_vec(),
        )
        .expect("Expected reference data to be valid");
        assert_eq!(validated, Dataset::reference());
        assert_eq!(validated.len(), 16);
    }

    #[test]
    fn zero_variance_is_rejected() {
        let mut variance = REFERENCE_VARIANCE.to_vec();
        variance[7] = 0.0;
        let err = Dataset::new(REFERENCE_X.to_vec(), REFERENCE_Y.to_vec(), variance).unwrap_err();
        match err {
            McmcError::InvalidDataset(msg) => assert!(msg.contains("variance[7]"), "{msg}"),
            other => panic!("Expected InvalidDataset, got {other:?}"),
        }
    }

    #[test]
    fn negative_variance_is_rejected() {
        let res = Dataset::new(vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0, -3.0]);
        assert!(matches!(res, Err(McmcError::InvalidDataset(_))));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let res = Dataset::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0], vec![1.0, 1.0, 1.0]);
        assert!(matches!(res, Err(McmcError::InvalidDataset(_))));
    }

    #[test]
    fn empty_and_non_finite_are_rejected() {
        assert!(Dataset::new(vec![], vec![], vec![]).is_err());
        assert!(Dataset::new(vec![f64::NAN], vec![1.0], vec![1.0]).is_err());
        assert!(Dataset::new(vec![1.0], vec![1.0], vec![f64::INFINITY]).is_err());
    }
}
