/*!
Sampler configuration.

[`SamplerConfig`] carries the dataset, the starting guess, the proposal widths
and the run-control constants. It deserializes from JSON; any field left out
falls back to the reference problem, so `{}` is a complete configuration.

# Examples

```rust
use linfit_mcmc::config::SamplerConfig;

let config = SamplerConfig::from_json_str(r#"{ "target_samples": 20000, "burn_in": 500 }"#).unwrap();
assert_eq!(config.target_samples, 20_000);
assert_eq!(config.a0, 2.5);
config.validate().unwrap();
```
*/

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, REFERENCE_VARIANCE, REFERENCE_X, REFERENCE_Y};
use crate::distributions::GaussianProposal;
use crate::error::{McmcError, Result};
use crate::model::LinearParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Per-point observation variance.
    pub variance: Vec<f64>,
    /// Starting slope.
    pub a0: f64,
    /// Starting intercept.
    pub b0: f64,
    /// Proposal standard deviation for the slope.
    pub sigma_a: f64,
    /// Proposal standard deviation for the intercept.
    pub sigma_b: f64,
    /// Accepted samples to collect before stopping (`mcn`).
    pub target_samples: usize,
    /// Leading accepted samples excluded from the estimates (`brn`).
    pub burn_in: usize,
    /// Give up with [`McmcError::NonConvergence`] after this many proposals. `None` never gives up.
    pub max_proposals: Option<u64>,
    /// Seed for the chain RNG; drawn from the thread RNG when absent.
    pub seed: Option<u64>,
    /// Independent chains to run. Chain `i` is seeded with `seed + i`.
    pub n_chains: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            x: REFERENCE_X.to_vec(),
            y: REFERENCE_Y.to_vec(),
            variance: REFERENCE_VARIANCE.to_vec(),
            a0: 2.5,
            b0: 28.82,
            sigma_a: 0.025,
            sigma_b: 2.5,
            target_samples: 500_000,
            burn_in: 1_000,
            max_proposals: None,
            seed: None,
            n_chains: 1,
        }
    }
}

impl SamplerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn initial_state(&self) -> LinearParams {
        LinearParams::new(self.a0, self.b0)
    }

    /// The validated dataset.
    pub fn dataset(&self) -> Result<Dataset> {
        Dataset::new(self.x.clone(), self.y.clone(), self.variance.clone())
    }

    /// The proposal described by `sigma_a` and `sigma_b`.
    pub fn proposal(&self) -> Result<GaussianProposal> {
        GaussianProposal::new(self.sigma_a, self.sigma_b)
    }

    /// Checks the starting point and the run-control constants of a single chain.
    pub fn check_run_control(&self) -> Result<()> {
        if !(self.a0.is_finite() && self.b0.is_finite()) {
            return Err(McmcError::InvalidConfig(format!(
                "initial guess must be finite, got a0={}, b0={}",
                self.a0, self.b0
            )));
        }
        if self.target_samples == 0 {
            return Err(McmcError::InvalidConfig(
                "target_samples must be > 0".into(),
            ));
        }
        if self.burn_in >= self.target_samples {
            return Err(McmcError::InvalidConfig(format!(
                "burn_in ({}) must be smaller than target_samples ({})",
                self.burn_in, self.target_samples
            )));
        }
        if let Some(cap) = self.max_proposals {
            if cap < self.target_samples as u64 {
                return Err(McmcError::InvalidConfig(format!(
                    "max_proposals ({cap}) cannot be below target_samples ({})",
                    self.target_samples
                )));
            }
        }
        Ok(())
    }

    /// Runs every check a multi-chain sampler performs before its first iteration.
    pub fn validate(&self) -> Result<()> {
        if self.n_chains == 0 {
            return Err(McmcError::InvalidConfig("n_chains must be > 0".into()));
        }
        self.check_run_control()?;
        self.dataset()?;
        self.proposal()?;
        Ok(())
    }
}
