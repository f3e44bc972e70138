/*!
Proposal distributions for the Metropolis–Hastings chain.

A proposal draws a candidate state given the current one. The random number
generator is passed in by the caller so the chain owns the only source of
randomness and a fixed seed reproduces every draw.

# Examples

```rust
use linfit_mcmc::distributions::{GaussianProposal, ProposalDistribution};
use linfit_mcmc::model::LinearParams;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let proposal = GaussianProposal::new(0.025, 2.5).unwrap();
let mut rng = SmallRng::seed_from_u64(7);
let candidate = proposal.sample(&LinearParams::new(2.5, 28.82), &mut rng);
println!("Candidate state: {:?}", candidate);
```
*/

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{McmcError, Result};
use crate::model::LinearParams;

/// A trait for generating proposals q(x' | x) in Metropolis–Hastings.
pub trait ProposalDistribution<S> {
    /// Samples a new point from q(x' | x).
    fn sample<R: Rng + ?Sized>(&self, current: &S, rng: &mut R) -> S;
}

/**
Adds independent zero-mean Gaussian noise to each parameter, with a separate
standard deviation for the slope and the intercept.

The proposal is symmetric, q(x' | x) = q(x | x'), so it drops out of the
acceptance ratio.
*/
#[derive(Debug, Clone, Copy)]
pub struct GaussianProposal {
    noise_a: Normal<f64>,
    noise_b: Normal<f64>,
}

impl GaussianProposal {
    /// Creates a proposal with widths `sigma_a` and `sigma_b`. Both must be finite and positive.
    pub fn new(sigma_a: f64, sigma_b: f64) -> Result<Self> {
        Ok(Self {
            noise_a: width("sigma_a", sigma_a)?,
            noise_b: width("sigma_b", sigma_b)?,
        })
    }

    pub fn sigma_a(&self) -> f64 {
        self.noise_a.std_dev()
    }

    pub fn sigma_b(&self) -> f64 {
        self.noise_b.std_dev()
    }
}

fn width(name: &str, sigma: f64) -> Result<Normal<f64>> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(McmcError::InvalidConfig(format!(
            "{name} must be finite and > 0, got {sigma}"
        )));
    }
    Normal::new(0.0, sigma).map_err(|e| McmcError::InvalidConfig(format!("{name}: {e}")))
}

impl ProposalDistribution<LinearParams> for GaussianProposal {
    fn sample<R: Rng + ?Sized>(&self, current: &LinearParams, rng: &mut R) -> LinearParams {
        // Slope first, then intercept.
        let a = current.a + self.noise_a.sample(rng);
        let b = current.b + self.noise_b.sample(rng);
        LinearParams { a, b }
    }
}
