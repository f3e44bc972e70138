/*!
# Metropolis–Hastings Sampler

Random-walk Metropolis–Hastings for the straight-line fit `y = a·x + b`.

Each iteration perturbs both parameters with independent Gaussian noise,
evaluates chi-squared at the candidate and accepts it with probability
`min(1, exp((χ_current − χ_candidate) / 2))`. Accepted candidates are appended
to the trace; the chain stops once it has accepted `target_samples` of them.
The proposal is symmetric, so only the likelihood ratio enters the acceptance
probability.

## Overview

- [`MHMarkovChain`]: one chain. Generic over any [`rand::Rng`], so tests and
  callers can inject a seeded generator.
- [`MetropolisHastings`]: owns `n_chains` independent chains seeded
  `seed + i` and runs them in parallel through [`ChainRunner`](crate::core::ChainRunner).
- [`fit`]: one chain with a caller-supplied generator.

## Example Usage

```rust
use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::core::ChainRunner;
use linfit_mcmc::metropolis_hastings::MetropolisHastings;

let config = SamplerConfig {
    target_samples: 20_000,
    burn_in: 1_000,
    n_chains: 2,
    ..Default::default()
};
let mut mh = MetropolisHastings::new(config).unwrap().set_seed(42);
let estimates = mh.run().unwrap();

assert_eq!(estimates.len(), 2);
assert!(estimates.iter().all(|e| e.accepted == 20_000));
```
*/

use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use log::{debug, warn};
use rand::prelude::*;

use crate::config::SamplerConfig;
use crate::core::{HasChains, MarkovChain, RunToCompletion};
use crate::dataset::Dataset;
use crate::distributions::{GaussianProposal, ProposalDistribution};
use crate::error::{McmcError, Result};
use crate::model::{chi_squared_at, LinearParams};
use crate::stats::{Estimate, Trace};

/// Acceptance probability `min(1, exp((chi_current − chi_proposed) / 2))`.
///
/// Always in `[0, 1]`: an equal or better candidate gives exactly `1`, and a
/// NaN chi-squared gives `0`.
pub fn acceptance_probability(chi_current: f64, chi_proposed: f64) -> f64 {
    let ratio = ((chi_current - chi_proposed) / 2.0).exp();
    if ratio.is_nan() {
        0.0
    } else {
        ratio.min(1.0)
    }
}

/**
A single Metropolis–Hastings chain over `(a, b)`.

The chain caches the chi-squared of its current state, so every iteration
evaluates the model exactly once. It moves from running to done when the
accepted count reaches `target_samples`; after that [`MarkovChain::step`] is a
no-op.

# Examples

```rust
use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::core::MarkovChain;
use linfit_mcmc::metropolis_hastings::MHMarkovChain;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let config = SamplerConfig::default();
let mut chain = MHMarkovChain::with_rng(&config, SmallRng::seed_from_u64(1)).unwrap();
chain.step();
assert_eq!(chain.proposals(), 1);
assert!(chain.accepted() <= 1);
```
*/
#[derive(Debug, Clone)]
pub struct MHMarkovChain<R = SmallRng> {
    dataset: Dataset,
    proposal: GaussianProposal,
    current_state: LinearParams,
    chi_current: f64,
    target_samples: usize,
    burn_in: usize,
    max_proposals: Option<u64>,
    accepted: usize,
    proposals: u64,
    trace: Trace,
    elapsed: Duration,
    scratch: Vec<f64>,
    /// The seed the RNG was created from, if the chain created it.
    pub seed: Option<u64>,
    pub rng: R,
}

impl<R: Rng> MHMarkovChain<R> {
    const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

    /// Creates a chain at `(config.a0, config.b0)` that draws from `rng`.
    ///
    /// Fails before any sampling if the dataset or the configuration is invalid.
    pub fn with_rng(config: &SamplerConfig, rng: R) -> Result<Self> {
        config.check_run_control()?;
        let dataset = config.dataset()?;
        let proposal = config.proposal()?;
        let current_state = config.initial_state();
        let mut scratch = vec![0.0; dataset.len()];
        let chi_current = chi_squared_at(&dataset, current_state, &mut scratch);

        Ok(Self {
            dataset,
            proposal,
            current_state,
            chi_current,
            target_samples: config.target_samples,
            burn_in: config.burn_in,
            max_proposals: config.max_proposals,
            accepted: 0,
            proposals: 0,
            trace: Trace::with_capacity(config.target_samples),
            elapsed: Duration::ZERO,
            scratch,
            seed: None,
            rng,
        })
    }

    /// Accepted proposals so far, `i`.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Proposals made so far, `j`.
    pub fn proposals(&self) -> u64 {
        self.proposals
    }

    /// Cached chi-squared of the current state.
    pub fn chi_current(&self) -> f64 {
        self.chi_current
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn is_done(&self) -> bool {
        self.accepted >= self.target_samples
    }

    /// Summarises the trace from `burn_in` onward.
    pub fn estimate(&self) -> Result<Estimate> {
        let mean = self.trace.posterior_mean(self.burn_in)?;
        let std = self.trace.posterior_std(self.burn_in)?;
        Ok(Estimate {
            accepted: self.accepted,
            proposals: self.proposals,
            a: mean.a,
            b: mean.b,
            a_std: std.a,
            b_std: std.b,
            elapsed: self.elapsed,
        })
    }

    fn sample_until_done(&mut self, pb: Option<&ProgressBar>) -> Result<Estimate> {
        debug!(
            "starting chain at a={}, b={} (chi2={:.3}), target {} accepted samples",
            self.current_state.a, self.current_state.b, self.chi_current, self.target_samples
        );
        if let Some(pb) = pb {
            pb.set_length(self.target_samples as u64);
        }

        let start = Instant::now();
        let mut last_update = start;
        let result = loop {
            if self.is_done() {
                break Ok(());
            }
            if let Some(cap) = self.max_proposals {
                if self.proposals >= cap {
                    break Err(McmcError::NonConvergence {
                        accepted: self.accepted,
                        target: self.target_samples,
                        proposals: self.proposals,
                    });
                }
            }

            let before = self.accepted;
            self.step();

            if let Some(pb) = pb {
                if self.accepted != before
                    && (last_update.elapsed() >= Self::UPDATE_INTERVAL || self.is_done())
                {
                    let accept_rate = self.accepted as f64 / self.proposals as f64;
                    pb.set_position(self.accepted as u64);
                    pb.set_message(format!("AcceptRate={:.3}", accept_rate));
                    last_update = Instant::now();
                }
            }
        };
        self.elapsed += start.elapsed();

        if let Err(err) = result {
            warn!("{err}");
            return Err(err);
        }

        let estimate = self.estimate()?;
        debug!(
            "chain done: i={}, j={}, acceptance={:.4}, a={}, b={}",
            estimate.accepted,
            estimate.proposals,
            estimate.acceptance_ratio(),
            estimate.a,
            estimate.b
        );
        Ok(estimate)
    }
}

impl MHMarkovChain<SmallRng> {
    /// Creates a chain seeded from `config.seed`, or from the thread RNG if no seed is set.
    pub fn new(config: &SamplerConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(|| thread_rng().gen::<u64>());
        Ok(Self::with_rng(config, SmallRng::seed_from_u64(seed))?.set_seed(seed))
    }

    /// Reseeds the chain's RNG.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

impl<R: Rng> MarkovChain<LinearParams> for MHMarkovChain<R> {
    /**
    Performs one Metropolis–Hastings update.

    Proposes a candidate, evaluates its chi-squared, draws `u ~ U[0, 1)` and
    accepts when `u <= α`. On acceptance the candidate becomes the current state
    and is appended to the trace. The proposal count grows on every call made
    while the chain is running.
    */
    fn step(&mut self) -> &LinearParams {
        if self.is_done() {
            return &self.current_state;
        }

        let proposed = self.proposal.sample(&self.current_state, &mut self.rng);
        let chi_proposed = chi_squared_at(&self.dataset, proposed, &mut self.scratch);
        let alpha = acceptance_probability(self.chi_current, chi_proposed);

        let u: f64 = self.rng.gen();
        if u <= alpha {
            self.current_state = proposed;
            self.chi_current = chi_proposed;
            self.trace.push(proposed);
            self.accepted += 1;
        }
        self.proposals += 1;

        &self.current_state
    }

    fn current_state(&self) -> &LinearParams {
        &self.current_state
    }
}

impl<R: Rng> RunToCompletion for MHMarkovChain<R> {
    /// Steps until `target_samples` candidates have been accepted.
    ///
    /// With `max_proposals` set, fails with [`McmcError::NonConvergence`] once that many
    /// proposals have been made without reaching the target.
    fn run(&mut self) -> Result<Estimate> {
        self.sample_until_done(None)
    }

    /// Same as [`run`](RunToCompletion::run), reporting the accepted count on `pb`.
    fn run_with_progress(&mut self, pb: &ProgressBar) -> Result<Estimate> {
        self.sample_until_done(Some(pb))
    }
}

/**
Runs a single chain described by `config`, drawing all randomness from `rng`.

```rust
use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::metropolis_hastings::fit;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let config = SamplerConfig { target_samples: 5_000, burn_in: 100, ..Default::default() };
let estimate = fit(&config, SmallRng::seed_from_u64(0)).unwrap();
assert_eq!(estimate.accepted, 5_000);
assert!(estimate.proposals >= 5_000);
```
*/
pub fn fit<R: Rng>(config: &SamplerConfig, rng: R) -> Result<Estimate> {
    MHMarkovChain::with_rng(config, rng)?.run()
}

/// Independent chains over the same configuration, each seeded `seed + i`.
#[derive(Debug, Clone)]
pub struct MetropolisHastings {
    pub config: SamplerConfig,
    pub chains: Vec<MHMarkovChain<SmallRng>>,
    /// The global random seed.
    pub seed: u64,
}

impl MetropolisHastings {
    /// Validates `config` and builds `config.n_chains` chains.
    ///
    /// The global seed is `config.seed`, or drawn from the thread RNG when absent.
    pub fn new(config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| thread_rng().gen::<u64>());
        let chain = MHMarkovChain::with_rng(&config, SmallRng::seed_from_u64(seed))?;
        let chains = (0..config.n_chains)
            .map(|i| chain.clone().set_seed(seed.wrapping_add(i as u64)))
            .collect();
        Ok(Self {
            config,
            chains,
            seed,
        })
    }

    /// Sets a new global seed; chain `i` is reseeded with `seed + i`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.chains = self
            .chains
            .into_iter()
            .enumerate()
            .map(|(i, chain)| chain.set_seed(seed.wrapping_add(i as u64)))
            .collect();
        self
    }
}

impl HasChains for MetropolisHastings {
    type Chain = MHMarkovChain<SmallRng>;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
        &mut self.chains
    }
}
