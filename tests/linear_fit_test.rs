//! End-to-end checks of the Metropolis-Hastings line fit on the reference data.
//!
//! The posterior of the reference problem is close to Gaussian around the weighted
//! least-squares solution, so the estimates are compared against that.

use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::core::{MarkovChain, RunToCompletion};
use linfit_mcmc::metropolis_hastings::{fit, MHMarkovChain};
use linfit_mcmc::model::weighted_least_squares;
use linfit_mcmc::McmcError;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[cfg(test)]
mod tests {
    use super::*;

    /// Full reference run: 500,000 accepted samples, 1,000 burn-in.
    #[test]
    fn reference_problem_end_to_end() {
        const SEED: u64 = 42;

        let config = SamplerConfig::default();
        let estimate = fit(&config, SmallRng::seed_from_u64(SEED)).expect("Expected run to finish");
        let lsq = weighted_least_squares(&config.dataset().unwrap()).unwrap();

        assert_eq!(estimate.accepted, 500_000);
        assert!(estimate.proposals >= estimate.accepted as u64);

        let ratio = estimate.acceptance_ratio();
        assert!(ratio > 0.0 && ratio < 1.0, "acceptance ratio {ratio}");

        assert!(
            (estimate.a - lsq.params.a).abs() < 0.05,
            "slope {} too far from least squares {}",
            estimate.a,
            lsq.params.a
        );
        assert!((estimate.b - 28.0).abs() < 10.0, "intercept {}", estimate.b);
        assert!(
            (estimate.b - lsq.params.b).abs() < 10.0,
            "intercept {} too far from least squares {}",
            estimate.b,
            lsq.params.b
        );

        // The posterior spread should be of the order of the least-squares errors.
        assert!(estimate.a_std > 0.5 * lsq.a_err && estimate.a_std < 2.0 * lsq.a_err);
        assert!(estimate.b_std > 0.5 * lsq.b_err && estimate.b_std < 2.0 * lsq.b_err);
    }

    #[test]
    fn identical_seeds_make_identical_decisions() {
        let config = SamplerConfig {
            target_samples: 5_000,
            burn_in: 0,
            ..Default::default()
        };
        let mut chain_1 = MHMarkovChain::with_rng(&config, SmallRng::seed_from_u64(99)).unwrap();
        let mut chain_2 = MHMarkovChain::with_rng(&config, SmallRng::seed_from_u64(99)).unwrap();

        while !chain_1.is_done() {
            let s1 = *chain_1.step();
            let s2 = *chain_2.step();
            assert_eq!(s1, s2);
            assert_eq!(chain_1.accepted(), chain_2.accepted());
        }
        assert!(chain_2.is_done());
        assert_eq!(chain_1.trace(), chain_2.trace());

        let (e1, e2) = (chain_1.run().unwrap(), chain_2.run().unwrap());
        assert_eq!(e1.proposals, e2.proposals);
        assert_eq!(e1.a.to_bits(), e2.a.to_bits());
        assert_eq!(e1.b.to_bits(), e2.b.to_bits());
    }

    #[test]
    fn zero_burn_in_averages_whole_trace() {
        let config = SamplerConfig {
            target_samples: 3_000,
            burn_in: 0,
            ..Default::default()
        };
        let mut chain = MHMarkovChain::with_rng(&config, SmallRng::seed_from_u64(4)).unwrap();
        let estimate = chain.run().unwrap();

        let trace = chain.trace();
        assert_eq!(trace.len(), 3_000);
        let mean_a = trace.a().iter().sum::<f64>() / trace.len() as f64;
        let mean_b = trace.b().iter().sum::<f64>() / trace.len() as f64;
        assert!((estimate.a - mean_a).abs() < 1e-9);
        assert!((estimate.b - mean_b).abs() < 1e-9);
    }

    #[test]
    fn burn_in_excludes_leading_samples() {
        let config = SamplerConfig {
            target_samples: 3_000,
            burn_in: 2_500,
            ..Default::default()
        };
        let mut chain = MHMarkovChain::with_rng(&config, SmallRng::seed_from_u64(4)).unwrap();
        let estimate = chain.run().unwrap();

        let tail = &chain.trace().a()[2_500..];
        let mean_a = tail.iter().sum::<f64>() / tail.len() as f64;
        assert!((estimate.a - mean_a).abs() < 1e-9);
    }

    #[test]
    fn zero_variance_fails_before_sampling() {
        let mut config = SamplerConfig::default();
        config.variance[12] = 0.0;
        let res = fit(&config, SmallRng::seed_from_u64(0));
        assert!(matches!(res, Err(McmcError::InvalidDataset(_))));
    }
}
