//! Runs four independent chains on the reference data and compares their estimates
//! with each other and with the weighted least-squares line.

use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::core::ChainRunner;
use linfit_mcmc::metropolis_hastings::MetropolisHastings;
use linfit_mcmc::model::weighted_least_squares;
use rand::{thread_rng, Rng};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    const N_CHAINS: usize = 4;
    let seed: u64 = thread_rng().gen();

    let config = SamplerConfig {
        target_samples: 100_000,
        burn_in: 1_000,
        n_chains: N_CHAINS,
        ..Default::default()
    };
    let lsq = weighted_least_squares(&config.dataset()?)?;

    let mut mh = MetropolisHastings::new(config)?.set_seed(seed);
    let estimates = mh.run_progress()?;

    for (i, e) in estimates.iter().enumerate() {
        println!(
            "chain {i} (seed {}): a = {:.4}, b = {:.3}, acceptance = {:.3}",
            seed.wrapping_add(i as u64),
            e.a,
            e.b,
            e.acceptance_ratio()
        );
    }

    let spread_a = estimates
        .iter()
        .map(|e| e.a)
        .fold(f64::NEG_INFINITY, f64::max)
        - estimates.iter().map(|e| e.a).fold(f64::INFINITY, f64::min);
    println!("spread of slope estimates across chains: {spread_a:.5}");
    println!(
        "least squares: a = {:.4} +/- {:.4}, b = {:.3} +/- {:.3}",
        lsq.params.a, lsq.a_err, lsq.params.b, lsq.b_err
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_main() {
        main().expect("Expected main to not return an error.");
    }
}
