use std::error::Error;

use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::core::ChainRunner;
use linfit_mcmc::metropolis_hastings::MetropolisHastings;
use linfit_mcmc::model::weighted_least_squares;

/// Fits the reference line, or the one described by the JSON config given as the only argument.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading configuration from {path}");
            SamplerConfig::from_path(path)?
        }
        None => SamplerConfig::default(),
    };

    log::debug!("configuration: {}", serde_json::to_string(&config)?);

    let mut mh = MetropolisHastings::new(config)?;
    log::info!(
        "running {} chain(s) to {} accepted samples (burn-in {}), seed {}",
        mh.chains.len(),
        mh.config.target_samples,
        mh.config.burn_in,
        mh.seed
    );

    let estimates = mh.run_progress()?;
    for (i, estimate) in estimates.iter().enumerate() {
        println!("chain {i}");
        println!("  CPU time: {:?}", estimate.elapsed);
        println!("  i = {}, j = {}", estimate.accepted, estimate.proposals);
        println!("  Acceptance ratio: {:6.4}", estimate.acceptance_ratio());
        println!(
            "  a: {:.6} +/- {:.6}, b: {:.6} +/- {:.6}",
            estimate.a, estimate.a_std, estimate.b, estimate.b_std
        );
    }

    let lsq = weighted_least_squares(&mh.config.dataset()?)?;
    log::info!(
        "weighted least squares: a = {:.6} +/- {:.6}, b = {:.6} +/- {:.6}",
        lsq.params.a,
        lsq.a_err,
        lsq.params.b,
        lsq.b_err
    );

    Ok(())
}
