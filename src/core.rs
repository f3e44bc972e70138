use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::error::Result;
use crate::stats::Estimate;

pub trait MarkovChain<S> {
    /// Does one iteration of the chain, returning the (possibly unchanged) current state.
    fn step(&mut self) -> &S;

    /// Get the current state without stepping.
    fn current_state(&self) -> &S;
}

/// A chain that runs until its own termination condition and summarises what it collected.
pub trait RunToCompletion {
    fn run(&mut self) -> Result<Estimate>;

    fn run_with_progress(&mut self, pb: &ProgressBar) -> Result<Estimate>;
}

/// A trait for "anything that owns multiple independent chains".
pub trait HasChains {
    type Chain: RunToCompletion + Send;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

pub trait ChainRunner: HasChains {
    /// Runs every chain to completion in parallel, one estimate per chain.
    fn run(&mut self) -> Result<Vec<Estimate>> {
        self.chains_mut()
            .par_iter_mut()
            .map(|chain| chain.run())
            .collect()
    }

    fn run_progress(&mut self) -> Result<Vec<Estimate>> {
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        self.chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(0));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                let estimate = chain.run_with_progress(&pb);
                pb.finish_with_message("Done!");
                estimate
            })
            .collect()
    }
}

impl<T: HasChains> ChainRunner for T {}
