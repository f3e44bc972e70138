//! Metropolis–Hastings estimation of the slope and intercept of `y = a·x + b`
//! for data with known per-point variances.
//!
//! ```rust
//! use linfit_mcmc::config::SamplerConfig;
//! use linfit_mcmc::metropolis_hastings::fit;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let config = SamplerConfig { target_samples: 10_000, ..Default::default() };
//! let estimate = fit(&config, SmallRng::seed_from_u64(42)).unwrap();
//! println!("a = {:.3}, b = {:.2}", estimate.a, estimate.b);
//! ```

pub mod config;
pub mod core;
pub mod dataset;
pub mod distributions;
pub mod error;
pub mod metropolis_hastings;
pub mod model;
pub mod stats;

pub use error::{McmcError, Result};
