//! The two-level optimizer: Metropolis Monte Carlo chains wrapped in a replica exchange
//! (parallel tempering) outer loop.

mod metropolis;
mod params;
mod remc;

pub use metropolis::Metropolis;
pub use params::SearchParams;
pub use remc::Remc;
