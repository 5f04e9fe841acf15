use rand::Rng;
#[cfg(feature = "rayon")]
use rand::{SeedableRng, rngs::StdRng};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{debug, trace};

use super::{Metropolis, SearchParams};
use crate::{
    conformation::{Conformation, ConformationManager},
    error::FoldError,
};

/// Replica exchange Monte Carlo (parallel tempering) over the displacement neighbourhood.
///
/// K replicas of the starting conformation run independent Metropolis chains at distinct
/// temperatures; after every inner pass, adjacent replicas may exchange temperatures with
/// the detailed-balance swap probability. The scan alternates its starting index between
/// 1 and 2 each iteration, so over two iterations every adjacent pair is considered and
/// periodic correlations between the same pairs are avoided. The search stops as soon as
/// any replica reaches the protein's target energy, or after `max_iters` iterations.
#[derive(Clone, Debug)]
pub struct Remc<const D: usize> {
    manager: ConformationManager<D>,
    params: SearchParams,
}

impl<const D: usize> Remc<D> {
    /// Create an optimizer from a move oracle and validated hyperparameters.
    ///
    /// # Errors
    /// [`FoldError::Hyperparameter`] if any bound of the parameters is violated.
    pub fn new(manager: ConformationManager<D>, params: SearchParams) -> Result<Self, FoldError> {
        params.validate()?;
        Ok(Self { manager, params })
    }

    /// The move oracle driving the inner chains.
    pub const fn manager(&self) -> &ConformationManager<D> {
        &self.manager
    }

    /// The hyperparameters of this run.
    pub const fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Sample K distinct integer temperatures from `[t_min, t_max]`, in random order.
    fn sample_temperatures<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let range = (self.params.t_max - self.params.t_min + 1) as usize;
        rand::seq::index::sample(rng, range, self.params.replicas)
            .into_iter()
            .map(|index| f64::from(self.params.t_min + index as u32))
            .collect()
    }

    /// Run the outer replica exchange loop and return the best conformation observed.
    ///
    /// The best-so-far starts at the initial conformation, so the result is always a valid
    /// conformation even when no replica ever improves on it.
    pub fn optimize<R: Rng + ?Sized>(
        &self,
        initial: Conformation<D>,
        rng: &mut R,
    ) -> Conformation<D> {
        let e_star = self.manager.protein().e_star();
        let metropolis = Metropolis::new(self.params.phi);
        let mut temperatures = self.sample_temperatures(rng);

        let mut best = initial.clone();
        let mut best_energy = best.energy();
        let mut replicas = vec![initial; self.params.replicas];

        let mut offset = 0;
        let mut iteration = 1;
        while best_energy > e_star && iteration <= self.params.max_iters {
            self.replica_pass(&mut replicas, &temperatures, &metropolis, rng);

            for (k, replica) in replicas.iter_mut().enumerate() {
                let energy = replica.energy();
                trace!(iteration, replica = k, energy, "replica advanced");
                if energy < best_energy {
                    best_energy = energy;
                    best = replica.clone();
                }
            }

            let energies: Vec<i32> = replicas.iter_mut().map(Conformation::energy).collect();
            swap_pass(&energies, &mut temperatures, offset, rng);

            debug!(iteration, offset, best_energy, "outer iteration finished");
            offset = 1 - offset;
            iteration += 1;
        }
        best
    }

    /// Advance every replica by one inner Metropolis pass at its current temperature.
    #[cfg(not(feature = "rayon"))]
    fn replica_pass<R: Rng + ?Sized>(
        &self,
        replicas: &mut [Conformation<D>],
        temperatures: &[f64],
        metropolis: &Metropolis,
        rng: &mut R,
    ) {
        for (replica, &temperature) in replicas.iter_mut().zip(temperatures) {
            *replica = metropolis.optimize(replica, temperature, &self.manager, rng);
        }
    }

    /// Advance every replica by one inner Metropolis pass at its current temperature.
    ///
    /// Replicas are independent until the swap pass, so they run on the rayon pool, each
    /// with its own RNG stream derived from the master generator before the pass. The swap
    /// pass stays on the calling thread after the join.
    #[cfg(feature = "rayon")]
    fn replica_pass<R: Rng + ?Sized>(
        &self,
        replicas: &mut [Conformation<D>],
        temperatures: &[f64],
        metropolis: &Metropolis,
        rng: &mut R,
    ) {
        let seeds: Vec<u64> = (0..replicas.len()).map(|_| rng.random()).collect();
        replicas
            .par_iter_mut()
            .zip(temperatures.par_iter())
            .zip(seeds.par_iter())
            .for_each(|((replica, &temperature), &seed)| {
                let mut rng = StdRng::seed_from_u64(seed);
                *replica = metropolis.optimize(replica, temperature, &self.manager, &mut rng);
            });
    }
}

/// One temperature-swap pass over adjacent replica pairs.
///
/// Starting at index `offset + 1`, each pair (i, i+1) swaps temperatures when
/// Δ = (1/T_(i+1) − 1/T_i)·(E_i − E_(i+1)) is non-positive, and with probability exp(−Δ)
/// otherwise. Only temperatures move; conformations stay with their replica slot. The
/// multiset of temperatures is preserved.
fn swap_pass<R: Rng + ?Sized>(
    energies: &[i32],
    temperatures: &mut [f64],
    offset: usize,
    rng: &mut R,
) {
    let mut i = offset + 1;
    while i + 1 < energies.len() {
        let j = i + 1;
        let delta =
            (1.0 / temperatures[j] - 1.0 / temperatures[i]) * f64::from(energies[i] - energies[j]);
        if delta <= 0.0 || rng.random::<f64>() <= (-delta).exp() {
            temperatures.swap(i, j);
        }
        i += 2;
    }
}
