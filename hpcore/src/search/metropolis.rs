use rand::Rng;
use tracing::trace;

use crate::conformation::{Conformation, ConformationManager};

/// Fixed-step Metropolis Monte Carlo at a single temperature.
///
/// Each step draws one uniform candidate from the displacement neighbourhood and accepts
/// it with probability min(1, exp(−ΔE/T)): always on an energy drop, with the Boltzmann
/// probability otherwise. The raw energy difference and the caller's temperature are used
/// as-is, without a Boltzmann constant prefactor.
#[derive(Clone, Copy, Debug)]
pub struct Metropolis {
    phi: usize,
}

impl Metropolis {
    /// Create an optimizer that runs `phi` steps per call.
    pub const fn new(phi: usize) -> Self {
        Self { phi }
    }

    /// The number of steps per call.
    pub const fn phi(&self) -> usize {
        self.phi
    }

    /// Advance a conformation by `phi` Metropolis steps at the given temperature.
    ///
    /// The input is never mutated; the walk runs on an independent clone. When the
    /// neighbourhood of the current state is empty the chain has nowhere to go and the
    /// current state is returned early.
    pub fn optimize<const D: usize, R: Rng + ?Sized>(
        &self,
        conformation: &Conformation<D>,
        temperature: f64,
        manager: &ConformationManager<D>,
        rng: &mut R,
    ) -> Conformation<D> {
        let mut current = conformation.clone();
        let mut current_energy = current.energy();

        for step in 0..self.phi {
            let mut neighbourhood = manager.vhsd_neighbourhood(&current);
            if neighbourhood.is_empty() {
                trace!(step, "empty neighbourhood, chain is stuck");
                return current;
            }
            let mut candidate =
                neighbourhood.swap_remove(rng.random_range(0..neighbourhood.len()));
            let candidate_energy = candidate.energy();

            let delta = candidate_energy - current_energy;
            let accept =
                delta < 0 || rng.random::<f64>() <= (-f64::from(delta) / temperature).exp();
            if accept {
                current = candidate;
                current_energy = candidate_energy;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::Metropolis;
    use crate::{
        conformation::{Conformation, ConformationManager},
        lattice::{Coord, Lattice},
        sequence::Protein,
    };

    #[test]
    fn a_stuck_chain_is_returned_unchanged() {
        // The chain fills the lattice exactly: the neighbourhood is empty.
        let protein = Arc::new(Protein::from_hp("test", "HPPH", 0, 2).unwrap());
        let manager = ConformationManager::new(protein.clone(), [2, 2]).unwrap();
        let square = Conformation::new(
            protein,
            Lattice::new([2, 2]).unwrap(),
            vec![
                Coord::new([0, 0]),
                Coord::new([1, 0]),
                Coord::new([1, 1]),
                Coord::new([0, 1]),
            ],
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let mut result = Metropolis::new(100).optimize(&square, 180.0, &manager, &mut rng);
        assert_eq!(result.path(), square.path());
        assert_eq!(result.energy(), -1);
    }

    #[test]
    fn the_walk_preserves_validity() {
        let protein = Arc::new(Protein::from_hp("test", "HPHPHPHP", -2, 2).unwrap());
        let manager = ConformationManager::new(protein, [10, 10]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let initial = manager.initial_conformation(&mut rng).unwrap();

        let mut result = Metropolis::new(50).optimize(&initial, 200.0, &manager, &mut rng);
        assert!(result.is_valid());
        assert!(result.energy() <= 0);
    }

    #[test]
    fn a_two_residue_protein_stays_at_zero_energy() {
        let protein = Arc::new(Protein::from_hp("test", "HH", 0, 2).unwrap());
        let manager = ConformationManager::new(protein, [5, 5]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let initial = manager.initial_conformation(&mut rng).unwrap();

        let mut result = Metropolis::new(30).optimize(&initial, 150.0, &manager, &mut rng);
        assert!(result.is_valid());
        assert_eq!(result.energy(), 0);
        assert_eq!(result.path()[0].l1_distance(result.path()[1]), 1);
    }
}
