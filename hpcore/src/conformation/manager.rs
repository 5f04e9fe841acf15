use std::{collections::HashSet, sync::Arc};

use rand::Rng;
use tracing::trace;

use super::Conformation;
use crate::{
    error::FoldError,
    lattice::{Coord, Lattice},
    sequence::Protein,
};

/// The number of full self-avoiding-walk attempts before giving up on a lattice.
const DEFAULT_WALK_ATTEMPTS: usize = 10_000;

/// Creates conformations for one protein and enumerates their move neighbourhood.
///
/// The manager owns the shared read-only [`Protein`] and the target lattice bounds; every
/// conformation it produces references the same protein. It is the move oracle of the
/// Monte Carlo optimizers: the initial conformation comes from a self-avoiding walk, and
/// the search neighbourhood of any conformation is the set of single-residue end and
/// corner displacements.
#[derive(Clone, Debug)]
pub struct ConformationManager<const D: usize> {
    protein: Arc<Protein>,
    dims: [usize; D],
    walk_attempts: usize,
}

impl<const D: usize> ConformationManager<D> {
    /// Create a manager for a protein on a lattice with the given bounds.
    ///
    /// # Errors
    /// If any lattice dimension is zero.
    pub fn new(protein: Arc<Protein>, dims: [usize; D]) -> Result<Self, FoldError> {
        // Surface degenerate bounds here rather than on first use.
        Lattice::new(dims)?;
        Ok(Self {
            protein,
            dims,
            walk_attempts: DEFAULT_WALK_ATTEMPTS,
        })
    }

    /// Override the retry budget of the self-avoiding-walk sampler.
    #[must_use]
    pub const fn with_walk_attempts(mut self, attempts: usize) -> Self {
        self.walk_attempts = attempts;
        self
    }

    /// The protein this manager folds.
    pub const fn protein(&self) -> &Arc<Protein> {
        &self.protein
    }

    /// The lattice bounds conformations are laid out in.
    pub const fn dims(&self) -> [usize; D] {
        self.dims
    }

    /// Sample a legal starting conformation with a self-avoiding walk.
    ///
    /// The first residue lands on a uniformly random cell; every following residue takes a
    /// uniformly random free adjacent cell. A walk that runs into a dead end is discarded
    /// and restarted from scratch.
    ///
    /// # Errors
    /// [`FoldError::InitialPlacementFailed`] when no walk completes within the retry
    /// budget, for example when the chain cannot fit the lattice without intersecting
    /// itself.
    pub fn initial_conformation<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Conformation<D>, FoldError> {
        let lattice = Lattice::new(self.dims)?;
        'attempts: for attempt in 0..self.walk_attempts {
            let mut placed: HashSet<Coord<D>> = HashSet::with_capacity(self.protein.len());
            let mut walk: Vec<Coord<D>> = Vec::with_capacity(self.protein.len());

            let mut values = [0_i32; D];
            for (value, dim) in values.iter_mut().zip(self.dims) {
                *value = rng.random_range(0..dim as i32);
            }
            let mut current = Coord::new(values);
            placed.insert(current);
            walk.push(current);

            while walk.len() < self.protein.len() {
                match lattice.random_free_adjacent(current, &placed, rng) {
                    Ok(next) => {
                        placed.insert(next);
                        walk.push(next);
                        current = next;
                    }
                    // Dead end: restart the whole walk.
                    Err(FoldError::NoCandidate) => continue 'attempts,
                    Err(other) => return Err(other),
                }
            }

            let conformation = Conformation::new(self.protein.clone(), lattice.clone(), walk)?;
            if conformation.is_valid() {
                trace!(attempt, "self-avoiding walk placed the chain");
                return Ok(conformation);
            }
        }
        Err(FoldError::InitialPlacementFailed {
            attempts: self.walk_attempts,
        })
    }

    /// Enumerate the displacement neighbourhood of a conformation.
    ///
    /// Terminal residues contribute their end moves, interior residues their corner
    /// moves; residues whose geometric preconditions fail simply contribute nothing. Each
    /// candidate is an independent clone with exactly one residue displaced and its energy
    /// cache cleared. The order is deterministic: residues in sequence order, targets in
    /// lattice enumeration order.
    pub fn vhsd_neighbourhood(&self, conformation: &Conformation<D>) -> Vec<Conformation<D>> {
        let last = self.protein.len() - 1;
        let mut neighbourhood = Vec::new();
        for residue in 0..=last {
            let Ok(cell) = conformation.coordinate_of(residue) else {
                continue;
            };
            let targets = if residue == 0 || residue == last {
                conformation.lattice().end_moves(
                    cell,
                    residue,
                    &self.protein,
                    conformation.occupants(),
                )
            } else {
                conformation.lattice().corner_moves(
                    cell,
                    residue,
                    &self.protein,
                    conformation.occupants(),
                )
            };
            // A residue that cannot move contributes no neighbours.
            let Ok(targets) = targets else { continue };
            for target in targets {
                if let Ok(moved) = conformation.with_move(residue, target) {
                    neighbourhood.push(moved);
                }
            }
        }
        neighbourhood
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::{Conformation, ConformationManager, Coord, FoldError};
    use crate::{lattice::Lattice, sequence::Protein};

    fn manager(hp: &str, dims: [usize; 2]) -> ConformationManager<2> {
        let protein = Arc::new(Protein::from_hp("test", hp, -2, 2).unwrap());
        ConformationManager::new(protein, dims).unwrap()
    }

    #[test]
    fn initial_conformations_are_valid_self_avoiding_chains() {
        let manager = manager("HPHPHPHP", [10, 10]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..25 {
            let conformation = manager.initial_conformation(&mut rng).unwrap();
            assert!(conformation.is_valid());
            assert_eq!(conformation.path().len(), 8);
            // Self-avoidance: occupancy maps back to every residue.
            for (residue, &coord) in conformation.path().iter().enumerate() {
                assert!(conformation.lattice().is_occupied(coord));
                assert_eq!(conformation.residue_at(coord).unwrap().id(), residue);
            }
        }
    }

    #[test]
    fn impossible_layouts_exhaust_the_retry_budget() {
        // Ten residues cannot fit a four-cell grid without self-intersection.
        let manager = manager("HHHHHHHHHH", [2, 2]).with_walk_attempts(50);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            manager.initial_conformation(&mut rng),
            Err(FoldError::InitialPlacementFailed { attempts: 50 })
        );
    }

    #[test]
    fn neighbourhood_clones_differ_in_exactly_one_residue() {
        let manager = manager("HPPH", [8, 8]);
        let parent = Conformation::new(
            manager.protein().clone(),
            Lattice::new([8, 8]).unwrap(),
            vec![
                Coord::new([2, 2]),
                Coord::new([3, 2]),
                Coord::new([3, 3]),
                Coord::new([2, 3]),
            ],
        )
        .unwrap();

        let neighbourhood = manager.vhsd_neighbourhood(&parent);
        assert!(!neighbourhood.is_empty());
        for candidate in &neighbourhood {
            assert!(candidate.is_valid());
            assert_eq!(candidate.cached_energy(), None);
            let moved: Vec<usize> = parent
                .path()
                .iter()
                .zip(candidate.path())
                .enumerate()
                .filter(|(_, (old, new))| old != new)
                .map(|(residue, _)| residue)
                .collect();
            assert_eq!(moved.len(), 1, "exactly one residue must be displaced");
            let residue = moved[0];
            // The new cell was free in the parent, the old cell is free in the clone.
            assert!(!parent.lattice().is_occupied(candidate.path()[residue]));
            assert!(!candidate.lattice().is_occupied(parent.path()[residue]));
        }
    }

    #[test]
    fn a_tightly_packed_chain_has_an_empty_neighbourhood() {
        // A 2x2 lattice completely filled by the chain: nothing can move.
        let manager = manager("HPPH", [2, 2]);
        let parent = Conformation::new(
            manager.protein().clone(),
            Lattice::new([2, 2]).unwrap(),
            vec![
                Coord::new([0, 0]),
                Coord::new([1, 0]),
                Coord::new([1, 1]),
                Coord::new([0, 1]),
            ],
        )
        .unwrap();
        assert!(manager.vhsd_neighbourhood(&parent).is_empty());
    }
}
