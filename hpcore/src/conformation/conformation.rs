use std::{collections::HashMap, sync::Arc};

use itertools::Itertools;

use crate::{
    error::FoldError,
    lattice::{Coord, Lattice},
    sequence::{AminoAcid, Protein},
};

/// A self-avoiding embedding of a protein chain into a lattice.
///
/// Holds the shared protein, an exclusively owned lattice snapshot whose occupied cells
/// mirror the residue positions, the residue→coordinate map in both directions, and a lazy
/// energy cache. Cloning yields a fully independent snapshot; trial moves are applied to
/// clones and never touch the parent.
///
/// Construction enforces that every residue has exactly one in-bounds coordinate and that
/// all coordinates are distinct. Chain connectivity is checked separately by
/// [`Self::is_valid`] so that the sampler can probe partially random layouts.
#[derive(Clone, Debug, PartialEq)]
pub struct Conformation<const D: usize> {
    protein: Arc<Protein>,
    lattice: Lattice<D>,
    positions: Vec<Coord<D>>,
    by_coord: HashMap<Coord<D>, usize>,
    energy: Option<i32>,
}

impl<const D: usize> Conformation<D> {
    /// Build a conformation from the positions of all residues, in residue id order.
    ///
    /// The lattice is reset and re-marked so its occupied cells are exactly the given
    /// positions.
    ///
    /// # Errors
    /// [`FoldError::InvalidConformation`] if the number of positions does not match the
    /// protein length or two residues share a coordinate, and [`FoldError::OutOfBounds`]
    /// if any position lies outside the lattice.
    pub fn new(
        protein: Arc<Protein>,
        mut lattice: Lattice<D>,
        positions: Vec<Coord<D>>,
    ) -> Result<Self, FoldError> {
        if positions.len() != protein.len() {
            return Err(FoldError::InvalidConformation);
        }
        let mut by_coord = HashMap::with_capacity(positions.len());
        lattice.reset();
        for (residue, &coord) in positions.iter().enumerate() {
            if by_coord.insert(coord, residue).is_some() {
                return Err(FoldError::InvalidConformation);
            }
            lattice.set_occupied(coord, true)?;
        }
        Ok(Self {
            protein,
            lattice,
            positions,
            by_coord,
            energy: None,
        })
    }

    /// The protein this conformation embeds.
    pub fn protein(&self) -> &Arc<Protein> {
        &self.protein
    }

    /// The lattice snapshot owned by this conformation.
    pub const fn lattice(&self) -> &Lattice<D> {
        &self.lattice
    }

    /// The residue→coordinate map as a slice indexed by residue id, in sequence order.
    ///
    /// This is the read-only view downstream visualizers consume.
    pub fn path(&self) -> &[Coord<D>] {
        &self.positions
    }

    /// The coordinate→residue map used by the move generators.
    pub(crate) const fn occupants(&self) -> &HashMap<Coord<D>, usize> {
        &self.by_coord
    }

    /// The coordinate of the residue with the given id.
    ///
    /// # Errors
    /// [`FoldError::ResidueNotFound`] if the id is not part of this conformation.
    pub fn coordinate_of(&self, residue: usize) -> Result<Coord<D>, FoldError> {
        self.positions
            .get(residue)
            .copied()
            .ok_or(FoldError::ResidueNotFound { id: residue })
    }

    /// The residue sitting at the given coordinate, if any.
    pub fn residue_at(&self, coord: Coord<D>) -> Option<&AminoAcid> {
        self.by_coord
            .get(&coord)
            .map(|&residue| &self.protein.sequence()[residue])
    }

    /// Check chain connectivity: every pair of sequence neighbours must sit on adjacent
    /// lattice cells. Self-avoidance and bounds hold by construction.
    pub fn is_valid(&self) -> bool {
        self.positions
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.is_adjacent(*b))
    }

    /// The HP contact energy: −1 for every pair of hydrophobic residues that are lattice
    /// neighbours but not sequence neighbours. Bonded pairs are chain structure, not
    /// topological contacts, and never score.
    ///
    /// Pure in the residue→coordinate map; computing it twice gives the same value.
    pub fn compute_energy(&self) -> i32 {
        let contacts = self
            .protein
            .hydrophobic_ids()
            .tuple_combinations()
            .filter(|&(i, j)| {
                j - i > 1 && self.positions[i].is_adjacent(self.positions[j])
            })
            .count();
        -(contacts as i32)
    }

    /// The energy of this conformation, computed on first use and cached.
    ///
    /// Every mutation clears the cache, so a stale value can never be observed.
    pub fn energy(&mut self) -> i32 {
        if let Some(energy) = self.energy {
            energy
        } else {
            let energy = self.compute_energy();
            self.energy = Some(energy);
            energy
        }
    }

    /// The cached energy, if it has been computed since the last mutation.
    pub const fn cached_energy(&self) -> Option<i32> {
        self.energy
    }

    /// Clone this conformation with a single residue displaced to a new coordinate.
    ///
    /// The old cell is freed, the target cell is occupied, both directions of the
    /// residue→coordinate map are updated, and the energy cache of the clone is cleared.
    ///
    /// # Errors
    /// [`FoldError::ResidueNotFound`] for an unknown residue, [`FoldError::OutOfBounds`]
    /// for a target outside the lattice, and [`FoldError::InvalidConformation`] for an
    /// occupied target.
    pub fn with_move(&self, residue: usize, target: Coord<D>) -> Result<Self, FoldError> {
        let source = self.coordinate_of(residue)?;
        if self.lattice.is_occupied(target) {
            return Err(FoldError::InvalidConformation);
        }
        let mut moved = self.clone();
        moved.lattice.set_occupied(target, true)?;
        moved.lattice.set_occupied(source, false)?;
        moved.positions[residue] = target;
        moved.by_coord.remove(&source);
        moved.by_coord.insert(target, residue);
        moved.energy = None;
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Conformation, Coord, FoldError, Lattice};
    use crate::sequence::Protein;

    fn chain(hp: &str, cells: &[[i32; 2]]) -> Conformation<2> {
        let protein = Arc::new(Protein::from_hp("test", hp, 0, 2).unwrap());
        let lattice = Lattice::new([8, 8]).unwrap();
        Conformation::new(protein, lattice, cells.iter().map(|&c| Coord::new(c)).collect())
            .unwrap()
    }

    #[test]
    fn construction_checks_the_shape() {
        let protein = Arc::new(Protein::from_hp("test", "HPH", 0, 2).unwrap());
        let lattice = Lattice::new([4, 4]).unwrap();
        assert!(matches!(
            Conformation::new(
                protein.clone(),
                lattice.clone(),
                vec![Coord::new([0, 0]), Coord::new([0, 1])],
            ),
            Err(FoldError::InvalidConformation)
        ));
        assert!(matches!(
            Conformation::new(
                protein.clone(),
                lattice.clone(),
                vec![Coord::new([0, 0]), Coord::new([0, 1]), Coord::new([0, 0])],
            ),
            Err(FoldError::InvalidConformation)
        ));
        assert!(matches!(
            Conformation::new(
                protein,
                lattice,
                vec![Coord::new([0, 0]), Coord::new([0, 1]), Coord::new([0, 9])],
            ),
            Err(FoldError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn validity_is_chain_connectivity() {
        assert!(chain("HPH", &[[0, 0], [1, 0], [1, 1]]).is_valid());
        assert!(!chain("HPH", &[[0, 0], [1, 0], [3, 0]]).is_valid());
    }

    #[test]
    fn bonded_h_pairs_do_not_score() {
        // A straight all-H chain: every H-H adjacency is a bond, energy stays zero.
        let mut straight = chain("HHHH", &[[0, 0], [1, 0], [2, 0], [3, 0]]);
        assert_eq!(straight.energy(), 0);
    }

    #[test]
    fn topological_h_contacts_score_minus_one() {
        // A U-turn: residues 0 and 3 are both H and end up adjacent without being bonded.
        let mut folded = chain("HPPH", &[[0, 0], [1, 0], [1, 1], [0, 1]]);
        assert_eq!(folded.energy(), -1);
        assert_eq!(folded.compute_energy(), folded.compute_energy());
    }

    #[test]
    fn length_two_proteins_always_have_zero_energy() {
        let mut bond = chain("HH", &[[0, 0], [1, 0]]);
        assert_eq!(bond.energy(), 0);
    }

    #[test]
    fn moving_a_residue_updates_both_maps_and_clears_the_cache() {
        let mut conformation = chain("HPPH", &[[0, 0], [1, 0], [1, 1], [0, 1]]);
        assert_eq!(conformation.energy(), -1);

        let moved = conformation.with_move(3, Coord::new([2, 1])).unwrap();
        assert_eq!(moved.cached_energy(), None);
        assert_eq!(moved.coordinate_of(3).unwrap(), Coord::new([2, 1]));
        assert!(!moved.lattice().is_occupied(Coord::new([0, 1])));
        assert!(moved.lattice().is_occupied(Coord::new([2, 1])));
        // The parent is untouched.
        assert_eq!(conformation.coordinate_of(3).unwrap(), Coord::new([0, 1]));
        assert!(conformation.lattice().is_occupied(Coord::new([0, 1])));

        assert!(matches!(
            conformation.with_move(3, Coord::new([1, 1])),
            Err(FoldError::InvalidConformation)
        ));
        assert!(matches!(
            conformation.with_move(9, Coord::new([2, 1])),
            Err(FoldError::ResidueNotFound { id: 9 })
        ));
    }

    #[test]
    fn energy_round_trips_through_the_path() {
        let conformation = chain("HPHPH", &[[2, 2], [3, 2], [3, 3], [2, 3], [2, 4]]);
        let rebuilt = Conformation::new(
            conformation.protein().clone(),
            Lattice::new([8, 8]).unwrap(),
            conformation.path().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt.compute_energy(), conformation.compute_energy());
    }

    #[test]
    fn energy_round_trips_through_serialised_coordinates() {
        let conformation = chain("HPPHH", &[[2, 2], [3, 2], [3, 3], [2, 3], [1, 3]]);
        let json = serde_json::to_string(conformation.path()).unwrap();
        let positions: Vec<Coord<2>> = serde_json::from_str(&json).unwrap();
        let rebuilt = Conformation::new(
            conformation.protein().clone(),
            Lattice::new([8, 8]).unwrap(),
            positions,
        )
        .unwrap();
        assert_eq!(rebuilt.compute_energy(), conformation.compute_energy());
    }
}
