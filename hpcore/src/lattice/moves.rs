//! Local move generators over the occupancy grid.
//!
//! A move proposes new positions for a single residue while every other residue stays
//! put. End moves pivot the first or last residue around its only chain neighbour; corner
//! moves flip an interior residue across the diagonal of the corner formed by its two
//! chain neighbours. Together they form the displacement neighbourhood the Monte Carlo
//! search samples from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Coord, Lattice};
use crate::{error::FoldError, sequence::Protein};

/// The kinds of local moves the neighbourhood can be built from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MoveKind {
    /// Pivot a terminal residue to a free cell adjacent to its single chain neighbour.
    End,
    /// Flip an interior residue across the corner formed by its two chain neighbours.
    Corner,
    /// Rotate a U-shaped four-residue segment around its anchor bond. Declared as an
    /// extension point; no generator is implemented.
    Crankshaft,
    /// Drag a residue and pull the rest of the chain behind it. Declared as an extension
    /// point; no generator is implemented.
    Pull,
}

impl<const D: usize> Lattice<D> {
    /// The occupied in-bounds neighbours of `cell` that hold a sequence neighbour of
    /// `residue`, in enumeration order.
    fn chain_neighbours(
        &self,
        cell: Coord<D>,
        residue: usize,
        protein: &Protein,
        occupants: &HashMap<Coord<D>, usize>,
    ) -> Vec<Coord<D>> {
        self.all_adjacent(cell)
            .into_iter()
            .filter(|adjacent| {
                self.is_occupied(*adjacent)
                    && occupants
                        .get(adjacent)
                        .is_some_and(|&other| protein.are_sequence_neighbours(other, residue))
            })
            .collect()
    }

    /// Compute the end-move targets for `residue` currently sitting at `cell`.
    ///
    /// The residue must have exactly one chain neighbour on the grid (it is the first or
    /// last of the chain). The targets are the free cells adjacent to that neighbour; the
    /// residue pivots onto one of them while the bond stays intact.
    ///
    /// # Errors
    /// [`FoldError::NotEndCell`] when the cell does not have exactly one chain neighbour
    /// or no free pivot target exists.
    pub fn end_moves(
        &self,
        cell: Coord<D>,
        residue: usize,
        protein: &Protein,
        occupants: &HashMap<Coord<D>, usize>,
    ) -> Result<Vec<Coord<D>>, FoldError> {
        let &[pivot] = self
            .chain_neighbours(cell, residue, protein, occupants)
            .as_slice()
        else {
            return Err(FoldError::NotEndCell);
        };
        let targets: Vec<Coord<D>> = self
            .all_adjacent(pivot)
            .into_iter()
            .filter(|&target| !self.is_occupied(target) && target != cell)
            .collect();
        if targets.is_empty() {
            return Err(FoldError::NotEndCell);
        }
        Ok(targets)
    }

    /// Compute the corner-move targets for `residue` currently sitting at `cell`.
    ///
    /// The residue must have exactly two chain neighbours on the grid. A target is a free
    /// cell adjacent to both of them, which on a cubic lattice is the opposite corner of
    /// the square the three residues span; moving there keeps both bonds intact.
    ///
    /// # Errors
    /// [`FoldError::NotCornerCell`] when the cell does not have exactly two chain
    /// neighbours or no free common target exists.
    pub fn corner_moves(
        &self,
        cell: Coord<D>,
        residue: usize,
        protein: &Protein,
        occupants: &HashMap<Coord<D>, usize>,
    ) -> Result<Vec<Coord<D>>, FoldError> {
        let &[before, after] = self
            .chain_neighbours(cell, residue, protein, occupants)
            .as_slice()
        else {
            return Err(FoldError::NotCornerCell);
        };
        let shared: Vec<Coord<D>> = self
            .all_adjacent(before)
            .into_iter()
            .filter(|&target| {
                target.is_adjacent(after) && !self.is_occupied(target) && target != cell
            })
            .collect();
        if shared.is_empty() {
            return Err(FoldError::NotCornerCell);
        }
        Ok(shared)
    }
}
