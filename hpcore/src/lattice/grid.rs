use std::collections::HashSet;

use rand::seq::IndexedRandom;

use super::Coord;
use crate::error::FoldError;

/// A bounded occupancy grid over `[0, dims₀) × … × [0, dims_(D−1))`.
///
/// Cells are stored row-major; the keyspace is exactly the Cartesian product of the axis
/// ranges. At rest the occupied cells equal the image of the owning conformation's
/// residue→coordinate map.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lattice<const D: usize> {
    dims: [usize; D],
    cells: Vec<bool>,
}

impl<const D: usize> Lattice<D> {
    /// Create an empty lattice with the given bounds.
    ///
    /// # Errors
    /// If any dimension is zero.
    pub fn new(dims: [usize; D]) -> Result<Self, FoldError> {
        if dims.iter().any(|&d| d == 0) {
            return Err(FoldError::Hyperparameter(format!(
                "lattice dimensions {dims:?} must all be positive"
            )));
        }
        Ok(Self {
            dims,
            cells: vec![false; dims.iter().product()],
        })
    }

    /// The bounds of this lattice.
    pub const fn dims(&self) -> [usize; D] {
        self.dims
    }

    /// The total number of cells.
    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    /// Check if a coordinate lies within the bounds.
    pub fn contains(&self, cell: Coord<D>) -> bool {
        self.index(cell).is_some()
    }

    /// Row-major index of an in-bounds coordinate.
    fn index(&self, cell: Coord<D>) -> Option<usize> {
        let mut index = 0;
        for (value, dim) in cell.values().into_iter().zip(self.dims) {
            if value < 0 || value as usize >= dim {
                return None;
            }
            index = index * dim + value as usize;
        }
        Some(index)
    }

    /// Check if the cell at a coordinate is occupied. Cells outside the bounds never are.
    pub fn is_occupied(&self, cell: Coord<D>) -> bool {
        self.index(cell).is_some_and(|index| self.cells[index])
    }

    /// Set the occupancy of a single cell.
    ///
    /// # Errors
    /// If the coordinate is outside the bounds.
    pub fn set_occupied(&mut self, cell: Coord<D>, value: bool) -> Result<(), FoldError> {
        let index = self.index(cell).ok_or_else(|| FoldError::OutOfBounds {
            coordinate: cell.as_slice().to_vec(),
            dims: self.dims.to_vec(),
        })?;
        self.cells[index] = value;
        Ok(())
    }

    /// Free every cell.
    pub fn reset(&mut self) {
        self.cells.fill(false);
    }

    /// Check if two cells are lattice neighbours (ℓ₁ distance exactly one).
    pub fn are_adjacent(&self, a: Coord<D>, b: Coord<D>) -> bool {
        a.is_adjacent(b)
    }

    /// All in-bounds neighbours of a cell, in the fixed −x, +x, −y, +y (−z, +z) order.
    ///
    /// Four cells in two dimensions and six in three, fewer at the boundary.
    pub fn all_adjacent(&self, cell: Coord<D>) -> Vec<Coord<D>> {
        cell.neighbours()
            .filter(|&neighbour| self.contains(neighbour))
            .collect()
    }

    /// Uniformly sample an in-bounds neighbour of `cell` that is not in `exclude`.
    ///
    /// # Errors
    /// [`FoldError::NoCandidate`] when every in-bounds neighbour is excluded.
    pub fn random_free_adjacent<R: rand::Rng + ?Sized>(
        &self,
        cell: Coord<D>,
        exclude: &HashSet<Coord<D>>,
        rng: &mut R,
    ) -> Result<Coord<D>, FoldError> {
        let candidates: Vec<Coord<D>> = cell
            .neighbours()
            .filter(|neighbour| self.contains(*neighbour) && !exclude.contains(neighbour))
            .collect();
        candidates.choose(rng).copied().ok_or(FoldError::NoCandidate)
    }
}
