use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    conformation::{Conformation, ConformationManager},
    error::FoldError,
    search::{Remc, SearchParams},
    sequence::{AminoAcid, Protein},
};

/// The result of a fold: the best conformation observed, tagged by lattice dimension.
///
/// The dimension is fixed at two or three when the lattice bounds are chosen; everything
/// below this type is monomorphized over it. Use [`Self::path`] for a dimension-erased
/// view suitable for visualizers, or the typed accessors to keep working with the
/// concrete lattice.
#[derive(Clone, Debug)]
pub enum Folded {
    /// A conformation on a two-dimensional lattice.
    Dim2(Conformation<2>),
    /// A conformation on a three-dimensional lattice.
    Dim3(Conformation<3>),
}

impl Folded {
    /// The lattice dimensionality of this conformation.
    pub const fn dimension(&self) -> usize {
        match self {
            Self::Dim2(_) => 2,
            Self::Dim3(_) => 3,
        }
    }

    /// The final energy of this conformation.
    pub fn energy(&self) -> i32 {
        match self {
            Self::Dim2(conformation) => conformation
                .cached_energy()
                .unwrap_or_else(|| conformation.compute_energy()),
            Self::Dim3(conformation) => conformation
                .cached_energy()
                .unwrap_or_else(|| conformation.compute_energy()),
        }
    }

    /// The folded protein.
    pub fn protein(&self) -> &Arc<Protein> {
        match self {
            Self::Dim2(conformation) => conformation.protein(),
            Self::Dim3(conformation) => conformation.protein(),
        }
    }

    /// The residue→coordinate map in residue sequence order, dimension erased.
    pub fn path(&self) -> Vec<(&AminoAcid, &[i32])> {
        match self {
            Self::Dim2(conformation) => conformation
                .protein()
                .sequence()
                .iter()
                .zip(conformation.path().iter().map(|coord| coord.as_slice()))
                .collect(),
            Self::Dim3(conformation) => conformation
                .protein()
                .sequence()
                .iter()
                .zip(conformation.path().iter().map(|coord| coord.as_slice()))
                .collect(),
        }
    }

    /// The typed conformation, if this fold ran on a two-dimensional lattice.
    pub const fn as_2d(&self) -> Option<&Conformation<2>> {
        match self {
            Self::Dim2(conformation) => Some(conformation),
            Self::Dim3(_) => None,
        }
    }

    /// The typed conformation, if this fold ran on a three-dimensional lattice.
    pub const fn as_3d(&self) -> Option<&Conformation<3>> {
        match self {
            Self::Dim3(conformation) => Some(conformation),
            Self::Dim2(_) => None,
        }
    }
}

/// Fold a protein on a lattice with the given bounds.
///
/// Validates the hyperparameters and bounds, samples a legal starting conformation with a
/// self-avoiding walk, then runs the replica exchange search until the protein's target
/// energy is reached or the iteration cap runs out. Passing a seed makes the whole run
/// reproducible; without one the generator is seeded from the operating system.
///
/// # Errors
/// [`FoldError::Hyperparameter`] for invalid parameters or bounds (including a `dims`
/// length other than 2 or 3) and [`FoldError::InitialPlacementFailed`] when no legal
/// starting conformation exists within the retry budget.
pub fn fold(
    protein: &Protein,
    dims: &[usize],
    params: &SearchParams,
    seed: Option<u64>,
) -> Result<Folded, FoldError> {
    params.validate()?;
    let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    match *dims {
        [x, y] => run(protein, [x, y], params, &mut rng).map(Folded::Dim2),
        [x, y, z] => run(protein, [x, y, z], params, &mut rng).map(Folded::Dim3),
        ref other => Err(FoldError::Hyperparameter(format!(
            "a lattice has 2 or 3 dimensions, got {}",
            other.len()
        ))),
    }
}

fn run<const D: usize, R: Rng + ?Sized>(
    protein: &Protein,
    dims: [usize; D],
    params: &SearchParams,
    rng: &mut R,
) -> Result<Conformation<D>, FoldError> {
    let manager = ConformationManager::new(Arc::new(protein.clone()), dims)?;
    let initial = manager.initial_conformation(rng)?;
    let remc = Remc::new(manager, params.clone())?;
    let mut best = remc.optimize(initial, rng);
    best.energy();
    Ok(best)
}
