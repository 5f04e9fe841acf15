//! The [`FoldError`] which makes it easy for downstream users of the error type to match on the exact error.

use thiserror::Error;

/// All errors that can arise while building proteins, laying out conformations, or folding.
///
/// Move generator errors ([`Self::NotEndCell`], [`Self::NotCornerCell`]) are recovered internally
/// by the neighbourhood enumerator and never escape a fold. Everything else surfaces unchanged.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FoldError {
    /// A coordinate fell outside the lattice bounds.
    #[error("coordinate {coordinate:?} is outside the lattice bounds {dims:?}")]
    OutOfBounds {
        /// The offending coordinate.
        coordinate: Vec<i32>,
        /// The lattice dimensions it was checked against.
        dims: Vec<usize>,
    },
    /// No free adjacent cell was available while extending the self-avoiding walk.
    #[error("no free adjacent cell available")]
    NoCandidate,
    /// An end move was requested on a cell that does not have exactly one chain neighbour,
    /// or the chain neighbour has no free adjacent cell to pivot to.
    #[error("cell is not an end cell or has no free pivot target")]
    NotEndCell,
    /// A corner move was requested on a cell that does not have exactly two chain neighbours,
    /// or the two chain neighbours share no free adjacent cell.
    #[error("cell is not a corner cell or has no free pivot target")]
    NotCornerCell,
    /// A residue id was looked up that is not part of the conformation.
    #[error("residue {id} not found in the conformation")]
    ResidueNotFound {
        /// The id that missed.
        id: usize,
    },
    /// A conformation failed its validity check after construction.
    #[error("conformation violates the chain connectivity or self-avoidance invariants")]
    InvalidConformation,
    /// A hyperparameter combination was rejected before any work began.
    #[error("invalid hyperparameters: {0}")]
    Hyperparameter(String),
    /// The self-avoiding-walk sampler exhausted its retry budget.
    #[error("no legal starting conformation found within {attempts} attempts")]
    InitialPlacementFailed {
        /// The number of full walk attempts made.
        attempts: usize,
    },
    /// A protein record could not be built or parsed.
    #[error("invalid protein record: {0}")]
    ProteinFormat(String),
}
