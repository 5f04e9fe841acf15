#![doc = include_str!("../README.md")]

/// Contains conformations and the manager that samples and perturbs them.
pub mod conformation;
mod error;
mod fold;
/// Contains the bounded lattice, its coordinates, and the local move generators.
pub mod lattice;
/// Contains the Metropolis and replica exchange optimizers and their hyperparameters.
pub mod search;
/// Contains the HP sequence model: polarities, residues, and proteins.
pub mod sequence;

pub use error::FoldError;
pub use fold::{Folded, fold};

/// A subset of the types that are envisioned to be used the most, importing this is a
/// good starting point for working with the crate.
pub mod prelude {
    pub use crate::conformation::{Conformation, ConformationManager};
    pub use crate::error::FoldError;
    pub use crate::fold::{Folded, fold};
    pub use crate::lattice::{Coord, Lattice, MoveKind};
    pub use crate::search::{Metropolis, Remc, SearchParams};
    pub use crate::sequence::{AminoAcid, Polarity, Protein};
}
