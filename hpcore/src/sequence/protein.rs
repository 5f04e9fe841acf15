use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::{AminoAcid, Polarity};
use crate::error::FoldError;

/// An HP protein: a named, ordered sequence of at least two residues together with its
/// target energy and the lattice dimensionality it is recommended to be folded in.
///
/// The constructor enforces that residue ids are exactly `0..n` in positional order, so an
/// id doubles as a sequence index and every id-based lookup is O(1).
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Protein {
    name: String,
    sequence: Vec<AminoAcid>,
    e_star: i32,
    recommended_dimension: u8,
}

impl Protein {
    /// Create a new protein from a full residue sequence.
    ///
    /// # Errors
    /// If the sequence is shorter than two residues, if the residue ids are not exactly
    /// `0..n` in positional order, or if the recommended dimension is not 2 or 3.
    pub fn new(
        name: impl Into<String>,
        sequence: Vec<AminoAcid>,
        e_star: i32,
        recommended_dimension: u8,
    ) -> Result<Self, FoldError> {
        let name = name.into();
        if sequence.len() < 2 {
            return Err(FoldError::Hyperparameter(format!(
                "protein '{name}' has {} residues, at least 2 are needed",
                sequence.len()
            )));
        }
        if let Some(wrong) = sequence.iter().enumerate().find(|(i, a)| *i != a.id()) {
            return Err(FoldError::ProteinFormat(format!(
                "protein '{name}' has residue id {} at position {}, ids must be contiguous and in positional order",
                wrong.1.id(),
                wrong.0,
            )));
        }
        if !matches!(recommended_dimension, 2 | 3) {
            return Err(FoldError::ProteinFormat(format!(
                "protein '{name}' recommends dimension {recommended_dimension}, only 2 and 3 exist"
            )));
        }
        Ok(Self {
            name,
            sequence,
            e_star,
            recommended_dimension,
        })
    }

    /// Create a protein from an HP string like `"HPHHPPH"`.
    ///
    /// Residues get placeholder names derived from their polarity.
    /// ```rust
    /// use hpcore::sequence::Protein;
    /// let protein = Protein::from_hp("example", "HPHHPPH", -2, 2).unwrap();
    /// assert_eq!(protein.to_string(), "HPHHPPH");
    /// assert!(Protein::from_hp("example", "HPX", -2, 2).is_err());
    /// ```
    ///
    /// # Errors
    /// If the string contains any character other than `H` or `P`, or is shorter than two
    /// characters.
    pub fn from_hp(
        name: impl Into<String>,
        hp: &str,
        e_star: i32,
        recommended_dimension: u8,
    ) -> Result<Self, FoldError> {
        let sequence = hp
            .chars()
            .enumerate()
            .map(|(id, c)| match c {
                'H' => Ok(AminoAcid::new(id, "hydrophobic", "H", Polarity::Hydrophobic)),
                'P' => Ok(AminoAcid::new(id, "polar", "P", Polarity::Polar)),
                other => Err(FoldError::ProteinFormat(format!(
                    "invalid HP character '{other}', expected 'H' or 'P'"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, sequence, e_star, recommended_dimension)
    }

    /// The name of this protein.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered residue sequence.
    pub fn sequence(&self) -> &[AminoAcid] {
        &self.sequence
    }

    /// The number of residues.
    pub const fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the sequence is empty. Always false, a protein carries at least two residues.
    pub const fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The target (theoretical optimal) energy of this protein in the HP model.
    pub const fn e_star(&self) -> i32 {
        self.e_star
    }

    /// The recommended lattice dimensionality (2 or 3) for folding this protein.
    pub const fn recommended_dimension(&self) -> u8 {
        self.recommended_dimension
    }

    /// The positions of all hydrophobic residues, in sequence order.
    pub fn hydrophobic_ids(&self) -> impl Iterator<Item = usize> + Clone {
        self.sequence
            .iter()
            .filter(|a| a.polarity().is_hydrophobic())
            .map(AminoAcid::id)
    }

    /// Check if the residues with the given ids are bonded neighbours in the sequence.
    ///
    /// False if either id does not belong to this protein. Ids equal sequence positions, so
    /// this is a constant-time check.
    pub const fn are_sequence_neighbours(&self, a: usize, b: usize) -> bool {
        a < self.sequence.len() && b < self.sequence.len() && a.abs_diff(b) == 1
    }
}

impl Display for Protein {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for amino_acid in &self.sequence {
            write!(f, "{}", amino_acid.polarity())?;
        }
        Ok(())
    }
}
