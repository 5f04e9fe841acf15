use serde::{Deserialize, Serialize};

use super::Polarity;

/// A single residue of an HP protein.
///
/// The `id` is the identity used in every lookup; it equals the residue's position in the
/// protein sequence and is unique within one protein. The name and abbreviation are opaque
/// labels carried along for downstream consumers.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct AminoAcid {
    id: usize,
    name: String,
    abbreviation: String,
    polarity: Polarity,
}

impl AminoAcid {
    /// Create a new residue.
    pub fn new(
        id: usize,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        polarity: Polarity,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: abbreviation.into(),
            polarity,
        }
    }

    /// The stable identity of this residue within its protein.
    pub const fn id(&self) -> usize {
        self.id
    }

    /// The full name of this residue.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The abbreviated name of this residue.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// The polarity of this residue.
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }
}
