use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The polarity of a residue in the Hydrophobic-Polar model.
///
/// Only hydrophobic pairs contribute to the energy of a conformation; polar residues
/// shape the chain but never score.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Polarity {
    /// A hydrophobic residue (`H`).
    #[serde(rename = "H")]
    Hydrophobic,
    /// A polar residue (`P`).
    #[serde(rename = "P")]
    Polar,
}

impl Polarity {
    /// Check if this is [`Self::Hydrophobic`].
    pub const fn is_hydrophobic(self) -> bool {
        matches!(self, Self::Hydrophobic)
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Hydrophobic => "H",
                Self::Polar => "P",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Polarity;

    #[test]
    fn serialises_as_single_letters() {
        assert_eq!(
            serde_json::to_string(&Polarity::Hydrophobic).unwrap(),
            "\"H\""
        );
        assert_eq!(serde_json::to_string(&Polarity::Polar).unwrap(), "\"P\"");
        assert_eq!(
            serde_json::from_str::<Polarity>("\"H\"").unwrap(),
            Polarity::Hydrophobic
        );
        assert!(serde_json::from_str::<Polarity>("\"X\"").is_err());
    }
}
