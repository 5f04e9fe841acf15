//! The persisted JSON form of protein collections.
//!
//! The format is a top-level array of protein records, each carrying its residue sequence
//! with `"H"`/`"P"` polarity tags. Any other polarity string is a hard load error.

use serde::{Deserialize, Serialize};

use super::{AminoAcid, Polarity, Protein};
use crate::error::FoldError;

#[derive(Debug, Deserialize, Serialize)]
struct AminoAcidRecord {
    name: String,
    abbreviation: String,
    polarity: Polarity,
}

#[derive(Debug, Deserialize, Serialize)]
struct ProteinRecord {
    name: String,
    sequence: Vec<AminoAcidRecord>,
    e_star: i32,
    recommended_dimension: u8,
}

impl Protein {
    /// Parse a JSON document containing an array of protein records.
    ///
    /// Residue ids are assigned positionally while reading.
    ///
    /// # Errors
    /// If the document is not valid JSON for this format, if any polarity tag is not `"H"`
    /// or `"P"`, or if any record violates the protein invariants (fewer than two residues,
    /// recommended dimension outside 2/3).
    pub fn collection_from_json(json: &str) -> Result<Vec<Self>, FoldError> {
        let records: Vec<ProteinRecord> = serde_json::from_str(json)
            .map_err(|err| FoldError::ProteinFormat(err.to_string()))?;
        records
            .into_iter()
            .map(|record| {
                let sequence = record
                    .sequence
                    .into_iter()
                    .enumerate()
                    .map(|(id, residue)| {
                        AminoAcid::new(id, residue.name, residue.abbreviation, residue.polarity)
                    })
                    .collect();
                Self::new(
                    record.name,
                    sequence,
                    record.e_star,
                    record.recommended_dimension,
                )
            })
            .collect()
    }

    /// Serialise a collection of proteins back into the JSON array format.
    ///
    /// # Errors
    /// If the JSON serialiser fails.
    pub fn collection_to_json(proteins: &[Self]) -> Result<String, FoldError> {
        let records = proteins
            .iter()
            .map(|protein| ProteinRecord {
                name: protein.name().to_string(),
                sequence: protein
                    .sequence()
                    .iter()
                    .map(|residue| AminoAcidRecord {
                        name: residue.name().to_string(),
                        abbreviation: residue.abbreviation().to_string(),
                        polarity: residue.polarity(),
                    })
                    .collect(),
                e_star: protein.e_star(),
                recommended_dimension: protein.recommended_dimension(),
            })
            .collect::<Vec<_>>();
        serde_json::to_string_pretty(&records).map_err(|err| FoldError::ProteinFormat(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::Protein;

    const COLLECTION: &str = r#"[
        {
            "name": "toy",
            "sequence": [
                {"name": "methionine", "abbreviation": "Met", "polarity": "H"},
                {"name": "serine", "abbreviation": "Ser", "polarity": "P"},
                {"name": "leucine", "abbreviation": "Leu", "polarity": "H"}
            ],
            "e_star": -1,
            "recommended_dimension": 2
        }
    ]"#;

    #[test]
    fn loads_a_collection() {
        let proteins = Protein::collection_from_json(COLLECTION).unwrap();
        assert_eq!(proteins.len(), 1);
        assert_eq!(proteins[0].name(), "toy");
        assert_eq!(proteins[0].to_string(), "HPH");
        assert_eq!(proteins[0].e_star(), -1);
        assert_eq!(proteins[0].sequence()[1].abbreviation(), "Ser");
    }

    #[test]
    fn invalid_polarity_is_a_hard_error() {
        let broken = COLLECTION.replace("\"P\"", "\"Q\"");
        assert!(Protein::collection_from_json(&broken).is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let proteins = Protein::collection_from_json(COLLECTION).unwrap();
        let json = Protein::collection_to_json(&proteins).unwrap();
        assert_eq!(Protein::collection_from_json(&json).unwrap(), proteins);
    }
}
