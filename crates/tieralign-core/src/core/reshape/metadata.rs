//! Tier pair metadata tables
//!
//! Headerless CSV, one pair per row: `<source tier id>,<target tier id>`.
//! Extra columns are ignored.

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::core::{AlignError, AlignResult, TierId};

/// A requested source/target tier pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPairSpec {
    pub source_id: TierId,
    pub target_id: TierId,
}

impl TierPairSpec {
    pub fn new(source_id: impl Into<TierId>, target_id: impl Into<TierId>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
        }
    }
}

/// Reads tier pairs from CSV data.
pub fn read_tier_pairs<R: Read>(reader: R) -> AlignResult<Vec<TierPairSpec>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| AlignError::Metadata(e.to_string()))?;
        match (row.get(0), row.get(1)) {
            (Some(source), Some(target)) if !source.is_empty() && !target.is_empty() => {
                pairs.push(TierPairSpec::new(source, target));
            }
            _ => {
                return Err(AlignError::Metadata(format!(
                    "row {}: expected two tier ids, found {:?}",
                    index + 1,
                    row.iter().collect::<Vec<_>>()
                )));
            }
        }
    }

    Ok(pairs)
}

/// Reads tier pairs from a CSV file.
pub fn load_tier_pairs(path: &Path) -> AlignResult<Vec<TierPairSpec>> {
    let file = std::fs::File::open(path)?;
    read_tier_pairs(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_pairs() {
        let data = "Мама,Mama-Spch\nПапа,Papa-Spch,note\n";
        let pairs = read_tier_pairs(data.as_bytes()).unwrap();

        assert_eq!(
            pairs,
            vec![
                TierPairSpec::new("Мама", "Mama-Spch"),
                TierPairSpec::new("Папа", "Papa-Spch"),
            ]
        );
    }

    #[test]
    fn test_quoted_ids_with_separators() {
        let data = "\"Мама, старшая\",\"Mama, ältere-Spch\"\n";
        let pairs = read_tier_pairs(data.as_bytes()).unwrap();
        assert_eq!(pairs[0].source_id, "Мама, старшая");
        assert_eq!(pairs[0].target_id, "Mama, ältere-Spch");
    }

    #[test]
    fn test_short_row_is_rejected() {
        let err = read_tier_pairs("Мама,Mama-Spch\nПапа\n".as_bytes()).unwrap_err();
        match err {
            AlignError::Metadata(msg) => assert!(msg.starts_with("row 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiers.csv");
        std::fs::write(&path, "A,B\n").unwrap();

        assert_eq!(load_tier_pairs(&path).unwrap(), vec![TierPairSpec::new("A", "B")]);
    }
}
