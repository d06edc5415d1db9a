//! Gazetteer tables: canonical places, their typed variants and postal codes, per region.

use std::path::Path;

use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{Coordinate, DataError, Region, RegionId, Result, read_json};

/// Normalize a user-typed place string for comparison: lowercase, trimmed,
/// inner whitespace collapsed to single spaces.
pub fn normalize_key(value: &str) -> String {
    value.split_whitespace().join(" ").to_lowercase()
}

/// True for a six digit Indian postal index number.
pub fn is_postal_code(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}

/// One canonical place and the spellings that refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub place: String,
    pub postal_code: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub centroid: Coordinate,
}

impl PlaceRecord {
    /// Normalized lookup keys: the canonical name first, then each alias, without duplicates.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.place)
            .chain(self.aliases.iter())
            .map(|s| normalize_key(s))
            .filter(|s| !s.is_empty())
            .unique()
    }
}

/// All places of one region, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    #[serde(flatten)]
    pub region: Region,
    pub centroid: Coordinate,
    pub places: Vec<PlaceRecord>,
}

/// The complete static gazetteer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GazetteerData {
    pub regions: Vec<RegionTable>,
}

impl GazetteerData {
    /// Load and validate a gazetteer from a JSON file.
    #[instrument(name = "Load gazetteer", level = "info", skip_all, fields(path = ?path.as_ref()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data: Self = read_json(path.as_ref())?;
        data.validate()?;
        Ok(data)
    }

    pub fn region(&self, id: &RegionId) -> Option<&RegionTable> {
        self.regions.iter().find(|table| &table.region.id == id)
    }

    /// Check the table invariants.
    ///
    /// - region ids are unique
    /// - every postal code is six digits
    /// - inside a region every alias maps to exactly one postal code
    /// - a postal code belongs to at most one region
    pub fn validate(&self) -> Result<()> {
        let mut seen_regions: HashSet<&RegionId> = HashSet::new();
        let mut postal_owner: HashMap<&str, &RegionId> = HashMap::new();

        for table in &self.regions {
            if !seen_regions.insert(&table.region.id) {
                return Err(DataError::DuplicateRegion(table.region.id.to_string()));
            }

            let mut alias_postal: HashMap<String, &str> = HashMap::new();
            for record in &table.places {
                if !is_postal_code(&record.postal_code) {
                    return Err(DataError::InvalidPostalCode(record.postal_code.clone()));
                }

                match postal_owner.get(record.postal_code.as_str()) {
                    Some(owner) if *owner != &table.region.id => {
                        return Err(DataError::PostalCodeInMultipleRegions {
                            postal_code: record.postal_code.clone(),
                            first: owner.to_string(),
                            second: table.region.id.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        postal_owner.insert(&record.postal_code, &table.region.id);
                    }
                }

                for key in record.keys() {
                    if let Some(existing) = alias_postal.get(&key) {
                        if *existing != record.postal_code {
                            return Err(DataError::ConflictingAlias {
                                region: table.region.id.to_string(),
                                alias: key,
                                first: (*existing).to_string(),
                                second: record.postal_code.clone(),
                            });
                        }
                        continue;
                    }
                    alias_postal.insert(key, &record.postal_code);
                }
            }
            debug!(
                region = %table.region.id,
                places = table.places.len(),
                aliases = alias_postal.len(),
                "Validated region table"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EMBEDDED_GAZETTEER;

    fn record(place: &str, postal: &str, aliases: &[&str]) -> PlaceRecord {
        PlaceRecord {
            place: place.to_string(),
            postal_code: postal.to_string(),
            aliases: aliases.iter().map(ToString::to_string).collect(),
            centroid: Coordinate::new(0.0, 0.0),
        }
    }

    fn table(id: &str, places: Vec<PlaceRecord>) -> RegionTable {
        RegionTable {
            region: Region {
                id: id.into(),
                name: id.to_string(),
                country: "India".to_string(),
            },
            centroid: Coordinate::new(0.0, 0.0),
            places,
        }
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Bengaluru   Urban \t"), "bengaluru urban");
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn test_is_postal_code() {
        assert!(is_postal_code("682001"));
        assert!(!is_postal_code("68200"));
        assert!(!is_postal_code("68200a"));
        assert!(!is_postal_code("6820011"));
    }

    #[test]
    fn test_keys_are_unique_and_normalized() {
        let record = record("Kollam", "691001", &["KOLLAM", " Quilon "]);
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["kollam", "quilon"]);
    }

    #[test]
    fn test_conflicting_alias_is_rejected() {
        let data = GazetteerData {
            regions: vec![table(
                "kerala",
                vec![
                    record("Kollam", "691001", &["quilon"]),
                    record("Quilon Beach", "691002", &["quilon"]),
                ],
            )],
        };
        assert!(matches!(
            data.validate(),
            Err(DataError::ConflictingAlias { .. })
        ));
    }

    #[test]
    fn test_postal_code_in_two_regions_is_rejected() {
        let data = GazetteerData {
            regions: vec![
                table("kerala", vec![record("Kollam", "691001", &[])]),
                table("karnataka", vec![record("Elsewhere", "691001", &[])]),
            ],
        };
        assert!(matches!(
            data.validate(),
            Err(DataError::PostalCodeInMultipleRegions { .. })
        ));
    }

    #[test]
    fn test_invalid_postal_code_is_rejected() {
        let data = GazetteerData {
            regions: vec![table("kerala", vec![record("Kollam", "6910", &[])])],
        };
        assert!(matches!(
            data.validate(),
            Err(DataError::InvalidPostalCode(_))
        ));
    }

    #[test]
    fn test_duplicate_region_is_rejected() {
        let data = GazetteerData {
            regions: vec![table("kerala", vec![]), table("kerala", vec![])],
        };
        assert!(matches!(
            data.validate(),
            Err(DataError::DuplicateRegion(_))
        ));
    }

    #[test]
    fn test_region_lookup() {
        let kerala = EMBEDDED_GAZETTEER.region(&RegionId::new("kerala")).unwrap();
        assert_eq!(kerala.region.name, "Kerala");
        assert!(EMBEDDED_GAZETTEER.region(&RegionId::new("goa")).is_none());
    }
}
