//! Organizations at a resolved location, for the map markers and the list view.

use jobglobe_data::{Organization, RegionId, normalize_key};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    extract::ExtractedLocation,
    gazetteer::{Gazetteer, LookupScope, MatchTier},
    resolve::PostalResolution,
};

/// How a search location pins down organizations.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlaceMatcher {
    /// Canonical place inside a region
    Canonical { region: RegionId, place: String },
    /// Free text, compared against place names and address words
    Text(String),
}

impl PlaceMatcher {
    fn new(
        gazetteer: &Gazetteer,
        extracted: &ExtractedLocation,
        postal: Option<&PostalResolution>,
        region: Option<&RegionId>,
    ) -> Option<Self> {
        if let Some(resolved) = postal {
            return Some(Self::Canonical {
                region: resolved.region.id.clone(),
                place: resolved.place.clone(),
            });
        }
        match extracted {
            ExtractedLocation::NotFound => None,
            ExtractedLocation::PostalCode(code) => {
                // Unresolved codes still match when the owning region is not excluded.
                let hit = gazetteer.lookup_postal(code)?;
                region
                    .is_none_or(|id| *id == hit.region.id)
                    .then(|| Self::Canonical {
                        region: hit.region.id,
                        place: hit.place,
                    })
            }
            ExtractedLocation::Place(text) => {
                let scope = region.map_or(LookupScope::All, LookupScope::Region);
                match gazetteer
                    .lookup(text, scope)
                    .filter(|hit| hit.tier <= MatchTier::Token)
                {
                    Some(hit) => Some(Self::Canonical {
                        region: hit.region.id,
                        place: hit.place,
                    }),
                    None => Some(Self::Text(normalize_key(text))),
                }
            }
        }
    }

    fn matches(&self, org: &Organization, region: Option<&RegionId>) -> bool {
        if region.is_some_and(|id| *id != org.region) {
            return false;
        }
        match self {
            Self::Canonical { region, place } => {
                org.region == *region && org.place.eq_ignore_ascii_case(place)
            }
            Self::Text(text) => {
                normalize_key(&org.place) == *text
                    || org.address.split(',').any(|part| {
                        let part = normalize_key(part);
                        part == *text || part.split(' ').any(|word| word == text)
                    })
            }
        }
    }
}

/// Organizations located at the search location, in dataset order.
///
/// `region` restricts matches to one region when the search was filtered to it.
#[instrument(level = "debug", skip(gazetteer, organizations, postal))]
pub fn matching_organizations<'o>(
    gazetteer: &Gazetteer,
    organizations: &'o [Organization],
    extracted: &ExtractedLocation,
    postal: Option<&PostalResolution>,
    region: Option<&RegionId>,
) -> Vec<&'o Organization> {
    let Some(matcher) = PlaceMatcher::new(gazetteer, extracted, postal, region) else {
        return Vec::new();
    };
    let found: Vec<_> = organizations
        .iter()
        .filter(|org| matcher.matches(org, region))
        .collect();
    debug!(?matcher, found = found.len(), "Organizations matched");
    found
}

/// One row of the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub organization: String,
    pub address: String,
    pub place: String,
    pub open_positions: usize,
    pub titles: Vec<String>,
}

impl From<&Organization> for ListingRow {
    fn from(org: &Organization) -> Self {
        Self {
            organization: org.name.clone(),
            address: org.address.clone(),
            place: org.place.clone(),
            open_positions: org.positions.len(),
            titles: org.positions.iter().map(|p| p.title.clone()).collect(),
        }
    }
}

/// List-view rows for the organizations at a search location.
pub fn filter_listings(
    gazetteer: &Gazetteer,
    organizations: &[Organization],
    extracted: &ExtractedLocation,
    postal: Option<&PostalResolution>,
    region: Option<&RegionId>,
) -> Vec<ListingRow> {
    matching_organizations(gazetteer, organizations, extracted, postal, region)
        .into_iter()
        .map(ListingRow::from)
        .collect()
}
