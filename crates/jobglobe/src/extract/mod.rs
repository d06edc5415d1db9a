//! Pull a place name or postal code out of a free-text job search.

use std::fmt;

use jobglobe_data::Region;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::gazetteer::{Gazetteer, LookupScope};

static POSTAL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{6})(?:[^0-9]|$)").expect("valid regex"));

static IN_PLACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bin\s+([a-z][a-z\s]*)").expect("valid regex"));

/// The region selection that accompanies a search.
///
/// `state` narrows lookups to one region; `place` narrows them further to one
/// canonical place inside that region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilter {
    pub country: String,
    pub state: Option<String>,
    pub place: Option<String>,
}

impl RegionFilter {
    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    /// Resolve the filter's names against the gazetteer.
    ///
    /// Returns `None` when the filter names a state the gazetteer does not know.
    pub fn scope<'g>(&self, gazetteer: &'g Gazetteer) -> Option<FilterScope<'g>> {
        let region = match self.state.as_deref().map(str::trim) {
            Some(state) if !state.is_empty() => Some(gazetteer.region_by_name(state)?),
            _ => None,
        };
        Some(FilterScope {
            country: self.country.trim().to_string(),
            region,
            place: region.and(self.place.as_deref().map(str::trim).filter(|p| !p.is_empty()))
                .map(ToString::to_string),
        })
    }
}

/// A [`RegionFilter`] bound to gazetteer regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterScope<'g> {
    pub country: String,
    pub region: Option<&'g Region>,
    pub place: Option<String>,
}

impl FilterScope<'_> {
    pub fn lookup_scope(&self) -> LookupScope<'_> {
        match (self.region, self.place.as_deref()) {
            (Some(region), Some(place)) => LookupScope::Place {
                region: &region.id,
                place,
            },
            (Some(region), None) => LookupScope::Region(&region.id),
            (None, _) => LookupScope::Country(&self.country),
        }
    }
}

/// Result of location extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtractedLocation {
    /// A six digit postal code found verbatim in the query
    PostalCode(String),
    /// A place name, canonical when the gazetteer recognised it
    Place(String),
    /// No location in the query
    NotFound,
}

impl ExtractedLocation {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::PostalCode(value) | Self::Place(value) => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl fmt::Display for ExtractedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("<none>"))
    }
}

/// A search as typed, with the region selection active when it was submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    pub text: String,
    pub filter: Option<RegionFilter>,
}

impl LocationQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: RegionFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Upper-case the first letter of every word, leaving the rest untouched.
pub fn capitalize_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The first six digit token of `query`, if any.
pub fn find_postal_code(query: &str) -> Option<&str> {
    POSTAL_CODE_RE
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract a best-effort location from a search query.
///
/// Rules, in priority order:
/// 1. a six digit token is returned as a postal code, whatever the filter says
/// 2. an "in <words>" phrase is looked up in the filter's scope; a hit returns the
///    canonical place, a miss (or no filter) returns the phrase as typed
/// 3. without such a phrase the whole query is looked up in the filter's scope
/// 4. otherwise nothing is found
#[instrument(level = "debug", skip(gazetteer))]
pub fn extract(
    gazetteer: &Gazetteer,
    query: &str,
    filter: Option<&RegionFilter>,
) -> ExtractedLocation {
    let query = query.trim();
    if query.is_empty() {
        return ExtractedLocation::NotFound;
    }

    if let Some(code) = find_postal_code(query) {
        debug!(code, "Postal code in query");
        return ExtractedLocation::PostalCode(code.to_string());
    }

    let scope = filter.and_then(|f| f.scope(gazetteer));

    if let Some(candidate) = IN_PLACE_RE
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|c| !c.is_empty())
    {
        let canonical = scope
            .as_ref()
            .and_then(|scope| gazetteer.lookup(candidate, scope.lookup_scope()));
        return match canonical {
            Some(hit) => {
                debug!(candidate, place = %hit.place, "Phrase resolved in gazetteer");
                ExtractedLocation::Place(capitalize_words(&hit.place))
            }
            None => {
                debug!(candidate, "Phrase kept as typed");
                ExtractedLocation::Place(candidate.to_string())
            }
        };
    }

    match scope.and_then(|scope| gazetteer.lookup(query, scope.lookup_scope())) {
        Some(hit) => {
            debug!(place = %hit.place, "Whole query resolved in gazetteer");
            ExtractedLocation::Place(capitalize_words(&hit.place))
        }
        None => ExtractedLocation::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kerala() -> RegionFilter {
        RegionFilter::country("India").with_state("Kerala")
    }

    fn karnataka() -> RegionFilter {
        RegionFilter::country("India").with_state("Karnataka")
    }

    #[test]
    fn test_phrase_without_filter_is_verbatim() {
        let gazetteer = Gazetteer::default();
        assert_eq!(
            extract(&gazetteer, "frontend developer in Kochi", None),
            ExtractedLocation::Place("Kochi".to_string())
        );
    }

    #[test]
    fn test_postal_code_short_circuits() {
        let gazetteer = Gazetteer::default();
        for filter in [None, Some(kerala()), Some(karnataka())] {
            assert_eq!(
                extract(&gazetteer, "690001", filter.as_ref()),
                ExtractedLocation::PostalCode("690001".to_string())
            );
            assert_eq!(
                extract(&gazetteer, "react jobs in Kochi near 560001 please", filter.as_ref()),
                ExtractedLocation::PostalCode("560001".to_string())
            );
        }
    }

    #[test]
    fn test_longer_digit_runs_are_not_postal_codes() {
        assert_eq!(find_postal_code("call 9876543210"), None);
        assert_eq!(find_postal_code("pin:682001."), Some("682001"));
    }

    #[test]
    fn test_whole_query_alias_with_filter() {
        let gazetteer = Gazetteer::default();
        assert_eq!(
            extract(&gazetteer, "ernakulam", Some(&kerala())),
            ExtractedLocation::Place("Ekm".to_string())
        );
        assert_eq!(
            extract(&gazetteer, "bengaluru", Some(&karnataka())),
            ExtractedLocation::Place("Bengaluru".to_string())
        );
    }

    #[test]
    fn test_phrase_resolved_against_filter_region() {
        let gazetteer = Gazetteer::default();
        assert_eq!(
            extract(&gazetteer, "data analyst in calicut", Some(&kerala())),
            ExtractedLocation::Place("Kozhikode".to_string())
        );
        // Belongs to the other region: kept as typed, not resolved across the filter.
        assert_eq!(
            extract(&gazetteer, "data analyst in mysore", Some(&kerala())),
            ExtractedLocation::Place("mysore".to_string())
        );
    }

    #[test]
    fn test_country_only_filter_searches_every_region() {
        let gazetteer = Gazetteer::default();
        assert_eq!(
            extract(&gazetteer, "java developer in mangalore", Some(&RegionFilter::country("India"))),
            ExtractedLocation::Place("Mangaluru".to_string())
        );
    }

    #[test]
    fn test_no_location_without_filter() {
        let gazetteer = Gazetteer::default();
        assert_eq!(
            extract(&gazetteer, "bengaluru", None),
            ExtractedLocation::NotFound
        );
        assert_eq!(extract(&gazetteer, "   ", Some(&kerala())), ExtractedLocation::NotFound);
        assert_eq!(
            extract(&gazetteer, "senior rust engineer", Some(&kerala())),
            ExtractedLocation::NotFound
        );
    }

    #[test]
    fn test_in_phrase_false_positive_is_kept() {
        let gazetteer = Gazetteer::default();
        assert_eq!(
            extract(&gazetteer, "Engineer in Training roles", None),
            ExtractedLocation::Place("Training roles".to_string())
        );
    }

    #[test]
    fn test_in_must_start_a_word() {
        let gazetteer = Gazetteer::default();
        assert_eq!(extract(&gazetteer, "Admin Kochi", None), ExtractedLocation::NotFound);
        assert_eq!(
            extract(&gazetteer, "Admin in Kochi", None),
            ExtractedLocation::Place("Kochi".to_string())
        );
    }

    #[test]
    fn test_unknown_state_disables_lookup() {
        let gazetteer = Gazetteer::default();
        let goa = RegionFilter::country("India").with_state("Goa");
        assert!(goa.scope(&gazetteer).is_none());
        assert_eq!(extract(&gazetteer, "panaji", Some(&goa)), ExtractedLocation::NotFound);
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("ekm"), "Ekm");
        assert_eq!(capitalize_words(" new  delhi "), "New Delhi");
        assert_eq!(capitalize_words(""), "");
    }
}
