//! Alias lookup over the static gazetteer tables.
//!
//! Lookups are case-insensitive and ignore surrounding whitespace. A query is tried
//! against each tier in turn and the first tier with a hit wins:
//!
//! 1. **Exact**: the normalized query equals an alias.
//! 2. **Token**: all words of the alias appear as whole words in the query, or the other
//!    way around.
//! 3. **Overlap**: the query and the alias share at least one whole word of
//!    `min_substring_len` or more characters.
//! 4. **Substring**: the query contains the alias or the alias contains the query.
//! 5. **Fuzzy**: normalized Levenshtein similarity above a threshold (off by default).
//!
//! Inside a tier, table order breaks ties. Since tiers are tried strictly in order, the
//! outcome does not depend on where an exact alias sits in the table.

use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use jobglobe_data::{Coordinate, GazetteerData, PlaceRecord, Region, RegionId, normalize_key};
use tracing::{debug, instrument, trace};

/// Which part of the gazetteer a lookup may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupScope<'a> {
    /// Every region
    All,
    /// Every region of a country
    Country(&'a str),
    /// A single region
    Region(&'a RegionId),
    /// A single place within a region, matched by any of its spellings
    Place {
        region: &'a RegionId,
        place: &'a str,
    },
}

/// How a query matched a gazetteer entry. Lower is stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Exact,
    Token,
    Overlap,
    Substring,
    Fuzzy,
}

/// A resolved gazetteer entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GazetteerHit {
    pub place: String,
    pub postal_code: String,
    pub region: Region,
    pub centroid: Coordinate,
    pub tier: MatchTier,
}

/// Tunables for the looser match tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Shortest word allowed to take part in an overlap match, and shortest string
    /// allowed to take part in a substring match
    pub min_substring_len: usize,
    /// Minimum normalized similarity for the fuzzy tier; `None` disables it
    pub fuzzy_threshold: Option<f64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_substring_len: 3,
            fuzzy_threshold: None,
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedEntry {
    region_idx: usize,
    record_idx: usize,
    keys: Vec<String>,
    key_tokens: Vec<HashSet<String>>,
}

/// In-memory gazetteer with precomputed lookup keys.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    data: GazetteerData,
    entries: Vec<IndexedEntry>,
    exact: HashMap<String, Vec<usize>>,
    postal: HashMap<String, usize>,
    config: MatchConfig,
}

fn tokens(value: &str) -> HashSet<String> {
    value.split(' ').map(ToString::to_string).collect()
}

impl Gazetteer {
    #[instrument(name = "Build gazetteer", level = "debug", skip_all)]
    pub fn new(data: GazetteerData) -> Self {
        Self::with_config(data, MatchConfig::default())
    }

    pub fn with_config(data: GazetteerData, config: MatchConfig) -> Self {
        let mut entries = Vec::new();
        let mut exact: HashMap<String, Vec<usize>> = HashMap::new();
        let mut postal: HashMap<String, usize> = HashMap::new();

        for (region_idx, table) in data.regions.iter().enumerate() {
            for (record_idx, record) in table.places.iter().enumerate() {
                let entry_idx = entries.len();
                let keys: Vec<String> = record.keys().collect();
                for key in &keys {
                    exact.entry(key.clone()).or_default().push(entry_idx);
                }
                postal.entry(record.postal_code.clone()).or_insert(entry_idx);
                entries.push(IndexedEntry {
                    region_idx,
                    record_idx,
                    key_tokens: keys.iter().map(|k| tokens(k)).collect(),
                    keys,
                });
            }
        }
        debug!(
            entries = entries.len(),
            keys = exact.len(),
            "Gazetteer index built"
        );

        Self {
            data,
            entries,
            exact,
            postal,
            config,
        }
    }

    pub fn data(&self) -> &GazetteerData {
        &self.data
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.data.regions.iter().map(|table| &table.region)
    }

    /// Find a region by id or display name, ignoring case.
    pub fn region_by_name(&self, name: &str) -> Option<&Region> {
        self.regions().find(|region| region.matches_name(name))
    }

    pub fn region_centroid(&self, id: &RegionId) -> Option<Coordinate> {
        self.data.region(id).map(|table| table.centroid)
    }

    fn record(&self, entry: &IndexedEntry) -> (&Region, &PlaceRecord) {
        let table = &self.data.regions[entry.region_idx];
        (&table.region, &table.places[entry.record_idx])
    }

    fn hit(&self, entry_idx: usize, tier: MatchTier) -> GazetteerHit {
        let (region, record) = self.record(&self.entries[entry_idx]);
        GazetteerHit {
            place: record.place.clone(),
            postal_code: record.postal_code.clone(),
            region: region.clone(),
            centroid: record.centroid,
            tier,
        }
    }

    fn in_scope(&self, entry: &IndexedEntry, scope: LookupScope<'_>) -> bool {
        let region = &self.data.regions[entry.region_idx].region;
        match scope {
            LookupScope::All => true,
            LookupScope::Country(country) => region.in_country(country),
            LookupScope::Region(id) => &region.id == id,
            LookupScope::Place { region: id, place } => {
                let place = normalize_key(place);
                &region.id == id && entry.keys.contains(&place)
            }
        }
    }

    fn scoped(&self, scope: LookupScope<'_>) -> impl Iterator<Item = (usize, &IndexedEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| self.in_scope(entry, scope))
    }

    /// Resolve a typed place name to its canonical entry.
    #[instrument(level = "debug", skip(self))]
    pub fn lookup(&self, alias: &str, scope: LookupScope<'_>) -> Option<GazetteerHit> {
        let query = normalize_key(alias);
        if query.is_empty() {
            return None;
        }

        if let Some(idx) = self.exact.get(&query).and_then(|candidates| {
            candidates
                .iter()
                .copied()
                .find(|idx| self.in_scope(&self.entries[*idx], scope))
        }) {
            trace!(idx, "Exact alias match");
            return Some(self.hit(idx, MatchTier::Exact));
        }

        let query_tokens = tokens(&query);
        if let Some((idx, _)) = self.scoped(scope).find(|(_, entry)| {
            entry
                .key_tokens
                .iter()
                .any(|key| key.is_subset(&query_tokens) || query_tokens.is_subset(key))
        }) {
            trace!(idx, "Token match");
            return Some(self.hit(idx, MatchTier::Token));
        }

        let min_len = self.config.min_substring_len;
        if let Some((idx, _)) = self.scoped(scope).find(|(_, entry)| {
            entry.key_tokens.iter().any(|key| {
                key.intersection(&query_tokens)
                    .any(|token| token.chars().count() >= min_len)
            })
        }) {
            trace!(idx, "Token overlap match");
            return Some(self.hit(idx, MatchTier::Overlap));
        }

        if let Some((idx, _)) = self.scoped(scope).find(|(_, entry)| {
            entry.keys.iter().any(|key| {
                (key.len() >= min_len && query.contains(key.as_str()))
                    || (query.len() >= min_len && key.contains(query.as_str()))
            })
        }) {
            trace!(idx, "Substring match");
            return Some(self.hit(idx, MatchTier::Substring));
        }

        let threshold = self.config.fuzzy_threshold?;
        self.fuzzy_match(&query, scope, threshold)
            .map(|idx| self.hit(idx, MatchTier::Fuzzy))
    }

    fn fuzzy_match(&self, query: &str, scope: LookupScope<'_>, threshold: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, entry) in self.scoped(scope) {
            for key in &entry.keys {
                let similarity =
                    rapidfuzz::distance::levenshtein::normalized_similarity(query.chars(), key.chars());
                if similarity >= threshold && best.is_none_or(|(_, s)| similarity > s) {
                    best = Some((idx, similarity));
                }
            }
        }
        if let Some((idx, similarity)) = best {
            trace!(idx, similarity, "Fuzzy match");
        }
        best.map(|(idx, _)| idx)
    }

    /// Reverse lookup: the entry owning a postal code, in any region.
    pub fn lookup_postal(&self, postal_code: &str) -> Option<GazetteerHit> {
        self.postal
            .get(postal_code.trim())
            .map(|idx| self.hit(*idx, MatchTier::Exact))
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new(jobglobe_data::EMBEDDED_GAZETTEER.clone())
    }
}
