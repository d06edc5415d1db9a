use std::sync::Arc;

use jobglobe_data::{Coordinate, is_postal_code};
use tracing::{debug, instrument};

use super::{GeocodeError, Geocoder};
use crate::gazetteer::{Gazetteer, LookupScope, MatchTier};

/// Offline geocoder answering from gazetteer centroids.
///
/// The comma separated parts of a query are tried most specific first: a postal
/// code, a region, a place (exact or whole-word matches only), then a known country.
#[derive(Debug, Clone)]
pub struct GazetteerGeocoder {
    gazetteer: Arc<Gazetteer>,
    countries: Vec<(String, Coordinate)>,
}

impl GazetteerGeocoder {
    pub fn new(gazetteer: Arc<Gazetteer>) -> Self {
        Self {
            gazetteer,
            countries: vec![("india".to_string(), Coordinate::new(22.3511, 78.6677))],
        }
    }

    pub fn with_country(mut self, name: &str, centroid: Coordinate) -> Self {
        self.countries.push((name.trim().to_lowercase(), centroid));
        self
    }

    fn locate(&self, part: &str) -> Option<Coordinate> {
        if is_postal_code(part) {
            return self.gazetteer.lookup_postal(part).map(|hit| hit.centroid);
        }
        if let Some(region) = self.gazetteer.region_by_name(part) {
            return self.gazetteer.region_centroid(&region.id);
        }
        if let Some(hit) = self
            .gazetteer
            .lookup(part, LookupScope::All)
            .filter(|hit| hit.tier <= MatchTier::Token)
        {
            return Some(hit.centroid);
        }
        self.countries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(part))
            .map(|(_, centroid)| *centroid)
    }
}

impl Geocoder for GazetteerGeocoder {
    #[instrument(name = "Gazetteer geocode", level = "debug", skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let found = query
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .find_map(|part| self.locate(part));
        debug!(?found, "Gazetteer geocode result");
        Ok(found)
    }
}
