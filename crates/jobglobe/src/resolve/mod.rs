//! Region-aware postal code resolution for an extracted location.

use jobglobe_data::{Coordinate, Region, is_postal_code};
use tracing::{debug, instrument};

use crate::{extract::RegionFilter, gazetteer::Gazetteer};

/// The canonical postal code and owning region of a location.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalResolution {
    pub postal_code: String,
    pub place: String,
    pub region: Region,
    pub centroid: Coordinate,
}

/// Resolve a location string to a postal code under a region filter.
///
/// A region context is required: with no filter, or a filter naming an unknown
/// state, nothing resolves. A postal code that belongs to a region other than the
/// one the filter pins resolves to `None`; there is no cross-region fallback.
#[instrument(level = "debug", skip(gazetteer))]
pub fn resolve_postal(
    gazetteer: &Gazetteer,
    location: Option<&str>,
    filter: Option<&RegionFilter>,
) -> Option<PostalResolution> {
    let location = location.map(str::trim).filter(|l| !l.is_empty())?;
    let scope = filter?.scope(gazetteer)?;

    let hit = if is_postal_code(location) {
        let hit = gazetteer.lookup_postal(location)?;
        let allowed = match scope.region {
            Some(region) => region.id == hit.region.id,
            None => hit.region.in_country(&scope.country),
        };
        if !allowed {
            debug!(
                postal_code = location,
                owner = %hit.region.id,
                "Postal code belongs to a region outside the filter"
            );
            return None;
        }
        hit
    } else {
        gazetteer.lookup(location, scope.lookup_scope())?
    };

    Some(PostalResolution {
        postal_code: hit.postal_code,
        place: hit.place,
        region: hit.region,
        centroid: hit.centroid,
    })
}
