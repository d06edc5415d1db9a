//! The synchronous half of the location pipeline.
//!
//! [`LocationPipeline`] bundles the gazetteer and the organization dataset and runs the
//! pure steps of a search: extraction, postal resolution, journey planning and the
//! lookup of organizations at the resolved location. The map presenter drives the
//! asynchronous half on top of it.
//!
//! ```rust
//! use jobglobe::{LocationPipeline, LocationQuery, RegionFilter};
//!
//! let pipeline = LocationPipeline::new_embedded();
//! let query = LocationQuery::new("ernakulam")
//!     .with_filter(RegionFilter::country("India").with_state("Kerala"));
//!
//! let resolution = pipeline.resolve(&query);
//! assert_eq!(resolution.extracted.as_str(), Some("Ekm"));
//! assert_eq!(resolution.postal.unwrap().postal_code, "682001");
//! ```

use std::sync::Arc;

use jobglobe_data::{DataSource, Organizations, Region};
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    error::JobGlobeError,
    extract::{ExtractedLocation, LocationQuery, extract},
    gazetteer::{Gazetteer, MatchConfig},
    journey::{JourneyConfig, JourneyPlan, LocationTarget, plan_journey},
    listing::{ListingRow, filter_listings, matching_organizations},
    presenter::MapMarkerSet,
    resolve::{PostalResolution, resolve_postal},
};

/// Everything the pure pipeline learns from one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResolution {
    pub query: LocationQuery,
    pub extracted: ExtractedLocation,
    pub postal: Option<PostalResolution>,
    /// The filter's region, when it named one the gazetteer knows
    pub region: Option<Region>,
    pub target: LocationTarget,
}

impl QueryResolution {
    pub fn plan(&self, config: &JourneyConfig) -> JourneyPlan {
        plan_journey(&self.target, config)
    }
}

#[derive(Debug, Clone)]
pub struct LocationPipeline {
    gazetteer: Arc<Gazetteer>,
    organizations: Arc<Organizations>,
}

impl LocationPipeline {
    #[instrument(name = "Create LocationPipeline with Embedded Data", level = "info")]
    pub fn new_embedded() -> Self {
        let t_init = std::time::Instant::now();
        let pipeline = Self::from_parts(
            Gazetteer::default(),
            jobglobe_data::EMBEDDED_ORGANIZATIONS.clone(),
        );
        info!(elapsed = ?t_init.elapsed(), "LocationPipeline initialized");
        pipeline
    }

    /// Load the tables from `source` and index them.
    #[instrument(name = "Create LocationPipeline", level = "info")]
    pub fn from_source(source: &DataSource) -> Result<Self, JobGlobeError> {
        let (gazetteer, organizations) = jobglobe_data::load(source)?;
        Ok(Self::from_parts(Gazetteer::new(gazetteer), organizations))
    }

    pub fn from_parts(gazetteer: Gazetteer, organizations: Organizations) -> Self {
        Self {
            gazetteer: Arc::new(gazetteer),
            organizations: Arc::new(organizations),
        }
    }

    /// Rebuild the gazetteer index with different matching rules.
    pub fn with_match_config(self, config: MatchConfig) -> Self {
        let data = self.gazetteer.data().clone();
        Self {
            gazetteer: Arc::new(Gazetteer::with_config(data, config)),
            ..self
        }
    }

    pub fn gazetteer(&self) -> &Arc<Gazetteer> {
        &self.gazetteer
    }

    pub fn organizations(&self) -> &Organizations {
        &self.organizations
    }

    pub fn extract(&self, query: &LocationQuery) -> ExtractedLocation {
        extract(&self.gazetteer, &query.text, query.filter.as_ref())
    }

    pub fn resolve_postal(
        &self,
        location: Option<&str>,
        query: &LocationQuery,
    ) -> Option<PostalResolution> {
        resolve_postal(&self.gazetteer, location, query.filter.as_ref())
    }

    /// Extract, resolve and target a query.
    #[instrument(name = "Resolve query", level = "debug", skip(self))]
    pub fn resolve(&self, query: &LocationQuery) -> QueryResolution {
        let extracted = self.extract(query);
        let postal = self.resolve_postal(extracted.as_str(), query);
        let region = query
            .filter
            .as_ref()
            .and_then(|filter| filter.scope(&self.gazetteer))
            .and_then(|scope| scope.region.cloned());
        let country = query.filter.as_ref().map(|filter| filter.country.as_str());
        // A state outside the gazetteer still names the camera target.
        let region_name = region.as_ref().map(|r| r.name.as_str()).or_else(|| {
            query
                .filter
                .as_ref()
                .and_then(|filter| filter.state.as_deref())
                .map(str::trim)
        });

        let target = if extracted.is_found() {
            LocationTarget::new(country, region_name, &extracted, postal.as_ref())
        } else {
            LocationTarget::default()
        };

        QueryResolution {
            query: query.clone(),
            extracted,
            postal,
            region,
            target,
        }
    }

    pub fn plan_journey(&self, query: &LocationQuery, config: &JourneyConfig) -> JourneyPlan {
        self.resolve(query).plan(config)
    }

    pub fn markers_for(&self, resolution: &QueryResolution) -> MapMarkerSet {
        MapMarkerSet::from_organizations(matching_organizations(
            &self.gazetteer,
            &self.organizations,
            &resolution.extracted,
            resolution.postal.as_ref(),
            resolution.region.as_ref().map(|r| &r.id),
        ))
    }

    pub fn listings_for(&self, resolution: &QueryResolution) -> Vec<ListingRow> {
        filter_listings(
            &self.gazetteer,
            &self.organizations,
            &resolution.extracted,
            resolution.postal.as_ref(),
            resolution.region.as_ref().map(|r| &r.id),
        )
    }

    /// Resolve many queries in parallel, preserving input order.
    #[instrument(name = "Resolve bulk", level = "info", skip_all, fields(queries = queries.len()))]
    pub fn resolve_bulk(&self, queries: &[LocationQuery]) -> Vec<QueryResolution> {
        queries.par_iter().map(|query| self.resolve(query)).collect()
    }
}

impl Default for LocationPipeline {
    fn default() -> Self {
        Self::new_embedded()
    }
}
