//! jobglobe - location resolution and map presentation for job search
//!
//! jobglobe turns a free-text job search such as `"frontend developer in ernakulam"`
//! into a place or postal code, resolves it against a per-region gazetteer and drives
//! a map widget through a short camera journey to the employers at that location.
//!
//! # Quick Start
//!
//! ```rust
//! use jobglobe::{ExtractedLocation, LocationPipeline, LocationQuery, RegionFilter};
//!
//! let pipeline = LocationPipeline::new_embedded();
//!
//! // A six digit PIN code is taken verbatim, whatever the filter says
//! let query = LocationQuery::new("react jobs near 690001");
//! assert_eq!(
//!     pipeline.extract(&query),
//!     ExtractedLocation::PostalCode("690001".to_string())
//! );
//!
//! // Aliases resolve to canonical places inside the filtered region
//! let query = LocationQuery::new("bangalore")
//!     .with_filter(RegionFilter::country("India").with_state("Karnataka"));
//! let resolution = pipeline.resolve(&query);
//! assert_eq!(resolution.postal.unwrap().postal_code, "560001");
//! ```
//!
//! # Pipeline
//!
//! - **Gazetteer**: alias to canonical place and postal code, with deterministic
//!   match precedence (exact, whole-word, substring, optional fuzzy)
//! - **Extractor**: pulls a postal code or place phrase out of the query
//! - **Resolver**: postal code for a location, never outside the filtered region
//! - **Journey**: region overview then place detail, or a direct jump by specificity
//! - **Presenter**: geocodes camera targets, fits bounds, clusters and staggers markers
//!
//! # Data
//!
//! Gazetteer tables for Kerala and Karnataka and a small employer dataset are embedded
//! in `jobglobe-data`. Custom tables can be loaded from JSON through [`DataSource`].
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, filter::Directive, fmt::format::FmtSpan};

mod config;
mod core;
pub mod error;
mod extract;
mod gazetteer;
mod geocode;
mod journey;
mod listing;
pub mod presenter;
mod resolve;

pub use crate::core::{LocationPipeline, QueryResolution};
pub use config::{
    GEOCODER_URL_ENV, GeocoderSettings, MAX_ZOOM, PresenterConfigBuilder, USER_AGENT_ENV,
};
pub use extract::{
    ExtractedLocation, FilterScope, LocationQuery, RegionFilter, capitalize_words, extract,
    find_postal_code,
};
pub use gazetteer::{Gazetteer, GazetteerHit, LookupScope, MatchConfig, MatchTier};
pub use geocode::{GazetteerGeocoder, GeocodeError, Geocoder, NominatimGeocoder};
pub use jobglobe_data as data;
pub use jobglobe_data::{Coordinate, DataSource, Region, RegionId};
pub use journey::{
    CameraStep, CameraTarget, JourneyConfig, JourneyError, JourneyPhase, JourneyPlan,
    JourneyState, LocationTarget, plan_journey,
};
pub use listing::{ListingRow, filter_listings, matching_organizations};
pub use presenter::{
    GeocodeFailure, MapPresenter, MapSessionState, MapStatus, MapWidget, PresenterConfig,
    RecordingWidget,
};
pub use resolve::{PostalResolution, resolve_postal};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for jobglobe.
///
/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG` when set, otherwise by
/// `level`. HTTP client internals are capped at `warn`. Later calls are no-ops.
///
/// ```rust
/// use jobglobe::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), jobglobe::error::JobGlobeError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::JobGlobeError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse::<Directive>()?)
            .add_directive("reqwest=warn".parse::<Directive>()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
