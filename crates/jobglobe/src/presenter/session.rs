use std::fmt;

use crate::{
    extract::ExtractedLocation,
    journey::{JourneyPlan, JourneyState, LocationTarget},
};

use super::{
    clustering::Cluster,
    markers::{Application, DetailDrawer, MapMarkerSet},
    viewport::Viewport,
};

/// Why geocoding a camera target produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeFailure {
    /// Network, HTTP or parse failure
    Service(String),
    /// The service answered with no results
    NoMatch,
    /// No answer within the safety timeout
    TimedOut,
}

impl fmt::Display for GeocodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(reason) => write!(f, "geocoding service failed ({reason})"),
            Self::NoMatch => f.write_str("no matching place"),
            Self::TimedOut => f.write_str("geocoding timed out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapStatus {
    /// Nothing submitted yet
    #[default]
    Idle,
    Loading,
    /// A search was made but carried no location
    EmptyPrompt,
    /// Journey finished and markers placed
    Ready,
    /// Journey finished but no organization sits at the location
    NoResults,
    GeocodeFailed(GeocodeFailure),
}

impl MapStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Loading)
    }
}

/// Everything one map view knows about the current search.
///
/// Owned by the presenter and published whole on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSessionState {
    /// Bumped on every submitted search; stale session tasks compare against it
    pub generation: u64,
    pub query: String,
    pub extracted: Option<ExtractedLocation>,
    pub target: Option<LocationTarget>,
    pub plan: Option<JourneyPlan>,
    pub journey: JourneyState,
    pub status: MapStatus,
    pub markers: MapMarkerSet,
    pub clusters: Vec<Cluster>,
    pub viewport: Option<Viewport>,
    pub selected: Option<DetailDrawer>,
    pub applications: Vec<Application>,
    pub has_searched: bool,
}

impl MapSessionState {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Reset per-search fields for a new query, keeping submitted applications.
    pub(crate) fn begin(&mut self, generation: u64, query: &str) {
        let applications = std::mem::take(&mut self.applications);
        *self = Self {
            generation,
            query: query.to_string(),
            has_searched: true,
            applications,
            ..Self::default()
        };
    }
}
