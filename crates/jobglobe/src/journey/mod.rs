//! Camera journey: region overview, then place detail.
//!
//! When a search carries both a region filter and a place that resolved to a postal
//! code, the map is walked in two timed steps. Any other search jumps straight to the
//! most specific view it can describe, with a zoom picked from a fixed table.

use std::{fmt, time::Duration};

use itertools::Itertools;
use jobglobe_data::Coordinate;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{extract::ExtractedLocation, resolve::PostalResolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum JourneyPhase {
    #[default]
    Initial,
    RegionOverview,
    PlaceDetail,
}

/// A geocodable description of where the camera should go.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraTarget {
    pub query: String,
    pub zoom: u8,
}

impl fmt::Display for CameraTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ z{}", self.query, self.zoom)
    }
}

/// One scheduled camera move, relative to the moment the search was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraStep {
    pub phase: JourneyPhase,
    pub at: Duration,
    pub target: CameraTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyPlan {
    /// Nothing to show
    Empty,
    /// Jump straight to the only view the search can describe
    Direct(CameraStep),
    /// Region overview first, then the place itself
    TwoStep {
        overview: CameraStep,
        detail: CameraStep,
    },
}

impl JourneyPlan {
    pub fn steps(&self) -> Vec<&CameraStep> {
        match self {
            Self::Empty => Vec::new(),
            Self::Direct(step) => vec![step],
            Self::TwoStep { overview, detail } => vec![overview, detail],
        }
    }

    /// The camera target the journey ends on.
    pub fn final_target(&self) -> Option<&CameraTarget> {
        self.steps().last().map(|step| &step.target)
    }
}

/// Timing and zoom table for journeys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyConfig {
    /// Delay from submission to the region overview
    pub overview_delay: Duration,
    /// Delay from the region overview to the place detail
    pub detail_delay: Duration,
    pub overview_zoom: u8,
    pub detail_zoom: u8,
    pub country_zoom: u8,
    pub region_zoom: u8,
    /// Zoom for a place when one, two or three of {place, region, country} are known
    pub place_zooms: [u8; 3],
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            overview_delay: Duration::from_millis(1500),
            detail_delay: Duration::from_millis(2000),
            overview_zoom: 8,
            detail_zoom: 14,
            country_zoom: 6,
            region_zoom: 8,
            place_zooms: [11, 12, 13],
        }
    }
}

/// Everything known about where a search points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationTarget {
    pub country: Option<String>,
    pub region: Option<String>,
    pub place: Option<String>,
    pub postal_code: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl LocationTarget {
    /// Combine the filter, the extracted location and its postal resolution.
    ///
    /// The resolution wins over the raw extracted text when present.
    pub fn new(
        country: Option<&str>,
        region: Option<&str>,
        extracted: &ExtractedLocation,
        resolution: Option<&PostalResolution>,
    ) -> Self {
        match resolution {
            Some(resolved) => Self {
                country: country
                    .and_then(non_empty)
                    .or_else(|| Some(resolved.region.country.clone())),
                region: Some(resolved.region.name.clone()),
                place: Some(resolved.place.clone()),
                postal_code: Some(resolved.postal_code.clone()),
            },
            None => Self {
                country: country.and_then(non_empty),
                region: region.and_then(non_empty),
                place: extracted.as_str().and_then(non_empty),
                postal_code: None,
            },
        }
    }

    fn join<'a>(parts: impl IntoIterator<Item = Option<&'a String>>) -> String {
        parts.into_iter().flatten().join(", ")
    }

    fn known(&self) -> usize {
        [&self.place, &self.region, &self.country]
            .into_iter()
            .filter(|part| part.is_some())
            .count()
    }
}

/// Decide the camera steps for a location.
#[instrument(level = "debug", skip(config))]
pub fn plan_journey(target: &LocationTarget, config: &JourneyConfig) -> JourneyPlan {
    let plan = match (&target.place, &target.region, &target.postal_code) {
        (Some(_), Some(region), Some(_)) => JourneyPlan::TwoStep {
            overview: CameraStep {
                phase: JourneyPhase::RegionOverview,
                at: config.overview_delay,
                target: CameraTarget {
                    query: LocationTarget::join([Some(region), target.country.as_ref()]),
                    zoom: config.overview_zoom,
                },
            },
            detail: CameraStep {
                phase: JourneyPhase::PlaceDetail,
                at: config.overview_delay + config.detail_delay,
                target: CameraTarget {
                    query: LocationTarget::join([
                        target.postal_code.as_ref(),
                        target.place.as_ref(),
                        Some(region),
                        target.country.as_ref(),
                    ]),
                    zoom: config.detail_zoom,
                },
            },
        },
        (Some(place), region, _) => JourneyPlan::Direct(CameraStep {
            phase: JourneyPhase::PlaceDetail,
            at: Duration::ZERO,
            target: CameraTarget {
                query: LocationTarget::join([
                    Some(place),
                    region.as_ref(),
                    target.country.as_ref(),
                ]),
                zoom: config.place_zooms[target.known().clamp(1, 3) - 1],
            },
        }),
        (None, Some(region), _) => JourneyPlan::Direct(CameraStep {
            phase: JourneyPhase::RegionOverview,
            at: Duration::ZERO,
            target: CameraTarget {
                query: LocationTarget::join([Some(region), target.country.as_ref()]),
                zoom: config.region_zoom,
            },
        }),
        (None, None, _) => match &target.country {
            Some(country) => JourneyPlan::Direct(CameraStep {
                phase: JourneyPhase::RegionOverview,
                at: Duration::ZERO,
                target: CameraTarget {
                    query: country.clone(),
                    zoom: config.country_zoom,
                },
            }),
            None => JourneyPlan::Empty,
        },
    };
    debug!(?plan, "Journey planned");
    plan
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JourneyError {
    #[error("Journey cannot move back from {from:?} to {to:?}")]
    Regression { from: JourneyPhase, to: JourneyPhase },
}

/// Where the journey currently is, and what the camera shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyState {
    pub phase: JourneyPhase,
    pub camera: Option<CameraTarget>,
    pub center: Option<Coordinate>,
}

impl JourneyState {
    /// Move to a step's phase. Moving backwards is refused; only [`Self::reset`]
    /// returns to `Initial`.
    pub fn advance(
        &mut self,
        step: &CameraStep,
        center: Option<Coordinate>,
    ) -> Result<(), JourneyError> {
        if step.phase < self.phase {
            return Err(JourneyError::Regression {
                from: self.phase,
                to: step.phase,
            });
        }
        self.phase = step.phase;
        self.camera = Some(step.target.clone());
        self.center = center;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_complete(&self) -> bool {
        self.phase == JourneyPhase::PlaceDetail
    }
}
