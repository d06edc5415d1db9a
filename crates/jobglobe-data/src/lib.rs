//! Static data for the jobglobe location pipeline.
//!
//! This crate owns everything that is loaded once and never mutated afterwards:
//! the supported regions, the per-region gazetteer tables (place aliases to postal
//! codes) and the employer dataset that stands in for a job-search backend.
//!
//! The embedded tables cover two regions (Kerala and Karnataka). Custom tables can be
//! loaded from JSON with [`GazetteerData::from_json_file`] and
//! [`Organizations::from_json_file`]; both are validated on load.
use std::path::Path;

use once_cell::sync::Lazy;
use tracing::{info, instrument};

mod embedded;
pub mod gazetteer;
pub mod organizations;
pub mod region;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DataError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Serialization error: {0}")]
        Serde(#[from] serde_json::Error),
        #[error("Alias '{alias}' in region '{region}' maps to both {first} and {second}")]
        ConflictingAlias {
            region: String,
            alias: String,
            first: String,
            second: String,
        },
        #[error("Postal code {postal_code} is claimed by both '{first}' and '{second}'")]
        PostalCodeInMultipleRegions {
            postal_code: String,
            first: String,
            second: String,
        },
        #[error("Invalid postal code '{0}', expected 6 digits")]
        InvalidPostalCode(String),
        #[error("Duplicate region id '{0}'")]
        DuplicateRegion(String),
        #[error("Organization '{organization}' references unknown region '{region}'")]
        UnknownRegion {
            organization: String,
            region: String,
        },
    }

    pub type Result<T> = std::result::Result<T, DataError>;
}

pub use error::{DataError, Result};
pub use gazetteer::{GazetteerData, PlaceRecord, RegionTable, is_postal_code, normalize_key};
pub use organizations::{OpenPosition, Organization, Organizations};
pub use region::{Coordinate, Region, RegionId};

/// Built-in gazetteer (Kerala and Karnataka).
pub static EMBEDDED_GAZETTEER: Lazy<GazetteerData> = Lazy::new(embedded::gazetteer);

/// Built-in employer dataset.
pub static EMBEDDED_ORGANIZATIONS: Lazy<Organizations> = Lazy::new(embedded::organizations);

/// Where the pipeline's static data comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DataSource {
    /// Tables compiled into the crate
    #[default]
    Embedded,
    /// JSON files on disk
    Files {
        gazetteer: std::path::PathBuf,
        organizations: Option<std::path::PathBuf>,
    },
}

/// Load the gazetteer and organization tables for a data source.
///
/// File-backed organizations are checked against the regions of the loaded gazetteer.
#[instrument(name = "Load static data", level = "info")]
pub fn load(source: &DataSource) -> Result<(GazetteerData, Organizations)> {
    match source {
        DataSource::Embedded => Ok((
            EMBEDDED_GAZETTEER.clone(),
            EMBEDDED_ORGANIZATIONS.clone(),
        )),
        DataSource::Files {
            gazetteer,
            organizations,
        } => {
            let gazetteer_data = GazetteerData::from_json_file(gazetteer)?;
            let orgs = match organizations {
                Some(path) => Organizations::from_json_file(path)?,
                None => Organizations::default(),
            };
            orgs.validate_regions(&gazetteer_data)?;
            info!(
                regions = gazetteer_data.regions.len(),
                organizations = orgs.len(),
                "Loaded static data from files"
            );
            Ok((gazetteer_data, orgs))
        }
    }
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path)?;
    let value = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(value)
}
