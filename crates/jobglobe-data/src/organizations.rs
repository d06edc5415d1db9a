//! Employer dataset standing in for a job-search backend.

use std::{ops::Deref, path::Path};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{Coordinate, DataError, GazetteerData, RegionId, Result, read_json};

/// One open role at an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub title: String,
    /// Full-time, Contract, Internship...
    pub kind: String,
    pub experience: String,
    pub salary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub address: String,
    /// Canonical gazetteer place this organization sits in.
    pub place: String,
    pub region: RegionId,
    pub coordinate: Coordinate,
    pub logo: String,
    #[serde(default)]
    pub positions: Vec<OpenPosition>,
}

impl Organization {
    pub fn open_positions(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Organizations(Vec<Organization>);

impl Organizations {
    pub fn new(organizations: Vec<Organization>) -> Self {
        Self(organizations)
    }

    #[instrument(name = "Load organizations", level = "info", skip_all, fields(path = ?path.as_ref()))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    /// Every organization must sit in a region the gazetteer knows about.
    pub fn validate_regions(&self, gazetteer: &GazetteerData) -> Result<()> {
        for org in &self.0 {
            if gazetteer.region(&org.region).is_none() {
                return Err(DataError::UnknownRegion {
                    organization: org.name.clone(),
                    region: org.region.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Deref for Organizations {
    type Target = [Organization];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Organization> for Organizations {
    fn from_iter<T: IntoIterator<Item = Organization>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
