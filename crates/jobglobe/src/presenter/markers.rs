use std::ops::Deref;

use jobglobe_data::{Coordinate, OpenPosition, Organization};

/// One employer pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub id: usize,
    pub name: String,
    pub address: String,
    pub logo: String,
    pub coordinate: Coordinate,
    pub positions: Vec<OpenPosition>,
}

impl MarkerEntry {
    pub fn from_organization(id: usize, org: &Organization) -> Self {
        Self {
            id,
            name: org.name.clone(),
            address: org.address.clone(),
            logo: org.logo.clone(),
            coordinate: org.coordinate,
            positions: org.positions.clone(),
        }
    }

    pub fn open_positions(&self) -> usize {
        self.positions.len()
    }

    /// Hover text: name, open-position count, address.
    pub fn tooltip(&self) -> String {
        let count = self.open_positions();
        let noun = if count == 1 { "position" } else { "positions" };
        format!("{}\n{count} open {noun}\n{}", self.name, self.address)
    }

    pub fn drawer(&self) -> DetailDrawer {
        DetailDrawer {
            marker_id: self.id,
            organization: self.name.clone(),
            address: self.address.clone(),
            logo: self.logo.clone(),
            positions: self
                .positions
                .iter()
                .enumerate()
                .map(|(index, position)| DrawerEntry {
                    index,
                    position: position.clone(),
                    action: DrawerAction::Apply,
                })
                .collect(),
        }
    }
}

/// The markers computed for one resolved location, in placement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapMarkerSet(Vec<MarkerEntry>);

impl MapMarkerSet {
    pub fn from_organizations<'a>(orgs: impl IntoIterator<Item = &'a Organization>) -> Self {
        Self(
            orgs.into_iter()
                .enumerate()
                .map(|(id, org)| MarkerEntry::from_organization(id, org))
                .collect(),
        )
    }

    pub fn get(&self, id: usize) -> Option<&MarkerEntry> {
        self.0.iter().find(|marker| marker.id == id)
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.0.iter().map(|marker| marker.coordinate)
    }

    pub(crate) fn push(&mut self, marker: MarkerEntry) {
        self.0.push(marker);
    }
}

impl Deref for MapMarkerSet {
    type Target = [MarkerEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerAction {
    Apply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerEntry {
    pub index: usize,
    pub position: OpenPosition,
    pub action: DrawerAction,
}

/// Side panel opened by clicking a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailDrawer {
    pub marker_id: usize,
    pub organization: String,
    pub address: String,
    pub logo: String,
    pub positions: Vec<DrawerEntry>,
}

/// An "Apply" click recorded on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub organization: String,
    pub title: String,
}
