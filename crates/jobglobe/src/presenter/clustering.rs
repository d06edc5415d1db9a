//! Screen-space marker clustering.

use jobglobe_data::Coordinate;
use tracing::trace;

use super::{
    markers::MarkerEntry,
    viewport::{project, unproject},
};

/// Markers close enough at a zoom level to be drawn as one badge.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: Coordinate,
    /// Marker ids, in marker order
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Text shown on the cluster badge.
    pub fn badge(&self) -> String {
        self.count().to_string()
    }
}

/// Greedy clustering: each unassigned marker, in order, seeds a cluster and absorbs
/// every later unassigned marker within `radius_px` of it at `zoom`.
pub fn cluster_markers(markers: &[MarkerEntry], zoom: u8, radius_px: f64) -> Vec<Cluster> {
    let zoom = f64::from(zoom);
    let points: Vec<(f64, f64)> = markers
        .iter()
        .map(|marker| project(marker.coordinate, zoom))
        .collect();
    let mut assigned = vec![false; markers.len()];
    let mut clusters = Vec::new();

    for seed in 0..markers.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let (sx, sy) = points[seed];
        let mut member_idx = vec![seed];

        for other in (seed + 1)..markers.len() {
            if assigned[other] {
                continue;
            }
            let (ox, oy) = points[other];
            if (ox - sx).hypot(oy - sy) <= radius_px {
                assigned[other] = true;
                member_idx.push(other);
            }
        }

        let n = member_idx.len() as f64;
        let (cx, cy) = member_idx
            .iter()
            .fold((0.0, 0.0), |(x, y), idx| (x + points[*idx].0, y + points[*idx].1));
        clusters.push(Cluster {
            center: unproject(cx / n, cy / n, zoom),
            members: member_idx.iter().map(|idx| markers[*idx].id).collect(),
        });
    }

    trace!(
        markers = markers.len(),
        clusters = clusters.len(),
        "Markers clustered"
    );
    clusters
}
