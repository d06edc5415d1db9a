//! Fit-bounds in Web Mercator pixel space.

use std::f64::consts::PI;

use jobglobe_data::Coordinate;

const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Size of the map element in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Axis-aligned lat/lon box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        points.into_iter().fold(None, |acc, point| {
            Some(match acc {
                None => Self {
                    south: point.lat,
                    west: point.lon,
                    north: point.lat,
                    east: point.lon,
                },
                Some(b) => Self {
                    south: b.south.min(point.lat),
                    west: b.west.min(point.lon),
                    north: b.north.max(point.lat),
                    east: b.east.max(point.lon),
                },
            })
        })
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lon)
    }
}

/// Camera view computed to enclose a set of markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub center: Coordinate,
    pub zoom: u8,
    pub padding_px: u32,
}

/// Padding grows with the number of markers so crowded views keep markers off the edges.
pub fn padding_for(marker_count: usize) -> u32 {
    match marker_count {
        0..=3 => 80,
        4..=10 => 120,
        _ => 150,
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Project to world pixel coordinates at `zoom`.
pub fn project(point: Coordinate, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lon + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: f64) -> Coordinate {
    let size = world_size(zoom);
    let lon = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    Coordinate::new(lat, lon)
}

/// Largest integer zoom (up to `max_zoom`) at which `bounds` fits inside the padded viewport.
pub fn fit_bounds(bounds: Bounds, padding_px: u32, size: ViewportSize, max_zoom: u8) -> Viewport {
    let (west, north) = project(Coordinate::new(bounds.north, bounds.west), 0.0);
    let (east, south) = project(Coordinate::new(bounds.south, bounds.east), 0.0);
    let span_x = (east - west).abs();
    let span_y = (south - north).abs();

    let avail_x = f64::from(size.width.saturating_sub(2 * padding_px).max(1));
    let avail_y = f64::from(size.height.saturating_sub(2 * padding_px).max(1));

    let scale = match (span_x > f64::EPSILON, span_y > f64::EPSILON) {
        (false, false) => f64::INFINITY,
        (true, false) => avail_x / span_x,
        (false, true) => avail_y / span_y,
        (true, true) => (avail_x / span_x).min(avail_y / span_y),
    };
    let zoom = if scale.is_finite() {
        scale.log2().floor().clamp(0.0, f64::from(max_zoom)) as u8
    } else {
        max_zoom
    };

    let center = unproject((west + east) / 2.0, (north + south) / 2.0, 0.0);
    Viewport {
        bounds,
        center,
        zoom,
        padding_px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_grows_with_marker_count() {
        assert_eq!(padding_for(1), 80);
        assert_eq!(padding_for(3), 80);
        assert_eq!(padding_for(4), 120);
        assert_eq!(padding_for(10), 120);
        assert_eq!(padding_for(11), 150);
    }

    #[test]
    fn test_projection_round_trip_of_known_point() {
        let kochi = Coordinate::new(9.9816, 76.2999);
        let (x, y) = project(kochi, 10.0);
        let back = unproject(x, y, 10.0);
        assert!((back.lat - kochi.lat).abs() < 1e-9);
        assert!((back.lon - kochi.lon).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(Bounds::from_points(Vec::new()).is_none());
        let bounds = Bounds::from_points([
            Coordinate::new(12.97, 77.60),
            Coordinate::new(12.84, 77.66),
            Coordinate::new(12.93, 77.75),
        ])
        .unwrap();
        assert_eq!(bounds.south, 12.84);
        assert_eq!(bounds.north, 12.97);
        assert_eq!(bounds.west, 77.60);
        assert_eq!(bounds.east, 77.75);
        assert!(bounds.contains(Coordinate::new(12.9, 77.7)));
    }

    #[test]
    fn test_single_point_uses_max_zoom() {
        let bounds = Bounds::from_points([Coordinate::new(12.35, 76.61)]).unwrap();
        let viewport = fit_bounds(bounds, 80, ViewportSize::default(), 15);
        assert_eq!(viewport.zoom, 15);
        assert!((viewport.center.lat - 12.35).abs() < 1e-9);
    }

    #[test]
    fn test_wider_spread_means_lower_zoom() {
        let size = ViewportSize::default();
        let city = Bounds::from_points([
            Coordinate::new(12.84, 77.60),
            Coordinate::new(12.98, 77.75),
        ])
        .unwrap();
        let state = Bounds::from_points([
            Coordinate::new(8.5, 76.9),
            Coordinate::new(12.9, 77.6),
        ])
        .unwrap();
        let city_view = fit_bounds(city, 80, size, 18);
        let state_view = fit_bounds(state, 80, size, 18);
        assert!(city_view.zoom > state_view.zoom);
        assert!(city.contains(city_view.center));

        // The fitted span must actually fit inside the padded viewport.
        let (x0, y0) = project(Coordinate::new(city.north, city.west), f64::from(city_view.zoom));
        let (x1, y1) = project(Coordinate::new(city.south, city.east), f64::from(city_view.zoom));
        assert!(x1 - x0 <= f64::from(size.width - 160));
        assert!(y1 - y0 <= f64::from(size.height - 160));
    }

    #[test]
    fn test_more_padding_never_zooms_in() {
        let bounds = Bounds::from_points([
            Coordinate::new(9.97, 76.27),
            Coordinate::new(10.02, 76.36),
        ])
        .unwrap();
        let tight = fit_bounds(bounds, 80, ViewportSize::default(), 18);
        let loose = fit_bounds(bounds, 150, ViewportSize::default(), 18);
        assert!(loose.zoom <= tight.zoom);
    }
}
