//! Text-to-coordinate geocoding.
//!
//! The presenter only depends on the [`Geocoder`] trait, so the HTTP client can be
//! swapped for the offline [`GazetteerGeocoder`] (or a test double) without touching
//! call sites.

use std::future::Future;

pub use error::GeocodeError;
pub use gazetteer::GazetteerGeocoder;
use jobglobe_data::Coordinate;
pub use nominatim::NominatimGeocoder;

mod gazetteer;
mod nominatim;

/// Anything that can turn a free-text place description into a coordinate.
///
/// `Ok(None)` means the service answered but found nothing.
pub trait Geocoder: Send + Sync + 'static {
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, GeocodeError>> + Send;
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum GeocodeError {
        #[error("HTTP error: {0}")]
        Http(#[from] reqwest::Error),
        #[error("Geocoding service rate limited the request")]
        RateLimited,
        #[error("Geocoding service returned status {0}")]
        Status(u16),
        #[error("Failed to parse geocoding response: {message}")]
        Parse { message: String },
    }
}
