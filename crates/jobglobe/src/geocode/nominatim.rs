//! Nominatim (OpenStreetMap) search client.
//!
//! The public instance requires an identifying `User-Agent` and allows at most one
//! request per second. Failed requests are not retried.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use jobglobe_data::Coordinate;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{GeocodeError, Geocoder};
use crate::config::GeocoderSettings;

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    country_codes: Option<String>,
}

impl NominatimGeocoder {
    /// Build a client with the configured user agent and request timeout.
    pub fn new(settings: &GeocoderSettings) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            country_codes: settings.country_codes.clone(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    #[instrument(name = "Nominatim geocode", level = "debug", skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let mut params = vec![("q", query), ("format", "jsonv2"), ("limit", "1")];
        if let Some(codes) = self.country_codes.as_deref() {
            params.push(("countrycodes", codes));
        }

        let resp = self.client.get(&self.base_url).query(&params).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: serde_json::Value = resp.json().await?;
        let result = parse_response(&body)?;
        debug!(?result, "Nominatim answered");
        Ok(result)
    }
}

fn parse_coordinate(value: &serde_json::Value, field: &str) -> Result<f64, GeocodeError> {
    value[field]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value[field].as_f64())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("Missing {field} in Nominatim response"),
        })
}

/// Parses a Nominatim search response: an array of places, best first.
fn parse_response(body: &serde_json::Value) -> Result<Option<Coordinate>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    Ok(Some(Coordinate::new(
        parse_coordinate(first, "lat")?,
        parse_coordinate(first, "lon")?,
    )))
}
