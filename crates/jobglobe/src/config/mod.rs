use std::time::Duration;

use jobglobe_data::Coordinate;

use crate::{
    error::JobGlobeError,
    presenter::{Easing, PresenterConfig, ViewportSize},
};

/// Highest zoom level the tile layers serve.
pub const MAX_ZOOM: u8 = 20;

pub const GEOCODER_URL_ENV: &str = "JOBGLOBE_GEOCODER_URL";
pub const USER_AGENT_ENV: &str = "JOBGLOBE_USER_AGENT";

/// Builder for presenter configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct PresenterConfigBuilder {
    config: PresenterConfig,
}

impl PresenterConfigBuilder {
    /// Create a new builder with the standard timings
    pub fn new() -> Self {
        Self {
            config: PresenterConfig::default(),
        }
    }

    /// No delays or animation time at all; for headless hosts and batch rendering
    pub fn instant() -> Self {
        let mut builder = Self::new();
        builder.config.journey.overview_delay = Duration::ZERO;
        builder.config.journey.detail_delay = Duration::ZERO;
        builder.config.fly.duration = Duration::ZERO;
        builder.config.fit.duration = Duration::ZERO;
        builder.config.marker_stagger = Duration::ZERO;
        builder
    }

    /// Slower, smoother camera work for presentation screens
    pub fn cinematic() -> Self {
        let mut builder = Self::new();
        builder.config.journey.overview_delay = Duration::from_millis(2000);
        builder.config.journey.detail_delay = Duration::from_millis(3000);
        builder.config.fly.duration = Duration::from_millis(2500);
        builder.config.fly.easing = Easing::EaseInOut;
        builder.config.fit.duration = Duration::from_millis(1500);
        builder.config.fit.easing = Easing::EaseOutCubic;
        builder.config.marker_stagger = Duration::from_millis(150);
        builder
    }

    /// Upper bound on a single geocode before the session gives up
    pub fn geocode_timeout(mut self, timeout: Duration) -> Self {
        self.config.geocode_timeout = timeout;
        self
    }

    /// Delays before the region overview and between overview and detail
    pub fn journey_delays(mut self, overview: Duration, detail: Duration) -> Self {
        self.config.journey.overview_delay = overview;
        self.config.journey.detail_delay = detail;
        self
    }

    pub fn fly_duration(mut self, duration: Duration) -> Self {
        self.config.fly.duration = duration;
        self
    }

    pub fn fit_duration(mut self, duration: Duration) -> Self {
        self.config.fit.duration = duration;
        self
    }

    /// Easing for both camera moves and bounds fits
    pub fn easing(mut self, easing: Easing) -> Self {
        self.config.fly.easing = easing;
        self.config.fit.easing = easing;
        self
    }

    /// Delay between consecutive marker appearances
    pub fn marker_stagger(mut self, stagger: Duration) -> Self {
        self.config.marker_stagger = stagger;
        self
    }

    /// Screen distance under which markers share a cluster
    pub fn cluster_radius(mut self, radius_px: f64) -> Self {
        self.config.cluster_radius_px = radius_px.max(0.0);
        self
    }

    pub fn viewport_size(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_size = ViewportSize { width, height };
        self
    }

    /// Cap on the zoom chosen when fitting markers
    pub fn max_fit_zoom(mut self, zoom: u8) -> Self {
        self.config.max_fit_zoom = zoom.min(MAX_ZOOM);
        self
    }

    /// View shown when the map is mounted
    pub fn initial_view(mut self, center: Coordinate, zoom: u8) -> Self {
        self.config.initial_center = center;
        self.config.initial_zoom = zoom.min(MAX_ZOOM);
        self
    }

    /// Zooms for the two-step journey (overview must be wider than detail)
    pub fn journey_zooms(mut self, overview: u8, detail: u8) -> Result<Self, JobGlobeError> {
        if detail > MAX_ZOOM || overview >= detail {
            return Err(JobGlobeError::ConfigError(format!(
                "Journey zooms must satisfy overview < detail <= {MAX_ZOOM}, got {overview} and {detail}"
            )));
        }
        self.config.journey.overview_zoom = overview;
        self.config.journey.detail_zoom = detail;
        Ok(self)
    }

    /// Zoom table for direct jumps, from least to most specific
    pub fn zoom_table(
        mut self,
        country: u8,
        region: u8,
        place: [u8; 3],
    ) -> Result<Self, JobGlobeError> {
        let ordered = [country, region, place[0], place[1], place[2]];
        if ordered.windows(2).any(|pair| pair[0] > pair[1]) || place[2] > MAX_ZOOM {
            return Err(JobGlobeError::ConfigError(format!(
                "Zoom table must be non-decreasing and at most {MAX_ZOOM}, got {ordered:?}"
            )));
        }
        self.config.journey.country_zoom = country;
        self.config.journey.region_zoom = region;
        self.config.journey.place_zooms = place;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> PresenterConfig {
        self.config
    }
}

/// Connection settings for the HTTP geocoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderSettings {
    pub base_url: String,
    /// Nominatim rejects requests without an identifying agent
    pub user_agent: String,
    pub request_timeout: Duration,
    /// ISO 3166-1 alpha-2 codes, comma separated
    pub country_codes: Option<String>,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("jobglobe/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: Duration::from_secs(10),
            country_codes: Some("in".to_string()),
        }
    }
}

impl GeocoderSettings {
    /// Defaults, overridden by `JOBGLOBE_GEOCODER_URL` and `JOBGLOBE_USER_AGENT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            base_url: non_empty(GEOCODER_URL_ENV).unwrap_or(defaults.base_url),
            user_agent: non_empty(USER_AGENT_ENV).unwrap_or(defaults.user_agent),
            ..defaults
        }
    }

    pub fn with_country_codes(mut self, codes: Option<&str>) -> Self {
        self.country_codes = codes.map(ToString::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let config = PresenterConfigBuilder::new().build();
        assert_eq!(config.geocode_timeout, Duration::from_secs(10));
        assert_eq!(config.journey.overview_delay, Duration::from_millis(1500));
        assert_eq!(config.journey.detail_delay, Duration::from_millis(2000));
        assert_eq!(config.cluster_radius_px, 80.0);
    }

    #[test]
    fn test_instant_preset() {
        let config = PresenterConfigBuilder::instant().build();
        assert_eq!(config.journey.overview_delay, Duration::ZERO);
        assert_eq!(config.fly.duration, Duration::ZERO);
        assert_eq!(config.marker_stagger, Duration::ZERO);
        // The safety net is not an animation.
        assert_eq!(config.geocode_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_cinematic_preset() {
        let config = PresenterConfigBuilder::cinematic().build();
        assert!(config.fly.duration > PresenterConfigBuilder::new().build().fly.duration);
        assert_eq!(config.fit.easing, Easing::EaseOutCubic);
        assert_eq!(config.marker_stagger, Duration::from_millis(150));
    }

    #[test]
    fn test_method_chaining_overrides_presets() {
        let config = PresenterConfigBuilder::instant()
            .marker_stagger(Duration::from_millis(40))
            .cluster_radius(-5.0)
            .max_fit_zoom(30)
            .viewport_size(800, 600)
            .build();
        assert_eq!(config.marker_stagger, Duration::from_millis(40));
        assert_eq!(config.cluster_radius_px, 0.0);
        assert_eq!(config.max_fit_zoom, MAX_ZOOM);
        assert_eq!(config.viewport_size.width, 800);
        assert_eq!(config.journey.overview_delay, Duration::ZERO);
    }

    #[test]
    fn test_zoom_table_validation() {
        assert!(PresenterConfigBuilder::new().zoom_table(5, 7, [10, 11, 12]).is_ok());
        assert!(PresenterConfigBuilder::new().zoom_table(9, 7, [10, 11, 12]).is_err());
        assert!(PresenterConfigBuilder::new().zoom_table(5, 7, [10, 9, 12]).is_err());
        assert!(PresenterConfigBuilder::new().zoom_table(5, 7, [10, 11, 25]).is_err());

        let config = PresenterConfigBuilder::new()
            .zoom_table(5, 7, [10, 11, 12])
            .unwrap()
            .build();
        assert_eq!(config.journey.place_zooms, [10, 11, 12]);
    }

    #[test]
    fn test_journey_zoom_validation() {
        assert!(PresenterConfigBuilder::new().journey_zooms(8, 14).is_ok());
        assert!(PresenterConfigBuilder::new().journey_zooms(14, 8).is_err());
        assert!(PresenterConfigBuilder::new().journey_zooms(8, 21).is_err());
    }

    #[test]
    fn test_geocoder_settings_from_lookup() {
        let settings = GeocoderSettings::from_lookup(|key| match key {
            GEOCODER_URL_ENV => Some("http://localhost:8080/search".to_string()),
            USER_AGENT_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(settings.base_url, "http://localhost:8080/search");
        assert!(settings.user_agent.starts_with("jobglobe/"));
        assert_eq!(settings.country_codes.as_deref(), Some("in"));

        let settings = GeocoderSettings::from_lookup(|_| None).with_country_codes(None);
        assert_eq!(settings.base_url, GeocoderSettings::default().base_url);
        assert!(settings.country_codes.is_none());
    }
}
