//! Map presenter: drives the widget through one search session at a time.
//!
//! A submitted query is extracted and resolved synchronously. Anything with a location
//! then runs as a single spawned session task that walks the journey (geocoding each
//! camera target under a safety timeout), fits the view around the organizations at
//! the location and places their markers one after another. Submitting again aborts
//! the running session before the next one starts, so two journeys never animate the
//! camera at the same time.
//!
//! Session state is published on a [`tokio::sync::watch`] channel; see
//! [`MapPresenter::subscribe`].

use std::{sync::Arc, time::Duration};

use jobglobe_data::Coordinate;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
    time::{Instant, sleep, sleep_until, timeout},
};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::PresenterConfigBuilder,
    core::LocationPipeline,
    error::{JobGlobeError, Result},
    extract::LocationQuery,
    geocode::Geocoder,
    journey::{JourneyConfig, JourneyPlan},
};

mod clustering;
mod markers;
mod session;
mod viewport;
mod widget;

pub use clustering::{Cluster, cluster_markers};
pub use markers::{
    Application, DetailDrawer, DrawerAction, DrawerEntry, MapMarkerSet, MarkerEntry,
};
pub use session::{GeocodeFailure, MapSessionState, MapStatus};
pub use viewport::{Bounds, Viewport, ViewportSize, fit_bounds, padding_for, project, unproject};
pub use widget::{
    Easing, FlyOptions, MapNotice, MapWidget, MarkerView, RecordingWidget, WidgetCommand,
};

/// Timing, animation and layout settings for a [`MapPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub struct PresenterConfig {
    pub journey: JourneyConfig,
    /// Upper bound on one geocode call
    pub geocode_timeout: Duration,
    pub fly: FlyOptions,
    pub fit: FlyOptions,
    /// Delay between consecutive marker appearances
    pub marker_stagger: Duration,
    pub cluster_radius_px: f64,
    pub viewport_size: ViewportSize,
    pub max_fit_zoom: u8,
    pub initial_center: Coordinate,
    pub initial_zoom: u8,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            journey: JourneyConfig::default(),
            geocode_timeout: Duration::from_secs(10),
            fly: FlyOptions::default(),
            fit: FlyOptions {
                duration: Duration::from_millis(1000),
                easing: Easing::EaseOutCubic,
            },
            marker_stagger: Duration::from_millis(100),
            cluster_radius_px: 80.0,
            viewport_size: ViewportSize::default(),
            max_fit_zoom: 15,
            initial_center: Coordinate::new(22.3511, 78.6677),
            initial_zoom: 5,
        }
    }
}

impl PresenterConfig {
    pub fn builder() -> PresenterConfigBuilder {
        PresenterConfigBuilder::new()
    }
}

/// Owns one map widget and the session shown on it.
pub struct MapPresenter<G: Geocoder, W: MapWidget> {
    pipeline: Arc<LocationPipeline>,
    geocoder: Arc<G>,
    widget: Arc<Mutex<W>>,
    state: Arc<watch::Sender<MapSessionState>>,
    config: Arc<PresenterConfig>,
    task: Option<JoinHandle<()>>,
    generation: u64,
    mounted: bool,
}

impl<G: Geocoder, W: MapWidget> MapPresenter<G, W> {
    pub fn new(
        pipeline: Arc<LocationPipeline>,
        geocoder: G,
        widget: W,
        config: PresenterConfig,
    ) -> Self {
        let (state, _) = watch::channel(MapSessionState::default());
        Self {
            pipeline,
            geocoder: Arc::new(geocoder),
            widget: Arc::new(Mutex::new(widget)),
            state: Arc::new(state),
            config: Arc::new(config),
            task: None,
            generation: 0,
            mounted: false,
        }
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    pub fn widget(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.widget)
    }

    pub fn subscribe(&self) -> watch::Receiver<MapSessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current session.
    pub fn state(&self) -> MapSessionState {
        self.state.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Create the map at its initial view. Mounting twice is a no-op.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.widget
            .lock()
            .await
            .mount(self.config.initial_center, self.config.initial_zoom);
        self.mounted = true;
        debug!("Map mounted");
    }

    /// Stop any running session and tear the map down.
    pub async fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.cancel().await;
        {
            let mut widget = self.widget.lock().await;
            widget.clear_markers();
            widget.unmount();
        }
        self.state.send_modify(|state| {
            *state = MapSessionState {
                generation: state.generation,
                ..MapSessionState::default()
            };
        });
        self.mounted = false;
        debug!("Map unmounted");
    }

    async fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Awaiting guarantees the old session has released the widget.
            let _ = task.await;
        }
    }

    /// Start a new search session, superseding any running one.
    ///
    /// Returns the session's generation number.
    #[instrument(name = "Submit search", level = "info", skip(self), fields(text = %query.text))]
    pub async fn submit(&mut self, query: LocationQuery) -> Result<u64> {
        if !self.mounted {
            return Err(JobGlobeError::NotMounted);
        }
        self.cancel().await;
        self.generation += 1;
        let generation = self.generation;

        let resolution = self.pipeline.resolve(&query);
        let plan = resolution.plan(&self.config.journey);
        let markers = self.pipeline.markers_for(&resolution);
        let empty = matches!(plan, JourneyPlan::Empty);
        info!(
            generation,
            extracted = %resolution.extracted,
            markers = markers.len(),
            "Search submitted"
        );

        self.state.send_modify(|state| {
            state.begin(generation, &query.text);
            state.extracted = Some(resolution.extracted.clone());
            state.target = Some(resolution.target.clone());
            state.plan = Some(plan.clone());
            state.status = if empty {
                MapStatus::EmptyPrompt
            } else {
                MapStatus::Loading
            };
        });

        {
            let mut widget = self.widget.lock().await;
            widget.clear_markers();
            widget.set_clusters(&[]);
            if empty {
                widget.set_loading(false);
                widget.show_notice(Some(MapNotice::EmptyPrompt));
            } else {
                widget.show_notice(None);
                widget.set_loading(true);
            }
        }
        if empty {
            return Ok(generation);
        }

        let session = Session {
            generation,
            started: Instant::now(),
            plan,
            markers,
            geocoder: Arc::clone(&self.geocoder),
            widget: Arc::clone(&self.widget),
            state: Arc::clone(&self.state),
            config: Arc::clone(&self.config),
        };
        self.task = Some(tokio::spawn(session.run()));
        Ok(generation)
    }

    /// Wait for the running session, if any, to finish.
    pub async fn wait_idle(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.await.map_err(|e| JobGlobeError::Other(e.into()))?;
        }
        Ok(())
    }

    /// Open the detail drawer for a placed marker.
    pub fn select_marker(&self, marker_id: usize) -> Result<DetailDrawer> {
        let mut result = Err(JobGlobeError::UnknownMarker(marker_id));
        self.state.send_if_modified(|state| {
            let Some(marker) = state.markers.get(marker_id) else {
                return false;
            };
            let drawer = marker.drawer();
            state.selected = Some(drawer.clone());
            result = Ok(drawer);
            true
        });
        result
    }

    pub fn close_drawer(&self) {
        self.state
            .send_if_modified(|state| state.selected.take().is_some());
    }

    /// Record an "Apply" click on one of a marker's open positions.
    pub fn apply(&self, marker_id: usize, position: usize) -> Result<Application> {
        let mut result = Err(JobGlobeError::UnknownMarker(marker_id));
        self.state.send_if_modified(|state| {
            let Some(marker) = state.markers.get(marker_id) else {
                return false;
            };
            let Some(open) = marker.positions.get(position) else {
                result = Err(JobGlobeError::UnknownPosition {
                    marker: marker_id,
                    index: position,
                });
                return false;
            };
            let application = Application {
                organization: marker.name.clone(),
                title: open.title.clone(),
            };
            info!(
                organization = %application.organization,
                title = %application.title,
                "Application recorded"
            );
            state.applications.push(application.clone());
            result = Ok(application);
            true
        });
        result
    }
}

impl<G: Geocoder, W: MapWidget> Drop for MapPresenter<G, W> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

enum SessionEnd {
    /// A newer search owns the state
    Superseded,
    Failed(GeocodeFailure),
}

/// One spawned search session.
struct Session<G, W> {
    generation: u64,
    started: Instant,
    plan: JourneyPlan,
    markers: MapMarkerSet,
    geocoder: Arc<G>,
    widget: Arc<Mutex<W>>,
    state: Arc<watch::Sender<MapSessionState>>,
    config: Arc<PresenterConfig>,
}

impl<G: Geocoder, W: MapWidget> Session<G, W> {
    /// Apply `f` to the state if this session is still current.
    fn update<R>(&self, f: impl FnOnce(&mut MapSessionState) -> R) -> Option<R> {
        let mut out = None;
        self.state.send_if_modified(|state| {
            if state.generation != self.generation {
                return false;
            }
            out = Some(f(state));
            true
        });
        out
    }

    async fn run(self) {
        let outcome = match self.walk_journey().await {
            Ok(()) => self.place_markers().await,
            Err(end) => Err(end),
        };
        match outcome {
            Ok(()) => {}
            Err(SessionEnd::Superseded) => {
                debug!(generation = self.generation, "Session superseded");
            }
            Err(SessionEnd::Failed(failure)) => self.fail(failure).await,
        }
    }

    async fn geocode(&self, query: &str) -> std::result::Result<Coordinate, GeocodeFailure> {
        match timeout(self.config.geocode_timeout, self.geocoder.geocode(query)).await {
            Ok(Ok(Some(center))) => Ok(center),
            Ok(Ok(None)) => Err(GeocodeFailure::NoMatch),
            Ok(Err(e)) => Err(GeocodeFailure::Service(e.to_string())),
            Err(_) => Err(GeocodeFailure::TimedOut),
        }
    }

    #[instrument(name = "Journey", level = "debug", skip(self), fields(generation = self.generation))]
    async fn walk_journey(&self) -> std::result::Result<(), SessionEnd> {
        for step in self.plan.steps() {
            sleep_until(self.started + step.at).await;
            let center = self
                .geocode(&step.target.query)
                .await
                .map_err(SessionEnd::Failed)?;
            debug!(target = %step.target, ?center, phase = ?step.phase, "Camera step");

            self.widget
                .lock()
                .await
                .fly_to(center, step.target.zoom, self.config.fly);

            match self.update(|state| state.journey.advance(step, Some(center))) {
                None => return Err(SessionEnd::Superseded),
                Some(Err(e)) => warn!(error = %e, "Journey step ignored"),
                Some(Ok(())) => {}
            }
        }
        sleep(self.config.fly.duration).await;
        Ok(())
    }

    #[instrument(
        name = "Place markers",
        level = "debug",
        skip(self),
        fields(generation = self.generation, markers = self.markers.len())
    )]
    async fn place_markers(&self) -> std::result::Result<(), SessionEnd> {
        let Some(bounds) = Bounds::from_points(self.markers.coordinates()) else {
            self.finish(MapStatus::NoResults).await;
            return Ok(());
        };

        let viewport = fit_bounds(
            bounds,
            padding_for(self.markers.len()),
            self.config.viewport_size,
            self.config.max_fit_zoom,
        );
        self.widget
            .lock()
            .await
            .fit_bounds(&viewport, self.config.fit);
        self.update(|state| state.viewport = Some(viewport))
            .ok_or(SessionEnd::Superseded)?;
        sleep(self.config.fit.duration).await;

        let fitted = Instant::now();
        let clusters = cluster_markers(
            &self.markers,
            viewport.zoom,
            self.config.cluster_radius_px,
        );
        for (i, marker) in self.markers.iter().enumerate() {
            let delay = self
                .config
                .marker_stagger
                .saturating_mul(u32::try_from(i).unwrap_or(u32::MAX));
            sleep_until(fitted + delay).await;
            self.widget.lock().await.add_marker(MarkerView {
                id: marker.id,
                name: marker.name.clone(),
                coordinate: marker.coordinate,
                tooltip: marker.tooltip(),
            });
            self.update(|state| state.markers.push(marker.clone()))
                .ok_or(SessionEnd::Superseded)?;
        }

        self.widget.lock().await.set_clusters(&clusters);
        self.update(|state| state.clusters = clusters)
            .ok_or(SessionEnd::Superseded)?;
        self.finish(MapStatus::Ready).await;
        Ok(())
    }

    async fn finish(&self, status: MapStatus) {
        self.widget.lock().await.set_loading(false);
        info!(generation = self.generation, ?status, "Session finished");
        self.update(|state| state.status = status);
    }

    async fn fail(&self, failure: GeocodeFailure) {
        warn!(generation = self.generation, %failure, "Geocoding failed");
        {
            let mut widget = self.widget.lock().await;
            widget.clear_markers();
            widget.show_notice(Some(MapNotice::GeocodeFailed(failure.to_string())));
        }
        self.finish(MapStatus::GeocodeFailed(failure)).await;
    }
}
