//! Animated map journey against a recording widget
//!
//! Runs one search through the presenter with the local gazetteer as geocoder and
//! prints every widget command in the order the camera would perform it. Set
//! `JOBGLOBE_NOMINATIM=1` to geocode through Nominatim instead.

use std::sync::Arc;

use jobglobe::{
    GazetteerGeocoder, GeocoderSettings, Geocoder, LocationPipeline, LocationQuery, MapPresenter,
    PresenterConfig, RecordingWidget, RegionFilter,
};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobglobe::init_logging(Level::INFO)?;

    let pipeline = Arc::new(LocationPipeline::new_embedded());
    let query = LocationQuery::new("frontend developer in ernakulam")
        .with_filter(RegionFilter::country("India").with_state("Kerala"));

    if std::env::var("JOBGLOBE_NOMINATIM").is_ok_and(|v| v == "1") {
        let geocoder = jobglobe::NominatimGeocoder::new(&GeocoderSettings::from_env())?;
        run(pipeline, geocoder, query).await
    } else {
        let geocoder = GazetteerGeocoder::new(Arc::clone(pipeline.gazetteer()));
        run(pipeline, geocoder, query).await
    }
}

async fn run<G: Geocoder>(
    pipeline: Arc<LocationPipeline>,
    geocoder: G,
    query: LocationQuery,
) -> anyhow::Result<()> {
    let mut presenter = MapPresenter::new(
        pipeline,
        geocoder,
        RecordingWidget::new(),
        PresenterConfig::default(),
    );
    presenter.mount().await;

    let generation = presenter.submit(query).await?;
    presenter.wait_idle().await?;

    let state = presenter.state();
    println!("Session {generation} finished with {:?}", state.status);
    for command in presenter.widget().lock().await.commands() {
        println!("  {command:?}");
    }

    if let Some(marker) = state.markers.first() {
        let drawer = presenter.select_marker(marker.id)?;
        println!("\n{}\n{}", drawer.organization, drawer.address);
        for entry in &drawer.positions {
            println!("  {}. {} ({})", entry.index + 1, entry.position.title, entry.position.kind);
        }
        let application = presenter.apply(marker.id, 0)?;
        println!("Applied to {} at {}", application.title, application.organization);
    }

    presenter.unmount().await;
    Ok(())
}
