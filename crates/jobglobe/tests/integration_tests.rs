//! Integration tests for the jobglobe location pipeline
//!
//! These run against the public API only: the pure pipeline on the embedded tables,
//! the presenter on paused tokio time, and the HTTP geocoder against a mock server.

use std::{sync::Arc, time::Duration};

use jobglobe::{
    Coordinate, DataSource, ExtractedLocation, GazetteerGeocoder, GeocodeFailure,
    GeocoderSettings, JourneyPhase, LocationPipeline, LocationQuery, MapPresenter,
    MapStatus, NominatimGeocoder, PresenterConfig, PresenterConfigBuilder, RecordingWidget,
    RegionFilter, data::normalize_key, presenter::WidgetCommand,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn setup_test_env() {
    let _ = jobglobe::init_logging(tracing::Level::WARN);
}

fn kerala() -> RegionFilter {
    RegionFilter::country("India").with_state("Kerala")
}

fn karnataka() -> RegionFilter {
    RegionFilter::country("India").with_state("Karnataka")
}

#[test]
fn test_concrete_scenarios() {
    setup_test_env();
    let pipeline = LocationPipeline::new_embedded();

    let kochi = pipeline.resolve(&LocationQuery::new("frontend developer in Kochi"));
    assert_eq!(kochi.extracted, ExtractedLocation::Place("Kochi".to_string()));
    assert!(kochi.postal.is_none());

    for filter in [None, Some(kerala()), Some(karnataka())] {
        let query = LocationQuery {
            text: "690001".to_string(),
            filter,
        };
        assert_eq!(
            pipeline.extract(&query),
            ExtractedLocation::PostalCode("690001".to_string())
        );
    }

    let ekm = pipeline.resolve(&LocationQuery::new("ernakulam").with_filter(kerala()));
    assert_eq!(ekm.extracted, ExtractedLocation::Place("Ekm".to_string()));
    let postal = ekm.postal.unwrap();
    assert_eq!(postal.postal_code, "682001");
    assert_eq!(postal.region.name, "Kerala");

    let blr = pipeline.resolve(&LocationQuery::new("bengaluru").with_filter(karnataka()));
    let postal = blr.postal.unwrap();
    assert_eq!(postal.postal_code, "560001");
    assert_eq!(postal.region.name, "Karnataka");

    let cross = pipeline.resolve(&LocationQuery::new("560001").with_filter(kerala()));
    assert_eq!(
        cross.extracted,
        ExtractedLocation::PostalCode("560001".to_string())
    );
    assert!(cross.postal.is_none());
    assert!(pipeline.markers_for(&cross).is_empty());
}

#[test]
fn test_postal_code_is_returned_verbatim_anywhere_in_the_query() {
    setup_test_env();
    let pipeline = LocationPipeline::new_embedded();
    let texts = [
        "123456",
        "jobs at 682001",
        "682001 backend",
        "senior dev (pin 575001) remote ok",
        "in Kochi 999999",
        "pincode:560034,urgent",
    ];
    for text in texts {
        let expected = text
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| part.len() == 6)
            .unwrap();
        for filter in [None, Some(kerala()), Some(RegionFilter::country("India"))] {
            let query = LocationQuery {
                text: text.to_string(),
                filter,
            };
            assert_eq!(
                pipeline.extract(&query),
                ExtractedLocation::PostalCode(expected.to_string()),
                "{text}"
            );
        }
    }
}

#[test]
fn test_resolution_never_contradicts_the_filtered_region() {
    setup_test_env();
    let pipeline = LocationPipeline::new_embedded();
    let gazetteer = pipeline.gazetteer();

    let mut inputs: Vec<String> = vec!["Kochi".into(), "690001".into(), "nowhere".into()];
    for table in &gazetteer.data().regions {
        for record in &table.places {
            inputs.push(record.postal_code.clone());
            inputs.extend(record.keys());
        }
    }

    for filter in [kerala(), karnataka()] {
        let expected = normalize_key(filter.state.as_deref().unwrap());
        let query = LocationQuery::new("").with_filter(filter);
        for input in &inputs {
            if let Some(resolved) = pipeline.resolve_postal(Some(input), &query) {
                assert_eq!(resolved.region.id.as_str(), expected, "{input}");
            }
        }
    }
}

#[test]
fn test_bulk_resolution_matches_sequential() {
    setup_test_env();
    let pipeline = LocationPipeline::new_embedded();
    let queries: Vec<LocationQuery> = [
        "react developer in ernakulam",
        "data engineer in bangalore",
        "560001",
        "rust",
        "designer in mysore",
    ]
    .iter()
    .flat_map(|text| {
        [
            LocationQuery::new(*text),
            LocationQuery::new(*text).with_filter(kerala()),
            LocationQuery::new(*text).with_filter(karnataka()),
        ]
    })
    .collect();

    let bulk = pipeline.resolve_bulk(&queries);
    let sequential: Vec<_> = queries.iter().map(|q| pipeline.resolve(q)).collect();
    assert_eq!(bulk, sequential);
}

#[test]
fn test_pipeline_from_json_files() {
    setup_test_env();
    let dir = tempfile::tempdir().unwrap();
    let gazetteer_path = dir.path().join("gazetteer.json");
    let organizations_path = dir.path().join("organizations.json");

    let embedded = LocationPipeline::new_embedded();
    std::fs::write(
        &gazetteer_path,
        serde_json::to_string(embedded.gazetteer().data()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        &organizations_path,
        serde_json::to_string(embedded.organizations()).unwrap(),
    )
    .unwrap();

    let pipeline = LocationPipeline::from_source(&DataSource::Files {
        gazetteer: gazetteer_path,
        organizations: Some(organizations_path),
    })
    .unwrap();

    let query = LocationQuery::new("jobs in calicut").with_filter(kerala());
    assert_eq!(pipeline.resolve(&query), embedded.resolve(&query));
    assert_eq!(
        pipeline.listings_for(&pipeline.resolve(&query)),
        embedded.listings_for(&embedded.resolve(&query))
    );
}

async fn presenter(
    config: PresenterConfig,
) -> MapPresenter<GazetteerGeocoder, RecordingWidget> {
    let pipeline = Arc::new(LocationPipeline::new_embedded());
    let geocoder = GazetteerGeocoder::new(Arc::clone(pipeline.gazetteer()));
    let mut presenter = MapPresenter::new(pipeline, geocoder, RecordingWidget::new(), config);
    presenter.mount().await;
    presenter
}

#[tokio::test(start_paused = true)]
async fn test_no_location_shows_empty_prompt() {
    setup_test_env();
    let mut presenter = presenter(PresenterConfig::default()).await;
    presenter
        .submit(LocationQuery::new("senior rust engineer").with_filter(kerala()))
        .await
        .unwrap();
    presenter.wait_idle().await.unwrap();

    let state = presenter.state();
    assert!(state.has_searched);
    assert_eq!(state.status, MapStatus::EmptyPrompt);
    assert!(state.markers.is_empty());
    assert!(!state.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_journey_phase_never_regresses() {
    setup_test_env();
    let mut presenter = presenter(PresenterConfig::default()).await;
    let mut rx = presenter.subscribe();
    let collector = tokio::spawn(async move {
        let mut phases = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            phases.push(state.journey.phase);
            if state.status.is_terminal() {
                break;
            }
        }
        phases
    });

    presenter
        .submit(LocationQuery::new("qa engineer in ernakulam").with_filter(kerala()))
        .await
        .unwrap();
    presenter.wait_idle().await.unwrap();

    let phases = collector.await.unwrap();
    assert!(phases.windows(2).all(|pair| pair[0] <= pair[1]), "{phases:?}");
    assert_eq!(phases.last(), Some(&JourneyPhase::PlaceDetail));
}

#[tokio::test(start_paused = true)]
async fn test_markers_enter_staggered_after_the_fit() {
    setup_test_env();
    let config = PresenterConfig::default();
    let markers_at = config.journey.overview_delay
        + config.journey.detail_delay
        + config.fly.duration
        + config.fit.duration;
    let stagger = config.marker_stagger;

    let mut presenter = presenter(config).await;
    let widget = presenter.widget();
    presenter
        .submit(LocationQuery::new("bengaluru").with_filter(karnataka()))
        .await
        .unwrap();

    tokio::time::sleep(markers_at - Duration::from_millis(10)).await;
    assert!(widget.lock().await.marker_ids().is_empty());

    tokio::time::sleep(stagger / 2 + Duration::from_millis(10)).await;
    assert_eq!(widget.lock().await.marker_ids(), vec![0]);

    tokio::time::sleep(stagger * 3).await;
    assert_eq!(widget.lock().await.marker_ids(), vec![0, 1, 2, 3]);

    presenter.wait_idle().await.unwrap();
    let state = presenter.state();
    assert_eq!(state.status, MapStatus::Ready);
    // Four markers fit with the medium padding.
    assert_eq!(state.viewport.unwrap().padding_px, 120);
    assert!(
        state
            .markers
            .iter()
            .all(|m| state.viewport.unwrap().bounds.contains(m.coordinate))
    );
}

#[tokio::test(start_paused = true)]
async fn test_repeated_query_is_idempotent() {
    setup_test_env();
    let mut presenter = presenter(PresenterConfigBuilder::instant().build()).await;
    let query = LocationQuery::new("android developer in mangalore").with_filter(karnataka());

    presenter.submit(query.clone()).await.unwrap();
    presenter.wait_idle().await.unwrap();
    let first = presenter.state();

    presenter.submit(query).await.unwrap();
    presenter.wait_idle().await.unwrap();
    let second = presenter.state();

    assert_eq!(first.extracted, second.extracted);
    assert_eq!(first.journey.camera, second.journey.camera);
    assert_eq!(first.markers, second.markers);
    assert_eq!(second.generation, first.generation + 1);
}

#[tokio::test]
async fn test_presenter_with_http_geocoder() {
    setup_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "lat": "12.9716", "lon": "77.5946" }])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let settings = GeocoderSettings {
        base_url: format!("{}/search", server.uri()),
        ..GeocoderSettings::default()
    };
    let geocoder = NominatimGeocoder::new(&settings).unwrap();
    let mut presenter = MapPresenter::new(
        Arc::new(LocationPipeline::new_embedded()),
        geocoder,
        RecordingWidget::new(),
        PresenterConfigBuilder::instant().build(),
    );
    presenter.mount().await;
    presenter
        .submit(LocationQuery::new("bangalore").with_filter(karnataka()))
        .await
        .unwrap();
    presenter.wait_idle().await.unwrap();

    let state = presenter.state();
    assert_eq!(state.status, MapStatus::Ready);
    assert_eq!(state.journey.center, Some(Coordinate::new(12.9716, 77.5946)));
}

#[tokio::test]
async fn test_http_failure_is_visible_and_not_retried() {
    setup_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let settings = GeocoderSettings {
        base_url: format!("{}/search", server.uri()),
        ..GeocoderSettings::default()
    };
    let mut presenter = MapPresenter::new(
        Arc::new(LocationPipeline::new_embedded()),
        NominatimGeocoder::new(&settings).unwrap(),
        RecordingWidget::new(),
        PresenterConfigBuilder::instant().build(),
    );
    presenter.mount().await;
    presenter
        .submit(LocationQuery::new("jobs in Kochi"))
        .await
        .unwrap();
    presenter.wait_idle().await.unwrap();

    let state = presenter.state();
    assert!(matches!(
        state.status,
        MapStatus::GeocodeFailed(GeocodeFailure::Service(_))
    ));
    assert!(!state.is_loading());
    assert!(state.markers.is_empty());

    let widget = presenter.widget();
    let widget = widget.lock().await;
    assert!(
        widget
            .commands()
            .iter()
            .any(|cmd| matches!(cmd, WidgetCommand::ShowNotice(Some(_))))
    );
}
