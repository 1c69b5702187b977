//! Catalog loading integration tests
//!
//! Serves module descriptors from a local axum server and checks that the
//! HTTP source is used when healthy and the built-in catalog otherwise.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::json;

use study_journey::catalog::{load_catalog, CatalogOrigin, FlowKind, HttpCatalogSource};
use study_journey::config::{BackendKind, Config};
use study_journey::Journey;

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn source(addr: SocketAddr) -> HttpCatalogSource {
    HttpCatalogSource::new(format!("http://{}/api", addr), Duration::from_secs(5))
}

#[tokio::test]
async fn test_remote_catalog_sorted_by_key() {
    let app = Router::new().route(
        "/api/modules",
        get(|| async {
            Json(json!([
                {"id": "discernment", "title": "Discernment", "sortKey": 3, "points": 2500,
                 "componentKey": "checklist", "checklist": ["test", "search"]},
                {"id": "foundations", "title": "Foundations", "sortKey": 1, "points": 500,
                 "componentKey": "quiz",
                 "quiz": [{"prompt": "First book?", "options": ["Genesis", "Exodus"], "answer": 0}],
                 "lessons": [{"id": "f1", "title": "The Word", "scripture": "2 Timothy 3:16"}]},
                {"id": "prophecy", "title": "Prophecy", "sortKey": 2, "points": 1200,
                 "description": "Reading prophecy"}
            ]))
        }),
    );
    let addr = serve(app).await;

    let catalog = load_catalog(&source(addr)).await;

    assert_eq!(catalog.origin(), CatalogOrigin::Remote);
    let ids: Vec<_> = catalog.modules().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["foundations", "prophecy", "discernment"]);

    let foundations = &catalog.modules()[0];
    assert_eq!(foundations.flow, FlowKind::Quiz);
    assert_eq!(foundations.lessons_count, 1);
    assert_eq!(foundations.lessons[0].scripture, "2 Timothy 3:16");

    assert_eq!(catalog.modules()[1].flow, FlowKind::Generic);
    assert_eq!(catalog.modules()[2].prerequisites, vec![1]);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let app = Router::new().route(
        "/api/modules",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(app).await;

    let catalog = load_catalog(&source(addr)).await;
    assert_eq!(catalog.origin(), CatalogOrigin::Builtin);
    assert_eq!(catalog.len(), 3);
}

#[tokio::test]
async fn test_malformed_payload_falls_back() {
    let app = Router::new()
        .route("/api/modules", get(|| async { "<html>maintenance</html>" }));
    let addr = serve(app).await;

    let catalog = load_catalog(&source(addr)).await;
    assert_eq!(catalog.origin(), CatalogOrigin::Builtin);
}

#[tokio::test]
async fn test_invalid_descriptor_falls_back() {
    let app = Router::new().route(
        "/api/modules",
        get(|| async { Json(json!([{"id": "a", "title": "A"}, {"id": "a", "title": "Again"}])) }),
    );
    let addr = serve(app).await;

    let catalog = load_catalog(&source(addr)).await;
    assert_eq!(catalog.origin(), CatalogOrigin::Builtin);
}

#[tokio::test]
async fn test_unreachable_host_falls_back() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let catalog = load_catalog(&source(addr)).await;
    assert_eq!(catalog.origin(), CatalogOrigin::Builtin);
}

#[tokio::test]
async fn test_journey_open_uses_configured_url() {
    let app = Router::new().route(
        "/api/modules",
        get(|| async { Json(json!([{"id": "solo", "title": "Solo", "points": 100}])) }),
    );
    let addr = serve(app).await;

    let mut config = Config::default();
    config.catalog.url = Some(format!("http://{}/api/", addr));
    config.storage.backend = BackendKind::Memory;

    let journey = Journey::open(&config).await.unwrap();
    assert_eq!(journey.catalog().len(), 1);
    assert_eq!(journey.projection().total_available, 100);
}
