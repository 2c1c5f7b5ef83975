//! End-to-end sync runs against a mocked Strava
//!
//! Each test points the token and activity endpoints at a wiremock server and
//! the database at a temporary directory, runs the engine, then reopens the
//! DuckDB file to check what was stored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::json;
use strava_sync::db::ActivityStore;
use strava_sync::sync::{SyncEngine, SyncPhase};
use strava_sync::{Config, Credentials, StravaSyncError};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACTIVITIES_PATH: &str = "/api/v3/athlete/activities";

fn test_config(mock_server: &MockServer, db_path: &Path) -> Config {
    Config::new(Credentials::new("42", "client-secret", "test-refresh-token"))
        .with_endpoints(
            format!("{}/oauth/token", mock_server.uri()),
            format!("{}/api/v3", mock_server.uri()),
        )
        .with_db_path(db_path)
        .with_page_delay(Duration::ZERO)
}

/// Database path inside a not-yet-existing subdirectory
fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data").join("fitness.duckdb")
}

async fn mount_token(mock_server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": access_token })))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn mount_page(mock_server: &MockServer, page: u32, per_page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(ACTIVITIES_PATH))
        .and(header("Authorization", "Bearer T"))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", per_page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(mock_server)
        .await;
}

fn run_a(name: &str) -> serde_json::Value {
    json!([{
        "id": 1,
        "name": name,
        "type": "Run",
        "start_date": "2024-01-01T00:00:00Z",
        "elapsed_time": 1800,
        "moving_time": 1700
    }])
}

fn open_store(path: &Path) -> ActivityStore {
    let store = ActivityStore::open(path).unwrap();
    store.ensure_schema().unwrap();
    store
}

#[tokio::test]
async fn test_single_page_end_to_end() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    mount_token(&mock_server, "T").await;
    mount_page(&mock_server, 1, 200, run_a("Run A")).await;
    mount_page(&mock_server, 2, 200, json!([])).await;

    let config = test_config(&mock_server, &db);
    let mut engine = SyncEngine::new(&config).unwrap();
    let stats = engine.run().await.expect("sync failed");

    assert_eq!(stats.upserted, 1);
    assert_eq!(stats.pages, 1);
    assert_eq!(stats.fetch_calls, 2);
    assert_eq!(engine.phase(), SyncPhase::Done);
    assert!(db.exists());

    let store = open_store(&db);
    assert_eq!(store.count().unwrap(), 1);

    let row = store.get(1).unwrap().expect("row missing");
    assert_eq!(row.name.as_deref(), Some("Run A"));
    assert_eq!(row.activity_type.as_deref(), Some("Run"));
    assert_eq!(
        row.start_date.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
        "2024-01-01 00:00:00"
    );
    assert_eq!(row.elapsed_time_sec, Some(1800));
    assert_eq!(row.moving_time_sec, Some(1700));
}

#[tokio::test]
async fn test_reingestion_overwrites_existing_row() {
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    for name in ["Run A", "Run A (edited)"] {
        let mock_server = MockServer::start().await;
        mount_token(&mock_server, "T").await;
        mount_page(&mock_server, 1, 200, run_a(name)).await;
        mount_page(&mock_server, 2, 200, json!([])).await;

        let config = test_config(&mock_server, &db);
        let stats = SyncEngine::new(&config).unwrap().run().await.unwrap();
        assert_eq!(stats.upserted, 1);
    }

    let store = open_store(&db);
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(
        store.get(1).unwrap().unwrap().name.as_deref(),
        Some("Run A (edited)")
    );
}

#[tokio::test]
async fn test_pages_increment_until_empty() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    mount_token(&mock_server, "T").await;
    mount_page(
        &mock_server,
        1,
        3,
        serde_json::from_str(include_str!("fixtures/activities_page1.json")).unwrap(),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        3,
        serde_json::from_str(include_str!("fixtures/activities_page2.json")).unwrap(),
    )
    .await;
    mount_page(&mock_server, 3, 3, json!([])).await;

    let config = test_config(&mock_server, &db).with_per_page(3);
    let stats = SyncEngine::new(&config).unwrap().run().await.unwrap();

    // two pages of data plus the empty terminator
    assert_eq!(stats.fetch_calls, 3);
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.upserted, 4);

    let requests = mock_server.received_requests().await.unwrap();
    let pages: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == ACTIVITIES_PATH)
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.into_owned())
                .unwrap()
        })
        .collect();
    assert_eq!(pages, vec!["1", "2", "3"]);

    let store = open_store(&db);
    assert_eq!(store.count().unwrap(), 4);
    let workout = store.get(12000000001).unwrap().unwrap();
    assert!(workout.name.is_none());
    assert!(workout.start_date.is_none());
    assert_eq!(workout.elapsed_time_sec, Some(900));
}

#[tokio::test]
async fn test_empty_first_page_creates_empty_table() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    mount_token(&mock_server, "T").await;
    mount_page(&mock_server, 1, 200, json!([])).await;

    let config = test_config(&mock_server, &db);
    let stats = SyncEngine::new(&config).unwrap().run().await.unwrap();

    assert_eq!(stats.upserted, 0);
    assert_eq!(stats.fetch_calls, 1);
    assert_eq!(open_store(&db).count().unwrap(), 0);
}

#[tokio::test]
async fn test_token_failure_prevents_fetching() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(ACTIVITIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_a("Run A")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server, &db);
    let mut engine = SyncEngine::new(&config).unwrap();
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, StravaSyncError::TokenRefresh { status: 401, .. }));
    assert_eq!(engine.phase(), SyncPhase::Authenticating);
    assert!(!db.exists());
}

#[tokio::test]
async fn test_fetch_failure_keeps_committed_pages() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    mount_token(&mock_server, "T").await;
    mount_page(
        &mock_server,
        1,
        200,
        serde_json::from_str(include_str!("fixtures/activities_page1.json")).unwrap(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(ACTIVITIES_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server, &db);
    let mut engine = SyncEngine::new(&config).unwrap();
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, StravaSyncError::Api { status: 500, .. }));
    assert_eq!(engine.phase(), SyncPhase::FetchingPage(2));
    drop(engine);

    let store = open_store(&db);
    assert_eq!(store.count().unwrap(), 3);
}

#[tokio::test]
async fn test_page_delay_is_applied_between_pages() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db = db_path(&temp_dir);

    mount_token(&mock_server, "T").await;
    mount_page(&mock_server, 1, 200, run_a("Run A")).await;
    mount_page(&mock_server, 2, 200, json!([])).await;

    let config = test_config(&mock_server, &db).with_page_delay(Duration::from_millis(150));
    let stats = SyncEngine::new(&config).unwrap().run().await.unwrap();

    assert!(stats.elapsed >= Duration::from_millis(150));
}
