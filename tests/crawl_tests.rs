//! End-to-end crawl tests
//!
//! These tests run the full engine against a wiremock server standing in
//! for the remote match API, with the file output handler writing into a
//! scratch directory.

use rifthop::config::Config;
use rifthop::filter::{build_filters, CrawlFilters};
use rifthop::model::Region;
use rifthop::output::{FileOutputHandler, OutputHandler};
use rifthop::source::{build_http_client, HttpRemoteSource, RemoteError, RemoteSource};
use rifthop::{CrawlEngine, CrawlState};
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn player_json(id: &str, level: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": id,
        "region": "euw",
        "level": level
    })
}

fn match_json(game_id: u64, duration_secs: u64, participant_ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "game_id": game_id,
        "queue": 420,
        "duration_secs": duration_secs,
        "participants": participant_ids
            .iter()
            .map(|id| serde_json::json!({ "player_id": id, "region": "euw" }))
            .collect::<Vec<_>>()
    })
}

async fn mount_player(server: &MockServer, id: &str, level: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/players/euw/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(id, level)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/players/by-name/euw/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(id, level)))
        .mount(server)
        .await;
}

async fn mount_batch(server: &MockServer, id: &str, matches: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/players/euw/{}/matches", id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "matches": matches })),
        )
        .mount(server)
        .await;
}

fn source_for(server: &MockServer) -> Arc<dyn RemoteSource> {
    Arc::new(HttpRemoteSource::new(
        build_http_client().unwrap(),
        Url::parse(&server.uri()).unwrap(),
        "test-key".to_string(),
    ))
}

/// Config with the level-30 player preset and 20-minute match preset.
fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.max_matches = 5;
    config.filters.min_match_duration_secs = Some(20 * 60);
    config.filters.min_level = Some(30);
    config
}

#[tokio::test]
async fn test_rejected_seed_fetches_no_batches() {
    let server = MockServer::start().await;
    mount_player(&server, "lowbie", 25).await;

    // No batch endpoint mounted: fetching one would 404 and fail the test
    // through the asserts below.
    let config = test_config();
    let engine = CrawlEngine::new(
        source_for(&server),
        &config,
        build_filters(&config),
        Arc::new(NullOutput),
    )
    .unwrap();

    let started = engine.run("lowbie", Region::Euw).await.unwrap();

    assert!(!started);
    assert_eq!(engine.state(), CrawlState::Idle);
    assert!(engine.history().is_empty());
}

struct NullOutput;

impl OutputHandler for NullOutput {
    fn handle(&self, _m: &rifthop::model::Match) -> rifthop::output::OutputResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_single_player_dead_end_writes_matches_and_halts() {
    let server = MockServer::start().await;
    mount_player(&server, "seed", 35).await;
    mount_player(&server, "lowbie", 10).await;
    mount_batch(
        &server,
        "seed",
        vec![
            match_json(1, 25 * 60, &["seed", "lowbie"]),
            match_json(2, 10 * 60, &["seed", "lowbie"]),
            match_json(3, 15 * 60, &["seed", "lowbie"]),
        ],
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = test_config();
    let engine = CrawlEngine::new(
        source_for(&server),
        &config,
        build_filters(&config),
        Arc::new(FileOutputHandler::new(out_dir.path()).unwrap()),
    )
    .unwrap();

    assert!(engine.run("seed", Region::Euw).await.unwrap());
    engine.wait().await;

    assert_eq!(engine.state(), CrawlState::Idle);
    assert!(engine.last_error().is_none());

    // All three matches were written, regardless of the match filter: the
    // output pipeline sees the whole batch, the filter only guards hops.
    for game_id in [1, 2, 3] {
        let file = out_dir.path().join(format!("results/{}.json", game_id));
        assert!(file.exists(), "missing {}", file.display());
    }

    // The lone visited entry was consumed by the final backtrack.
    assert!(engine.history().is_empty());
}

#[tokio::test]
async fn test_two_hop_crawl_halts_on_remote_failure() {
    let server = MockServer::start().await;
    mount_player(&server, "seed", 35).await;
    mount_player(&server, "friend", 40).await;
    mount_batch(
        &server,
        "seed",
        vec![match_json(1, 30 * 60, &["seed", "friend"])],
    )
    .await;
    // No batch mounted for "friend": the hop's fetch gets a 404, which is
    // fatal to the run.

    let out_dir = TempDir::new().unwrap();
    let config = test_config();
    let engine = CrawlEngine::new(
        source_for(&server),
        &config,
        build_filters(&config),
        Arc::new(FileOutputHandler::new(out_dir.path()).unwrap()),
    )
    .unwrap();

    assert!(engine.run("seed", Region::Euw).await.unwrap());
    engine.wait().await;

    assert_eq!(engine.state(), CrawlState::Idle);
    assert!(matches!(
        engine.last_error(),
        Some(RemoteError::NotFound(_))
    ));

    // The seed was visited and emitted before the failing hop.
    assert!(out_dir.path().join("results/1.json").exists());
    assert!(engine
        .history()
        .contains(&rifthop::model::PlayerKey {
            id: "seed".to_string(),
            region: Region::Euw,
        }));
}

#[tokio::test]
async fn test_runtime_filter_swap_applies_next_iteration() {
    let server = MockServer::start().await;
    mount_player(&server, "seed", 35).await;
    mount_batch(&server, "seed", vec![match_json(1, 30 * 60, &["seed"])]).await;

    let config = test_config();
    let engine = CrawlEngine::new(
        source_for(&server),
        &config,
        CrawlFilters::allow_all(),
        Arc::new(NullOutput),
    )
    .unwrap();

    // Swapping filters before the run changes which seed is acceptable.
    engine.set_filters(build_filters(&config));

    // Still accepted: seed is level 35 against the min-level-30 preset.
    assert!(engine.run("seed", Region::Euw).await.unwrap());
    engine.wait().await;
    assert_eq!(engine.state(), CrawlState::Idle);
}
