//! Integration tests for the HTTP remote source
//!
//! These tests use wiremock to stand in for the remote match API and
//! exercise response decoding, error classification and the throttled
//! retry path end-to-end.

use rifthop::model::Region;
use rifthop::source::{
    build_http_client, HttpRemoteSource, RemoteError, RemoteSource, ThrottledSource,
};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> HttpRemoteSource {
    HttpRemoteSource::new(
        build_http_client().unwrap(),
        Url::parse(&server.uri()).unwrap(),
        "test-key".to_string(),
    )
}

fn player_json(id: &str, level: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": id,
        "region": "euw",
        "level": level,
        "rank": "gold"
    })
}

#[tokio::test]
async fn test_player_by_name_decodes_and_sends_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/players/by-name/euw/pff"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json("abc", 42)))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server);
    let player = source.player_by_name("pff", Region::Euw).await.unwrap();

    assert_eq!(player.id, "abc");
    assert_eq!(player.level, 42);
    assert_eq!(player.region, Region::Euw);
}

#[tokio::test]
async fn test_match_batch_decodes_in_order() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "matches": [
            {
                "game_id": 11,
                "queue": 420,
                "duration_secs": 1800,
                "participants": [
                    { "player_id": "abc", "region": "euw" },
                    { "player_id": "def", "region": "euw" }
                ]
            },
            {
                "game_id": 12,
                "queue": 440,
                "duration_secs": 900,
                "participants": []
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/players/euw/abc/matches"))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server);
    let player = rifthop::model::Player {
        id: "abc".to_string(),
        name: "pff".to_string(),
        region: Region::Euw,
        level: 42,
        rank: None,
    };

    let batch = source.match_batch(&player, 5).await.unwrap();

    let ids: Vec<u64> = batch.iter().map(|m| m.game_id).collect();
    assert_eq!(ids, vec![11, 12]);
    assert_eq!(batch.matches()[0].participants.len(), 2);
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let result = source.player_by_name("ghost", Region::Euw).await;

    assert!(matches!(result, Err(RemoteError::NotFound(_))));
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let result = source.player_by_name("pff", Region::Euw).await;

    assert!(matches!(
        result,
        Err(RemoteError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_bad_body_maps_to_decode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let result = source.player_by_name("pff", Region::Euw).await;

    assert!(matches!(result, Err(RemoteError::Decode { .. })));
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let result = source.player_by_name("pff", Region::Euw).await;

    match result {
        Err(RemoteError::RateLimited { retry_after }) => {
            assert_eq!(retry_after.as_secs(), 7);
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn test_throttled_source_retries_once_after_429() {
    let server = MockServer::start().await;

    // First request is rate limited with a zero-second window, the retry
    // succeeds. Mount order matters: the 429 mock is consumed first.
    Mock::given(method("GET"))
        .and(path("/players/by-name/euw/pff"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/players/by-name/euw/pff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json("abc", 42)))
        .expect(1)
        .mount(&server)
        .await;

    let source = ThrottledSource::new(source_for(&server));
    let player = source.player_by_name("pff", Region::Euw).await.unwrap();

    assert_eq!(player.id, "abc");
}

#[tokio::test]
async fn test_throttled_source_gives_up_after_second_429() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(2)
        .mount(&server)
        .await;

    let source = ThrottledSource::new(source_for(&server));
    let result = source.player_by_name("pff", Region::Euw).await;

    assert!(matches!(result, Err(RemoteError::RateLimited { .. })));
}
