//! End-to-end tests for the radarr-mcp server.
//!
//! These drive complete MCP sessions through the JSON-RPC layer: tool
//! registry, record pipeline and transports, against either a scripted
//! in-memory Radarr or a mock HTTP server behind the real client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use radarr_mcp_client::HttpRadarrClient;
use radarr_mcp_config::AppConfig;
use radarr_mcp_core::api::{Method, Query, RadarrApi};
use radarr_mcp_core::error::RemoteError;
use radarr_mcp_server::{JsonRpcResponse, McpServer};
use radarr_mcp_tools::default_registry;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Scripted Radarr ──────────────────────────────────────────────────────

const ORIGIN: &str = "http://radarr.local:7878";

/// Answers by `"METHOD path"`; anything unscripted is a 404.
struct ScriptedRadarr {
    routes: HashMap<String, Result<Value, RemoteError>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedRadarr {
    fn new() -> Self {
        Self {
            routes: HashMap::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    fn route(mut self, key: &str, response: Value) -> Self {
        self.routes.insert(key.to_string(), Ok(response));
        self
    }

    fn reject(mut self, key: &str, status: u16, body: Value) -> Self {
        self.routes.insert(key.to_string(), Err(RemoteError::Status { status, body }));
        self
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RadarrApi for ScriptedRadarr {
    fn origin(&self) -> &str {
        ORIGIN
    }

    async fn request(&self, path: &str, method: Method, _query: Query, _body: Option<Value>) -> Result<Value, RemoteError> {
        let key = format!("{method} {path}");
        self.log.lock().unwrap().push(key.clone());
        self.routes.get(&key).cloned().unwrap_or(Err(RemoteError::Status {
            status: 404,
            body: json!({"message": "NotFound"}),
        }))
    }
}

fn blade_runner() -> Value {
    json!({
        "id": 3,
        "title": "Blade Runner",
        "year": 1982,
        "tmdbId": 78,
        "status": "released",
        "genres": ["Science Fiction", "Drama"],
        "certification": "R",
        "monitored": true,
        "hasFile": true,
        "qualityProfileId": 1,
        "images": [{"coverType": "poster", "url": "/MediaCover/3/poster.jpg"}],
        "movieFile": {"size": 30000000000i64, "quality": {"quality": {"name": "Remux-1080p"}}},
        "sortTitle": "blade runner"
    })
}

fn arrival() -> Value {
    json!({
        "id": 4,
        "title": "Arrival",
        "year": 2016,
        "tmdbId": 329865,
        "status": "released",
        "genres": ["Drama", "Science Fiction"],
        "certification": "PG-13",
        "monitored": false,
        "hasFile": false,
        "qualityProfileId": 4
    })
}

fn scripted() -> ScriptedRadarr {
    ScriptedRadarr::new()
        .route("GET movie", json!([blade_runner(), arrival()]))
        .route("GET movie/lookup", json!([blade_runner(), {"title": "Blade Runner 2049", "year": 2017, "tmdbId": 335984, "monitored": false}]))
        .route("GET qualityprofile", json!([
            {"id": 1, "name": "Any", "items": [{"quality": {"name": "DVD"}, "allowed": true}]},
            {"id": 4, "name": "HD-1080p", "items": [{"quality": {"name": "Bluray-1080p"}, "allowed": true}]}
        ]))
}

// ── Session helpers ──────────────────────────────────────────────────────

struct Session {
    server: McpServer,
    next_id: i64,
}

impl Session {
    fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self {
            server: McpServer::new(Arc::new(default_registry(api))),
            next_id: 0,
        }
    }

    async fn request(&mut self, method: &str, params: Value) -> JsonRpcResponse {
        self.next_id += 1;
        let frame = json!({"jsonrpc": "2.0", "id": self.next_id, "method": method, "params": params});
        self.server.handle_frame(&frame.to_string()).await.unwrap()
    }

    /// Call a tool and return `(isError, payload)` where the payload is the
    /// text content parsed back into JSON.
    async fn call(&mut self, tool: &str, arguments: Value) -> (bool, Value) {
        let resp = self
            .request("tools/call", json!({"name": tool, "arguments": arguments}))
            .await;
        let result = resp.result.unwrap_or_else(|| panic!("{tool}: {:?}", resp.error));
        let text = result["content"][0]["text"].as_str().unwrap().to_string();
        let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (result["isError"].as_bool().unwrap(), payload)
    }
}

// ── Protocol ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn handshake_and_tool_listing() {
    let mut session = Session::new(Arc::new(scripted()));

    let init = session
        .request("initialize", json!({"protocolVersion": "2025-03-26", "capabilities": {}}))
        .await;
    assert_eq!(init.result.unwrap()["protocolVersion"], "2025-03-26");

    let initialized = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
    assert!(session.server.handle_frame(&initialized).await.is_none());

    let list = session.request("tools/list", json!({})).await.result.unwrap();
    let names: Vec<&str> = list["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "add_movie",
            "edit_movie",
            "get_quality_profiles",
            "lookup_movie",
            "movie_info",
            "movie_info_by_tmdb_id",
            "movie_list",
            "search_for_movie",
        ]
    );
    for tool in list["tools"].as_array().unwrap() {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn unknown_tool_is_protocol_error() {
    let mut session = Session::new(Arc::new(scripted()));
    let resp = session.request("tools/call", json!({"name": "delete_movie"})).await;
    assert_eq!(resp.error.unwrap().code, -32602);
}

// ── Read tools ───────────────────────────────────────────────────────────

#[tokio::test]
async fn lookup_marks_tracked_movies_and_absolutizes_images() {
    let mut session = Session::new(Arc::new(scripted()));
    let (is_error, movies) = session.call("lookup_movie", json!({"query": "Blade Runner"})).await;

    assert!(!is_error);
    assert_eq!(movies[0]["images"][0]["url"], "http://radarr.local:7878/MediaCover/3/poster.jpg");
    assert_eq!(
        movies[0]["radarr_status"],
        json!({"tracked": true, "monitored": true, "downloaded": true})
    );
    assert_eq!(
        movies[1]["radarr_status"],
        json!({"tracked": false, "monitored": false, "downloaded": false})
    );
    assert!(movies[0].get("sortTitle").is_none());
}

#[tokio::test]
async fn movie_list_is_minimal() {
    let mut session = Session::new(Arc::new(scripted()));
    let (_, movies) = session.call("movie_list", json!({})).await;
    assert_eq!(
        movies,
        json!([
            {"id": 3, "title": "Blade Runner", "year": 1982, "tmdbId": 78},
            {"id": 4, "title": "Arrival", "year": 2016, "tmdbId": 329865}
        ])
    );
}

#[tokio::test]
async fn movie_info_structured_and_not_found() {
    let mut session = Session::new(Arc::new(scripted()));

    let resp = session
        .request("tools/call", json!({"name": "movie_info", "arguments": {"title": "arrival"}}))
        .await;
    let result = resp.result.unwrap();
    assert_eq!(result["structuredContent"]["tmdbId"], 329865);
    assert_eq!(result["structuredContent"]["radarr_status"]["downloaded"], false);

    let (is_error, payload) = session.call("movie_info", json!({"title": "Dune"})).await;
    assert!(!is_error);
    assert_eq!(payload, Value::String("No movie titled 'Dune' in the Radarr library".into()));
}

#[tokio::test]
async fn search_combines_criteria_and_include_fields() {
    let mut session = Session::new(Arc::new(scripted()));
    let (is_error, movies) = session
        .call(
            "search_for_movie",
            json!({
                "criteria": {"genres": ["science fiction"], "year": {"lt": 2000}},
                "includeFields": ["movieFile.quality.quality.name"]
            }),
        )
        .await;
    assert!(!is_error);
    assert_eq!(
        movies,
        json!([{
            "id": 3, "title": "Blade Runner", "year": 1982, "tmdbId": 78,
            "movieFile": {"quality": {"quality": {"name": "Remux-1080p"}}}
        }])
    );

    let (is_error, message) = session.call("search_for_movie", json!({"criteria": {"rating": 5}})).await;
    assert!(is_error);
    assert!(message.as_str().unwrap().contains("rating"));
}

#[tokio::test]
async fn quality_profiles_summary() {
    let mut session = Session::new(Arc::new(scripted()));
    let (_, profiles) = session.call("get_quality_profiles", json!({})).await;
    assert_eq!(profiles[1], json!({"id": 4, "name": "HD-1080p", "allowedQualities": ["Bluray-1080p"]}));
}

// ── Write tools ──────────────────────────────────────────────────────────

#[tokio::test]
async fn add_movie_reports_radarr_rejection() {
    let api = Arc::new(
        scripted()
            .route("GET rootfolder", json!([{"path": "/films"}]))
            .route("GET movie/lookup/tmdb", json!({"title": "Blade Runner", "year": 1982, "tmdbId": 78}))
            .reject(
                "POST movie",
                400,
                json!([{"propertyName": "TmdbId", "errorMessage": "This movie has already been added"}]),
            ),
    );
    let mut session = Session::new(api.clone());
    let (is_error, content) = session
        .call("add_movie", json!({"tmdbId": 78, "qualityProfileId": 1}))
        .await;

    assert!(is_error);
    assert_eq!(content["error"], "This movie has already been added");
    assert_eq!(content["title"], "Blade Runner");
    assert_eq!(api.log(), ["GET rootfolder", "GET movie/lookup/tmdb", "POST movie"]);
}

#[tokio::test]
async fn edit_movie_validates_before_writing() {
    let api = Arc::new(
        scripted()
            .route("GET movie/3", blade_runner())
            .route("PUT movie/editor", json!([])),
    );
    let mut session = Session::new(api.clone());

    let (is_error, content) = session
        .call("edit_movie", json!({"edits": {"movieIds": [3], "qualityProfileId": 9}}))
        .await;
    assert!(is_error);
    assert_eq!(content["error"], "Invalid quality profile ID: 9");
    assert!(!api.log().iter().any(|r| r.starts_with("PUT")));

    let (is_error, content) = session
        .call("edit_movie", json!({"edits": {"movieIds": [3], "monitored": false}}))
        .await;
    assert!(!is_error);
    assert_eq!(
        content,
        json!({"movies": [{"id": 3, "title": "Blade Runner", "year": 1982, "tmdbId": 78, "monitored": false}]})
    );
}

// ── Real client over HTTP ────────────────────────────────────────────────

async fn mock_radarr() -> MockServer {
    let radarr = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/movie"))
        .and(query_param("tmdbId", "78"))
        .and(header("X-Api-Key", "e2e-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([blade_runner()])))
        .mount(&radarr)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/movie"))
        .and(query_param("tmdbId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&radarr)
        .await;
    radarr
}

fn client_from_config(radarr: &MockServer) -> (tempfile::TempDir, Arc<dyn RadarrApi>) {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(
        &file,
        format!("[radarr]\nurl = \"{}/\"\napi_key = \"e2e-key\"\ntimeout_secs = 5\n", radarr.uri()),
    )
    .unwrap();

    let config = AppConfig::load_from(&file).unwrap();
    config.validate().unwrap();
    let client = HttpRadarrClient::new(
        config.radarr_url().unwrap(),
        config.radarr_api_key().unwrap(),
        Duration::from_secs(config.radarr.timeout_secs),
    )
    .unwrap();
    (dir, Arc::new(client))
}

#[tokio::test]
async fn http_transport_against_mock_radarr() {
    let radarr = mock_radarr().await;
    let (_dir, api) = client_from_config(&radarr);
    let app = radarr_mcp_server::router(McpServer::new(Arc::new(default_registry(api))));

    let frame = json!({
        "jsonrpc": "2.0", "id": 1, "method": "tools/call",
        "params": {"name": "movie_info_by_tmdb_id", "arguments": {"tmdbId": 78}}
    });
    let req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(frame.to_string()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let movie = &body["result"]["structuredContent"];
    assert_eq!(movie["title"], "Blade Runner");
    assert_eq!(movie["images"][0]["url"], format!("{}/MediaCover/3/poster.jpg", radarr.uri()));
    assert_eq!(movie["movieFile"]["size"], 30000000000i64);
}

#[tokio::test]
async fn real_client_not_found_is_null_result() {
    let radarr = mock_radarr().await;
    let (_dir, api) = client_from_config(&radarr);
    let mut session = Session::new(api);

    let resp = session
        .request("tools/call", json!({"name": "movie_info_by_tmdb_id", "arguments": {"tmdbId": 1}}))
        .await;
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], false);
    assert!(result.get("structuredContent").is_none());
}
