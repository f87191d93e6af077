//! Scripted Radarr API for tool tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use radarr_mcp_core::api::{Method, Query, RadarrApi};
use radarr_mcp_core::error::RemoteError;
use serde_json::{Value, json};

pub(crate) const ORIGIN: &str = "http://radarr.test:7878";

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Query,
    pub body: Option<Value>,
}

/// Answers requests from a `(method, path)` table; the query string is
/// recorded but not part of the key. Unscripted routes answer 404.
pub(crate) struct ScriptedRadarr {
    routes: Mutex<HashMap<(Method, String), Result<Value, RemoteError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedRadarr {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on(self, method: Method, path: &str, response: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(response));
        self
    }

    pub fn get(self, path: &str, response: Value) -> Self {
        self.on(Method::Get, path, response)
    }

    pub fn fail(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Err(RemoteError::Status { status, body }));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

#[async_trait]
impl RadarrApi for ScriptedRadarr {
    fn origin(&self) -> &str {
        ORIGIN
    }

    async fn request(
        &self,
        path: &str,
        method: Method,
        query: Query,
        body: Option<Value>,
    ) -> Result<Value, RemoteError> {
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: path.to_string(),
            query,
            body,
        });
        self.routes
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or_else(|| {
                Err(RemoteError::Status {
                    status: 404,
                    body: json!({"message": "NotFound"}),
                })
            })
    }
}

/// A library movie with a downloaded file.
pub(crate) fn inception() -> Value {
    json!({
        "id": 12,
        "title": "Inception",
        "originalTitle": "Inception",
        "sortTitle": "inception",
        "year": 2010,
        "status": "released",
        "overview": "A thief who steals corporate secrets through dream-sharing technology.",
        "inCinemas": "2010-07-15T00:00:00Z",
        "studio": "Legendary Pictures",
        "runtime": 148,
        "genres": ["Action", "Science Fiction", "Adventure"],
        "tags": [3],
        "imdbId": "tt1375666",
        "tmdbId": 27205,
        "certification": "PG-13",
        "hasFile": true,
        "path": "/movies/Inception (2010)",
        "folderName": "/movies/Inception (2010)",
        "monitored": true,
        "qualityProfileId": 4,
        "minimumAvailability": "released",
        "added": "2021-03-01T10:00:00Z",
        "originalLanguage": {"id": 1, "name": "English"},
        "alternateTitles": [
            {"sourceType": "tmdb", "movieMetadataId": 5, "title": "El origen", "id": 44}
        ],
        "ratings": {
            "imdb": {"votes": 2600000, "value": 8.8, "type": "user"},
            "tmdb": {"votes": 36000, "value": 8.4, "type": "user"}
        },
        "images": [
            {"coverType": "poster", "url": "/MediaCover/12/poster.jpg", "remoteUrl": "https://image.tmdb.org/p.jpg"},
            {"coverType": "fanart", "url": "/MediaCover/12/fanart.jpg", "remoteUrl": "https://image.tmdb.org/f.jpg"}
        ],
        "movieFile": {
            "id": 90,
            "movieId": 12,
            "relativePath": "Inception (2010).mkv",
            "size": 12884901888i64,
            "dateAdded": "2021-03-02T10:00:00Z",
            "quality": {"quality": {"id": 7, "name": "Bluray-1080p", "source": "bluray", "resolution": 1080}, "revision": {"version": 1}},
            "languages": [{"id": 1, "name": "English"}],
            "mediaInfo": {"audioChannels": 5.1, "audioCodec": "DTS", "videoCodec": "x264", "videoDynamicRange": "", "subtitles": "English", "resolution": "1920x800", "runTime": "2:28:00"}
        },
        "popularity": 91.5
    })
}

/// A lookup result for a movie that is not in the library.
pub(crate) fn mac_and_me() -> Value {
    json!({
        "title": "Mac and Me",
        "year": 1988,
        "tmdbId": 13766,
        "genres": ["Family", "Science Fiction"],
        "monitored": false,
        "ratings": {"imdb": {"votes": 9000, "value": 3.5, "type": "user"}},
        "images": [{"coverType": "poster", "url": "/MediaCoverProxy/abc/poster.jpg", "remoteUrl": "https://image.tmdb.org/m.jpg"}],
        "folderName": "Mac and Me (1988)"
    })
}

pub(crate) fn matrix(id: i64, title: &str, year: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "year": year,
        "tmdbId": 600 + id,
        "genres": ["Action", "Science Fiction"],
        "certification": "R",
        "status": "released",
        "monitored": true,
        "qualityProfileId": 1
    })
}
