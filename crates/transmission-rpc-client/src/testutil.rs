//! Shared test utilities and fixtures.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderValue},
};
use serde_json::{Value, json};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    subscriber::DefaultGuard,
};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};

use crate::client::SESSION_ID;
use crate::transport::{HttpResponse, TransportError};

pub(crate) const SESSION: &str = "abc123";

pub(crate) fn ok(body: Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(
        StatusCode::OK,
        HeaderMap::new(),
        body.to_string(),
    ))
}

pub(crate) fn success(arguments: Value) -> Result<HttpResponse, TransportError> {
    ok(json!({"result": "success", "arguments": arguments}))
}

pub(crate) fn conflict(session_id: Option<&'static str>) -> Result<HttpResponse, TransportError> {
    let mut headers = HeaderMap::new();
    if let Some(session_id) = session_id {
        headers.insert(SESSION_ID, HeaderValue::from_static(session_id));
    }
    Err(TransportError::Client(HttpResponse::new(
        StatusCode::CONFLICT,
        headers,
        "<h1>409: Conflict</h1>",
    )))
}

pub(crate) fn make_session_stats() -> Value {
    json!({
        "activeTorrentCount": 2,
        "downloadSpeed": 1024,
        "pausedTorrentCount": 1,
        "torrentCount": 3,
        "uploadSpeed": 512,
        "cumulative-stats": {
            "uploadedBytes": 1000,
            "downloadedBytes": 2000,
            "filesAdded": 3,
            "sessionCount": 4,
            "secondsActive": 5000
        },
        "current-stats": {
            "uploadedBytes": 100,
            "downloadedBytes": 200,
            "filesAdded": 1,
            "sessionCount": 1,
            "secondsActive": 500
        }
    })
}

pub(crate) fn make_torrent(id: u64, name: &str, hash: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "hashString": hash,
        "status": 4,
        "percentDone": 0.5,
        "totalSize": 1000,
        "downloadDir": "/downloads"
    })
}

/// Records the level, message and other fields of every event emitted while installed.
#[derive(Clone, Default)]
pub(crate) struct CapturedEvents(Arc<Mutex<Vec<CapturedEvent>>>);

#[derive(Default)]
struct CapturedEvent {
    level: Option<Level>,
    message: String,
    fields: String,
}

impl CapturedEvents {
    /// Installs the capture as the default subscriber of the current thread.
    pub(crate) fn install() -> (Self, DefaultGuard) {
        let events = Self::default();
        let guard = tracing::subscriber::set_default(registry().with(events.clone()));
        (events, guard)
    }

    pub(crate) fn contains(&self, level: Level, message: &str) -> bool {
        self.0
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.level == Some(level) && e.message == message)
    }

    /// Whether any event at `level` carries `needle` in its message or fields.
    pub(crate) fn mentions(&self, level: Level, needle: &str) -> bool {
        self.0.lock().unwrap().iter().any(|e| {
            e.level == Some(level) && (e.message.contains(needle) || e.fields.contains(needle))
        })
    }
}

impl Visit for CapturedEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push_str(&format!("{}={value:?} ", field.name()));
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent {
            level: Some(*event.metadata().level()),
            ..Default::default()
        };
        event.record(&mut captured);
        self.0.lock().unwrap().push(captured);
    }
}
