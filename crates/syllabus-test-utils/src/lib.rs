//! Shared test doubles for syllabus integration tests.
//!
//! - [`ScriptedModel`]: a [`TextModel`] that replays a fixed reply and
//!   records every prompt it was sent.
//! - [`StaticExtractor`]: a [`TextExtractor`] returning canned text.
//! - [`FixedWeather`]: a [`WeatherSource`] returning canned conditions.
//! - [`StubServer`]: a local HTTP server answering every request with one
//!   canned response, used in place of Gemini and Open-Meteo.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;

use syllabus_core::extract::{DocumentKind, ExtractError, TextExtractor};
use syllabus_core::greeting::{CurrentWeather, WeatherError, WeatherSource};
use syllabus_core::model::{ModelError, TextModel};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid study-plan reply wrapped in prose and a markdown fence, the way
/// models tend to answer.
pub const FENCED_PLAN_REPLY: &str = r#"Dear candidate, here is your plan:
```json
{
  "title": "Court Clerk 2025",
  "description": "Theory in the morning, exercises in the afternoon.",
  "schedule": [
    {"day": "Day 1", "subject": "Constitutional Law", "topic": "Fundamental rights", "method": "Theory", "durationMinutes": 90},
    {"day": "Day 1", "subject": "Portuguese", "topic": "Syntax", "method": "Exercises", "durationMinutes": 60},
    {"day": "Day 2", "subject": "Constitutional Law", "topic": "Fundamental rights", "method": "Review", "durationMinutes": 30}
  ]
}
```
Good luck!"#;

/// A valid quiz reply with no decoration.
pub const QUIZ_REPLY: &str = r#"{
  "topic": "Separation of powers",
  "questions": [
    {"statement": "Which branch makes laws?", "options": ["Executive", "Legislative", "Judiciary", "Ministry"], "correctAnswer": 1, "explanation": "The legislature legislates."},
    {"statement": "Which branch judges?", "options": ["Executive", "Legislative", "Judiciary", "Ministry"], "correctAnswer": 2, "explanation": "Courts judge."}
  ]
}"#;

/// Wrap `text` in a minimal Gemini `generateContent` response body.
pub fn gemini_reply_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// ScriptedModel
// ---------------------------------------------------------------------------

/// What a [`ScriptedModel`] answers with.
#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    RateLimited,
    EmptyReply,
    Status(u16, String),
}

/// A [`TextModel`] with a fixed answer that records prompts.
#[derive(Debug)]
pub struct ScriptedModel {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(Script::Reply(text.into()))
    }

    /// Every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// The most recent prompt. Panics if none was sent.
    pub fn last_prompt(&self) -> String {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no prompt was sent to the scripted model")
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::RateLimited => Err(ModelError::RateLimited),
            Script::EmptyReply => Err(ModelError::EmptyReply),
            Script::Status(status, body) => Err(ModelError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// StaticExtractor
// ---------------------------------------------------------------------------

/// A [`TextExtractor`] that ignores its input and returns canned text, or
/// fails as an encrypted PDF when built with [`StaticExtractor::encrypted`].
#[derive(Debug)]
pub struct StaticExtractor {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StaticExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn encrypted() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextExtractor for StaticExtractor {
    fn extract(&self, _bytes: &[u8], _kind: DocumentKind) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone().ok_or(ExtractError::Encrypted)
    }
}

// ---------------------------------------------------------------------------
// FixedWeather
// ---------------------------------------------------------------------------

/// A [`WeatherSource`] with canned conditions; `None` means "service down".
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub Option<CurrentWeather>);

#[async_trait]
impl WeatherSource for FixedWeather {
    async fn current(&self, _lat: f64, _lon: f64) -> Result<CurrentWeather, WeatherError> {
        self.0.ok_or(WeatherError::Status(503))
    }
}

// ---------------------------------------------------------------------------
// StubServer
// ---------------------------------------------------------------------------

/// One request as seen by a [`StubServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path plus query string, e.g. `/v1/forecast?latitude=1`.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: Arc<String>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A local HTTP server on an ephemeral port. Every request, on any path,
/// gets the same status and JSON body.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status: StatusCode::from_u16(status).expect("invalid status code"),
            body: Arc::new(body.into()),
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(record_and_reply).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub server");
        let addr = listener.local_addr().expect("no local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// A stub Gemini endpoint replying with `text` as the model output.
    /// The returned `base_url` already includes `/v1beta`.
    pub async fn gemini(text: &str) -> Self {
        let mut server = Self::start(200, gemini_reply_body(text)).await;
        server.base_url.push_str("/v1beta");
        server
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record_and_reply(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push(RecordedRequest {
        uri: uri.to_string(),
        headers,
        body: body.to_vec(),
    });
    (
        state.status,
        [("content-type", "application/json")],
        state.body.as_str().to_owned(),
    )
}
