use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use syllabus_core::greeting::{DashboardMetadata, WeatherSource, dashboard_metadata};
use syllabus_core::{Difficulty, DocumentKind, GenerationError, Generator, Quiz, StudyPlan};

/// Upload ceiling for syllabus documents.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    /// Log the full cause chain; the client only gets the fixed message.
    pub fn generation(err: GenerationError) -> Self {
        let cause = std::error::Error::source(&err)
            .map(ToString::to_string)
            .unwrap_or_default();
        tracing::error!(stage = %err.stage(), %cause, "generation failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and request types
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub generator: Generator,
    pub weather: Arc<dyn WeatherSource>,
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub content: String,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GreetingQuery {
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/quizzes", post(generate_quiz))
        .route("/api/greeting", get(greeting))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("syllabus serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("syllabus serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate_plan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<StudyPlan>, AppError> {
    let mut file: Option<(Vec<u8>, Option<String>)> = None;
    let mut preferences: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(e.body_text()))?;
                file = Some((data.to_vec(), content_type));
            }
            Some("preferences") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(e.body_text()))?;
                preferences = Some(text);
            }
            _ => {}
        }
    }

    let (bytes, content_type) = file.ok_or_else(|| AppError::bad_request("No file uploaded"))?;
    let kind = content_type
        .as_deref()
        .and_then(DocumentKind::from_mime)
        .ok_or_else(|| {
            AppError::bad_request("Invalid file type. Upload a PDF or an Excel (.xlsx) spreadsheet.")
        })?;

    let plan = state
        .generator
        .generate_study_plan(bytes, kind, preferences.as_deref())
        .await
        .map_err(AppError::generation)?;
    Ok(Json(plan))
}

async fn generate_quiz(
    State(state): State<AppState>,
    Json(request): Json<QuizRequest>,
) -> Result<Json<Quiz>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::bad_request("content must not be empty"));
    }
    let difficulty = match request.difficulty.as_deref() {
        Some(d) => d
            .parse::<Difficulty>()
            .map_err(|e| AppError::bad_request(e.to_string()))?,
        None => Difficulty::default(),
    };

    let quiz = state
        .generator
        .generate_quiz_from_content(&request.content, difficulty)
        .await
        .map_err(AppError::generation)?;
    Ok(Json(quiz))
}

async fn greeting(
    State(state): State<AppState>,
    Query(query): Query<GreetingQuery>,
) -> Json<DashboardMetadata> {
    let model = state.generator.model();
    Json(dashboard_metadata(model.as_ref(), state.weather.as_ref(), query.lat, query.lon).await)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use syllabus_core::GENERATION_FAILED_MESSAGE;
    use syllabus_core::extract::{PDF_MIME, SPREADSHEET_MIME};
    use syllabus_core::greeting::{CurrentWeather, FALLBACK_QUOTE};
    use syllabus_test_utils::{
        FENCED_PLAN_REPLY, FixedWeather, QUIZ_REPLY, Script, ScriptedModel, StaticExtractor,
    };

    use super::*;

    const BOUNDARY: &str = "syllabus-test-boundary";

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn state_with(model: ScriptedModel, extractor: StaticExtractor) -> AppState {
        AppState {
            generator: Generator::new(Arc::new(model), Arc::new(extractor)),
            weather: Arc::new(FixedWeather(Some(CurrentWeather {
                temperature: 22.0,
                condition_code: 2,
                is_day: true,
            }))),
        }
    }

    fn default_state(reply: &str) -> AppState {
        state_with(
            ScriptedModel::replying(reply),
            StaticExtractor::new("--- Page 1 ---\nAdministrative Law"),
        )
    }

    /// Build a multipart body. Each part is (name, optional content type, data).
    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, content_type, data) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match content_type {
                Some(ct) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {ct}\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(data);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    async fn post_multipart(state: AppState, body: String) -> axum::response::Response {
        build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate-plan")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_json(
        state: AppState,
        uri: &str,
        json: serde_json::Value,
    ) -> axum::response::Response {
        build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // POST /api/generate-plan
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_generate_plan_from_pdf() {
        let body = multipart_body(&[
            ("file", Some(PDF_MIME), "%PDF-1.5 fake"),
            ("preferences", None, "Weekends only"),
        ]);
        let resp = post_multipart(default_state(FENCED_PLAN_REPLY), body).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["title"], "Court Clerk 2025");
        assert_eq!(json["schedule"][0]["durationMinutes"], 90);
        assert_eq!(json["schedule"][0]["method"], "Theory");
    }

    #[tokio::test]
    async fn test_generate_plan_passes_preferences_to_the_model() {
        let model = Arc::new(ScriptedModel::replying(FENCED_PLAN_REPLY));
        let state = AppState {
            generator: Generator::new(model.clone(), Arc::new(StaticExtractor::new("text"))),
            weather: Arc::new(FixedWeather(None)),
        };
        let body = multipart_body(&[
            ("preferences", None, "Mornings, 2 hours"),
            ("file", Some(SPREADSHEET_MIME), "PK fake"),
        ]);
        let resp = post_multipart(state, body).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(model.last_prompt().contains("Mornings, 2 hours"));
    }

    #[tokio::test]
    async fn test_generate_plan_without_file() {
        let body = multipart_body(&[("preferences", None, "anything")]);
        let resp = post_multipart(default_state(FENCED_PLAN_REPLY), body).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_generate_plan_rejects_other_mime_types() {
        let body = multipart_body(&[("file", Some("text/plain"), "hello")]);
        let resp = post_multipart(default_state(FENCED_PLAN_REPLY), body).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().starts_with("Invalid file type"));
    }

    #[tokio::test]
    async fn test_generate_plan_hides_internal_errors() {
        let state = state_with(
            ScriptedModel::replying("I refuse to answer in JSON."),
            StaticExtractor::new("text"),
        );
        let body = multipart_body(&[("file", Some(PDF_MIME), "%PDF")]);
        let resp = post_multipart(state, body).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_generate_plan_extraction_failure_is_500() {
        let state = state_with(
            ScriptedModel::replying(FENCED_PLAN_REPLY),
            StaticExtractor::encrypted(),
        );
        let body = multipart_body(&[("file", Some(PDF_MIME), "%PDF")]);
        let resp = post_multipart(state, body).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], GENERATION_FAILED_MESSAGE);
    }

    // -----------------------------------------------------------------------
    // POST /api/quizzes
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_generate_quiz() {
        let resp = post_json(
            default_state(QUIZ_REPLY),
            "/api/quizzes",
            serde_json::json!({ "content": "Separation of powers", "difficulty": "hard" }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["topic"], "Separation of powers");
        assert_eq!(json["questions"][1]["correctAnswer"], 2);
    }

    #[tokio::test]
    async fn test_generate_quiz_defaults_difficulty() {
        let model = Arc::new(ScriptedModel::replying(QUIZ_REPLY));
        let state = AppState {
            generator: Generator::new(model.clone(), Arc::new(StaticExtractor::new(""))),
            weather: Arc::new(FixedWeather(None)),
        };
        let resp = post_json(state, "/api/quizzes", serde_json::json!({ "content": "x" })).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(model.last_prompt().contains("Difficulty: medium"));
    }

    #[tokio::test]
    async fn test_generate_quiz_rejects_bad_input() {
        let resp = post_json(
            default_state(QUIZ_REPLY),
            "/api/quizzes",
            serde_json::json!({ "content": "   " }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = post_json(
            default_state(QUIZ_REPLY),
            "/api/quizzes",
            serde_json::json!({ "content": "x", "difficulty": "brutal" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("invalid difficulty"));
    }

    #[tokio::test]
    async fn test_generate_quiz_model_failure_is_500() {
        let state = state_with(ScriptedModel::new(Script::RateLimited), StaticExtractor::new(""));
        let resp = post_json(state, "/api/quizzes", serde_json::json!({ "content": "x" })).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], GENERATION_FAILED_MESSAGE);
    }

    // -----------------------------------------------------------------------
    // GET /api/greeting
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_greeting() {
        let resp = build_router(default_state("Stay the course."))
            .oneshot(
                Request::builder()
                    .uri("/api/greeting?lat=-23.55&lon=-46.63")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["quote"], "Stay the course.");
        assert_eq!(json["weather"]["temperature"], 22.0);
        assert_eq!(json["weather"]["conditionCode"], 2);
        assert_eq!(json["weather"]["isDay"], true);
    }

    #[tokio::test]
    async fn test_greeting_falls_back() {
        let state = AppState {
            generator: Generator::new(
                Arc::new(ScriptedModel::new(Script::EmptyReply)),
                Arc::new(StaticExtractor::new("")),
            ),
            weather: Arc::new(FixedWeather(None)),
        };
        let resp = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/greeting?lat=0&lon=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["quote"], FALLBACK_QUOTE);
        assert_eq!(json["weather"]["temperature"], 25.0);
    }
}
