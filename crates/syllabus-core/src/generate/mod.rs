//! The generation pipeline: document → text → prompt → model → JSON → domain.
//!
//! ```text
//! bytes --extract (blocking pool)--> text
//!       --build_*_prompt-----------> prompt
//!       --TextModel::generate------> raw reply
//!       --normalize_response-------> candidate
//!       --parse_response-----------> StudyPlan | Quiz
//! ```
//!
//! Each call is independent; the [`Generator`] holds only shared,
//! immutable collaborators.

pub mod normalize;
pub mod parser;
pub mod prompt;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::extract::{DocumentKind, ExtractError, TextExtractor};
use crate::model::{ModelError, TextModel};
use crate::types::{Difficulty, Quiz, StudyPlan};

pub use normalize::{normalize_response, strip_fences};
pub use parser::{
    GeneratedContent, ResponseParseError, ResponseSchema, ResponseShape, parse_as, parse_response,
};
pub use prompt::{build_plan_prompt, build_quiz_prompt};

/// The only message a caller ever sees when generation fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate content with AI";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Pipeline stage at which a generation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracting,
    AwaitingModel,
    Parsing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracting => f.write_str("extracting"),
            Self::AwaitingModel => f.write_str("awaiting_model"),
            Self::Parsing => f.write_str("parsing"),
        }
    }
}

/// A failed generation.
///
/// `Display` is always [`GENERATION_FAILED_MESSAGE`]; the internal cause is
/// reachable through `source()` for logging.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    Extraction(#[source] ExtractError),

    #[error("{}", GENERATION_FAILED_MESSAGE)]
    Model(#[source] ModelError),

    #[error("{}", GENERATION_FAILED_MESSAGE)]
    InvalidResponse(#[source] ResponseParseError),
}

impl GenerationError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Extraction(_) => Stage::Extracting,
            Self::Model(_) => Stage::AwaitingModel,
            Self::InvalidResponse(_) => Stage::Parsing,
        }
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Runs the extraction → model → parsing pipeline.
#[derive(Clone)]
pub struct Generator {
    model: Arc<dyn TextModel>,
    extractor: Arc<dyn TextExtractor>,
}

impl Generator {
    pub fn new(model: Arc<dyn TextModel>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { model, extractor }
    }

    pub fn model(&self) -> &Arc<dyn TextModel> {
        &self.model
    }

    /// Generate a study plan from an uploaded syllabus document.
    pub async fn generate_study_plan(
        &self,
        bytes: Vec<u8>,
        kind: DocumentKind,
        preferences: Option<&str>,
    ) -> Result<StudyPlan, GenerationError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("generate_study_plan", %request_id, %kind, model = self.model.name());

        async {
            info!(bytes = bytes.len(), "extracting document text");
            let text = self.extract(bytes, kind).await?;
            debug!(chars = text.chars().count(), "document text extracted");

            let prompt = build_plan_prompt(preferences, &text);
            self.complete::<StudyPlan>(&prompt).await
        }
        .instrument(span)
        .await
    }

    /// Generate a multiple-choice quiz from study content.
    pub async fn generate_quiz_from_content(
        &self,
        content: &str,
        difficulty: Difficulty,
    ) -> Result<Quiz, GenerationError> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "generate_quiz",
            %request_id,
            %difficulty,
            model = self.model.name()
        );

        async {
            let prompt = build_quiz_prompt(content, difficulty);
            self.complete::<Quiz>(&prompt).await
        }
        .instrument(span)
        .await
    }

    async fn extract(&self, bytes: Vec<u8>, kind: DocumentKind) -> Result<String, GenerationError> {
        let extractor = Arc::clone(&self.extractor);
        let result = tokio::task::spawn_blocking(move || extractor.extract(&bytes, kind))
            .await
            .map_err(|e| ExtractError::Worker(e.to_string()))
            .and_then(|r| r);

        result.map_err(|e| {
            warn!(error = %e, "text extraction failed");
            GenerationError::Extraction(e)
        })
    }

    /// Send `prompt`, normalize the reply, parse it as `T`.
    async fn complete<T: ResponseSchema>(&self, prompt: &str) -> Result<T, GenerationError> {
        let raw = self.model.generate(prompt).await.map_err(|e| {
            warn!(error = %e, "model call failed");
            GenerationError::Model(e)
        })?;

        let candidate = normalize_response(&raw);
        match parse_response::<T>(&candidate) {
            Ok(value) => {
                info!(shape = %T::SHAPE, "generation succeeded");
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, raw_reply = %raw, "model reply rejected");
                Err(GenerationError::InvalidResponse(e))
            }
        }
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("model", &self.model.name())
            .finish_non_exhaustive()
    }
}
