//! The `TextModel` trait -- the adapter interface for hosted generative models.
//!
//! The generation pipeline and the greeting banner only talk to a model
//! through this trait, so tests can substitute a scripted reply and a
//! different provider can be plugged in without touching prompts or
//! parsing.

use async_trait::async_trait;
use thiserror::Error;

/// Failures talking to a generative model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no API key configured for the model")]
    MissingApiKey,

    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model rate limit exceeded")]
    RateLimited,

    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model blocked the request: {reason}")]
    Blocked { reason: String },

    #[error("model returned an empty reply")]
    EmptyReply,

    #[error("could not decode model reply: {0}")]
    Decode(String),
}

/// A text-in, text-out generative model.
///
/// One call is one request and one reply: no retries, no streaming.
/// Implementations must be shareable across tasks (`Arc<dyn TextModel>`).
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Identifier of the underlying model (e.g. "gemini-2.5-flash").
    fn name(&self) -> &str;

    /// Send `prompt` and return the model's raw reply text.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

// Compile-time assertion: TextModel must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextModel) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the prompt back, used only to prove the trait can be
    /// implemented and used as `dyn TextModel`.
    struct EchoModel;

    #[async_trait]
    impl TextModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            if prompt.is_empty() {
                return Err(ModelError::EmptyReply);
            }
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn text_model_is_object_safe() {
        let model: Box<dyn TextModel> = Box::new(EchoModel);
        assert_eq!(model.name(), "echo");
        assert_eq!(model.generate("hello").await.unwrap(), "hello");
        assert!(matches!(
            model.generate("").await,
            Err(ModelError::EmptyReply)
        ));
    }

    #[test]
    fn error_messages() {
        let err = ModelError::Status {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "model returned HTTP 503: overloaded");

        let err = ModelError::Blocked {
            reason: "SAFETY".to_string(),
        };
        assert_eq!(err.to_string(), "model blocked the request: SAFETY");
        assert_eq!(ModelError::RateLimited.to_string(), "model rate limit exceeded");
    }
}
