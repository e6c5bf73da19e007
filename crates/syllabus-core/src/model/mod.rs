//! Generative model adapters.
//!
//! ```text
//! Generator / greeting
//!     |
//!     v
//! &dyn TextModel --generate(prompt)--> raw reply text
//!     |
//!     +-- GeminiClient (POST {base}/models/{model}:generateContent)
//! ```

pub mod gemini;
pub mod trait_def;

pub use gemini::{GeminiClient, GeminiConfig};
pub use trait_def::{ModelError, TextModel};
