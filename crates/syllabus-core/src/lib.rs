//! Core library for syllabus: turns exam syllabi into AI-generated study
//! plans and quizzes.
//!
//! - [`extract`] turns PDF / spreadsheet bytes into plain text.
//! - [`model`] abstracts the hosted generative model ([`model::TextModel`]).
//! - [`generate`] builds prompts, normalizes replies, parses them into
//!   [`types`], and wires it all together in [`generate::Generator`].
//! - [`greeting`] assembles the quote-and-weather banner.

pub mod extract;
pub mod generate;
pub mod greeting;
pub mod model;
pub mod types;

pub use extract::{DocumentExtractor, DocumentKind, ExtractError, TextExtractor};
pub use generate::{GENERATION_FAILED_MESSAGE, GenerationError, Generator};
pub use model::{GeminiClient, GeminiConfig, ModelError, TextModel};
pub use types::{CustomMethod, Difficulty, Quiz, QuizQuestion, StudyItem, StudyMethod, StudyPlan};
