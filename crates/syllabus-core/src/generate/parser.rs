//! Strict parsing of a normalized JSON candidate into a domain object.
//!
//! Validation is structural only: required fields present, no unknown
//! fields, correct JSON types. Value ranges (durations, answer indices) are
//! not checked.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use thiserror::Error;

use crate::types::{Quiz, StudyPlan};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which schema a candidate is expected to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    StudyPlan,
    Quiz,
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StudyPlan => f.write_str("plan"),
            Self::Quiz => f.write_str("quiz"),
        }
    }
}

impl FromStr for ResponseShape {
    type Err = ResponseShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plan" | "study_plan" | "study-plan" => Ok(Self::StudyPlan),
            "quiz" => Ok(Self::Quiz),
            _ => Err(ResponseShapeParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ResponseShape`] string.
#[derive(Debug, Clone)]
pub struct ResponseShapeParseError(pub String);

impl fmt::Display for ResponseShapeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid shape: {:?} (expected plan or quiz)", self.0)
    }
}

impl std::error::Error for ResponseShapeParseError {}

/// A domain type the model can be asked to produce.
pub trait ResponseSchema: DeserializeOwned {
    const SHAPE: ResponseShape;
}

impl ResponseSchema for StudyPlan {
    const SHAPE: ResponseShape = ResponseShape::StudyPlan;
}

impl ResponseSchema for Quiz {
    const SHAPE: ResponseShape = ResponseShape::Quiz;
}

/// A parsed candidate of either shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedContent {
    StudyPlan(StudyPlan),
    Quiz(Quiz),
}

impl GeneratedContent {
    pub fn shape(&self) -> ResponseShape {
        match self {
            Self::StudyPlan(_) => ResponseShape::StudyPlan,
            Self::Quiz(_) => ResponseShape::Quiz,
        }
    }
}

/// Why a candidate was rejected.
#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("invalid AI response: no JSON content for {shape}")]
    Empty { shape: ResponseShape },

    #[error("invalid AI response: malformed JSON for {shape}: {source}")]
    Syntax {
        shape: ResponseShape,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid AI response: does not match the {shape} schema: {source}")]
    Schema {
        shape: ResponseShape,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a normalized candidate as `T`.
pub fn parse_response<T: ResponseSchema>(candidate: &str) -> Result<T, ResponseParseError> {
    let shape = T::SHAPE;
    if candidate.trim().is_empty() {
        return Err(ResponseParseError::Empty { shape });
    }

    serde_json::from_str(candidate).map_err(|source| match source.classify() {
        Category::Data => ResponseParseError::Schema { shape, source },
        Category::Syntax | Category::Eof | Category::Io => {
            ResponseParseError::Syntax { shape, source }
        }
    })
}

/// Parse a normalized candidate as the given shape.
pub fn parse_as(
    shape: ResponseShape,
    candidate: &str,
) -> Result<GeneratedContent, ResponseParseError> {
    match shape {
        ResponseShape::StudyPlan => {
            parse_response::<StudyPlan>(candidate).map(GeneratedContent::StudyPlan)
        }
        ResponseShape::Quiz => parse_response::<Quiz>(candidate).map(GeneratedContent::Quiz),
    }
}
