//! Domain types produced by the generation pipeline.
//!
//! Field names on the wire are camelCase, matching the schemas embedded in
//! the prompts. Deserialization is strict about structure (missing or
//! unknown fields are rejected) but lenient about values: durations,
//! answer indices and study methods are passed through as the model wrote
//! them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a study block should be worked through.
///
/// Unrecognized labels are kept verbatim in [`StudyMethod::Other`] so that
/// downstream consumers can decide how to render them. Values are built
/// through `From<String>`, so `Other` never holds a known label or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StudyMethod {
    Theory,
    Exercises,
    Review,
    Other(CustomMethod),
}

/// A study method label outside the standard set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomMethod(String);

impl CustomMethod {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StudyMethod {
    /// Canonical label for this method.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Theory => "Theory",
            Self::Exercises => "Exercises",
            Self::Review => "Review",
            Self::Other(custom) => custom.as_str(),
        }
    }

    /// `true` for the three methods the prompt asks for.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for StudyMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Theory" | "Teoria" => Self::Theory,
            "Exercises" | "Exercícios" => Self::Exercises,
            "Review" | "Revisão" => Self::Review,
            _ => Self::Other(CustomMethod(raw)),
        }
    }
}

impl From<StudyMethod> for String {
    fn from(method: StudyMethod) -> Self {
        match method {
            StudyMethod::Other(CustomMethod(raw)) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for StudyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty level requested for a generated quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(DifficultyParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Difficulty`] string.
#[derive(Debug, Clone)]
pub struct DifficultyParseError(pub String);

impl fmt::Display for DifficultyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid difficulty: {:?} (expected easy, medium, or hard)",
            self.0
        )
    }
}

impl std::error::Error for DifficultyParseError {}

// ---------------------------------------------------------------------------
// Study plan
// ---------------------------------------------------------------------------

/// A study plan inferred from a syllabus document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudyPlan {
    /// Name of the exam or position the model identified.
    pub title: String,
    /// Short summary of the strategy.
    pub description: String,
    /// Study blocks in chronological order.
    pub schedule: Vec<StudyItem>,
}

/// One block of a [`StudyPlan`] schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudyItem {
    /// Free-text day label ("Monday", "Day 1", ...). Only used for grouping.
    pub day: String,
    pub subject: String,
    pub topic: String,
    pub method: StudyMethod,
    /// Not validated: zero or negative values are kept as written.
    pub duration_minutes: i64,
}

/// Schedule items sharing the same day label.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub day: &'a str,
    pub items: Vec<&'a StudyItem>,
}

impl StudyPlan {
    /// Group the schedule by day label.
    ///
    /// Groups appear in order of the first item carrying each label; items
    /// keep their schedule order inside a group.
    pub fn days(&self) -> Vec<DayGroup<'_>> {
        let mut groups: Vec<DayGroup<'_>> = Vec::new();
        for item in &self.schedule {
            match groups.iter_mut().find(|g| g.day == item.day) {
                Some(group) => group.items.push(item),
                None => groups.push(DayGroup {
                    day: &item.day,
                    items: vec![item],
                }),
            }
        }
        groups
    }

    /// Sum of all block durations, in minutes, saturating at the `i64`
    /// bounds.
    pub fn total_minutes(&self) -> i64 {
        sum_minutes(self.schedule.iter())
    }
}

impl DayGroup<'_> {
    /// Sum of this day's block durations, saturating like
    /// [`StudyPlan::total_minutes`].
    pub fn total_minutes(&self) -> i64 {
        sum_minutes(self.items.iter().copied())
    }
}

fn sum_minutes<'a>(items: impl Iterator<Item = &'a StudyItem>) -> i64 {
    items
        .map(|i| i.duration_minutes)
        .fold(0i64, i64::saturating_add)
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A multiple-choice quiz generated from study content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Quiz {
    pub topic: String,
    pub questions: Vec<QuizQuestion>,
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuizQuestion {
    pub statement: String,
    /// Usually four options; the count is not enforced.
    pub options: Vec<String>,
    /// Zero-based index into `options`. Not bounds-checked.
    pub correct_answer: i64,
    pub explanation: String,
}

impl QuizQuestion {
    /// The option text at `correct_answer`, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        usize::try_from(self.correct_answer)
            .ok()
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }

    /// Whether `selected` is the correct option.
    ///
    /// A question whose `correct_answer` is out of range can never be
    /// answered correctly.
    pub fn is_correct(&self, selected: usize) -> bool {
        self.correct_option().is_some() && i64::try_from(selected).ok() == Some(self.correct_answer)
    }
}

/// Outcome of answering one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub selected: Option<usize>,
    pub is_correct: bool,
}

/// Score of a quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub answers: Vec<AnswerOutcome>,
}

impl QuizScore {
    /// More than half of the questions answered correctly.
    pub fn passed(&self) -> bool {
        self.correct * 2 > self.total
    }
}

impl Quiz {
    /// Score a set of selected option indices, one per question.
    ///
    /// Missing answers (fewer selections than questions) count as wrong;
    /// extra selections are ignored.
    pub fn grade(&self, selections: &[Option<usize>]) -> QuizScore {
        let answers: Vec<AnswerOutcome> = self
            .questions
            .iter()
            .enumerate()
            .map(|(idx, question)| {
                let selected = selections.get(idx).copied().flatten();
                AnswerOutcome {
                    question_index: idx,
                    selected,
                    is_correct: selected.is_some_and(|s| question.is_correct(s)),
                }
            })
            .collect();

        QuizScore {
            correct: answers.iter().filter(|a| a.is_correct).count(),
            total: self.questions.len(),
            answers,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
