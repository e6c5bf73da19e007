//! Prompt construction for plan and quiz generation.
//!
//! Pure string assembly: no I/O, never fails, same inputs give the same
//! prompt byte for byte.

use crate::types::Difficulty;

/// Maximum characters of extracted document text embedded in a plan prompt.
pub const MAX_PLAN_SOURCE_CHARS: usize = 30_000;

/// Maximum characters of study content embedded in a quiz prompt.
pub const MAX_QUIZ_SOURCE_CHARS: usize = 15_000;

/// Number of questions every quiz prompt asks for.
pub const QUIZ_QUESTION_COUNT: usize = 5;

/// Preference clause used when the user gives none.
pub const DEFAULT_PREFERENCES: &str =
    "No specific preferences (default to 4 hours of study per day).";

const RAW_JSON_ONLY: &str = "Return ONLY the raw JSON object. No introduction, \
no markdown, no code fences, no closing remarks such as \"Here is your plan\".\n";

const PLAN_SCHEMA: &str = r#"Structure:
{
  "title": "Name of the exam or position identified in the document",
  "description": "Short summary of the strategy adopted",
  "schedule": [
    {
      "day": "Monday (or Day 1, Day 2, ...)",
      "subject": "Subject (e.g. Constitutional Law)",
      "topic": "Specific topic (e.g. Article 5)",
      "method": "Theory" | "Exercises" | "Review",
      "durationMinutes": 60
    }
  ]
}
"#;

const QUIZ_SCHEMA: &str = r#"Structure:
{
  "topic": "Summary of the topic covered",
  "questions": [
    {
      "statement": "Question statement...",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": 0,
      "explanation": "Short explanation of why this option is correct."
    }
  ]
}
"correctAnswer" is the zero-based index of the correct option (0 to 3).
"#;

/// Return the first `max_chars` characters of `text`.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// The preference clause to embed: the user's text verbatim, or
/// [`DEFAULT_PREFERENCES`] when absent or blank.
pub fn preferences_clause(preferences: Option<&str>) -> &str {
    match preferences {
        Some(p) if !p.trim().is_empty() => p,
        _ => DEFAULT_PREFERENCES,
    }
}

/// Build the study-plan prompt from user preferences and extracted
/// document text (truncated to [`MAX_PLAN_SOURCE_CHARS`]).
pub fn build_plan_prompt(preferences: Option<&str>, source_text: &str) -> String {
    let source = truncate_chars(source_text, MAX_PLAN_SOURCE_CHARS);
    let mut prompt = String::with_capacity(1024 + source.len());

    prompt.push_str("Act as an expert in public service exams and pedagogy.\n\n");

    prompt.push_str("GOAL:\n");
    prompt.push_str(
        "Analyze the content of the exam notice/document extracted below \
         and create an organized study plan.\n\n",
    );

    prompt.push_str("USER PREFERENCES:\n");
    prompt.push_str(preferences_clause(preferences));
    prompt.push_str("\n\n");

    prompt.push_str("REQUIRED OUTPUT FORMAT (JSON):\n");
    prompt.push_str(RAW_JSON_ONLY);
    prompt.push_str(PLAN_SCHEMA);
    prompt.push('\n');

    prompt.push_str("DOCUMENT CONTENT:\n");
    prompt.push_str(source);
    prompt.push('\n');

    prompt
}

/// Build the quiz prompt for `difficulty` from study content (truncated to
/// [`MAX_QUIZ_SOURCE_CHARS`]).
pub fn build_quiz_prompt(content: &str, difficulty: Difficulty) -> String {
    let source = truncate_chars(content, MAX_QUIZ_SOURCE_CHARS);
    let mut prompt = String::with_capacity(1024 + source.len());

    prompt.push_str(
        "Act as a public service exam board writing multiple-choice questions.\n\n",
    );

    prompt.push_str("GOAL:\n");
    prompt.push_str(&format!(
        "Create a quiz of {QUIZ_QUESTION_COUNT} multiple-choice questions based \
         EXCLUSIVELY on the text/topic provided below.\n"
    ));
    prompt.push_str(&format!("Difficulty: {difficulty}\n\n"));

    prompt.push_str("REQUIRED JSON FORMAT:\n");
    prompt.push_str(RAW_JSON_ONLY);
    prompt.push_str(QUIZ_SCHEMA);
    prompt.push('\n');

    prompt.push_str("BASE TEXT:\n");
    prompt.push_str(source);
    prompt.push('\n');

    prompt
}
