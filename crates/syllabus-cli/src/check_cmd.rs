//! `syllabus check <file> --shape plan|quiz`: normalize and validate a saved
//! raw model reply without calling the model.

use anyhow::{Context, Result};

use syllabus_core::generate::{GeneratedContent, ResponseShape, normalize_response, parse_as};

/// Validate the reply stored in `file`. Errors (non-zero exit) when the
/// reply does not yield a valid object of `shape`.
pub async fn run_check(file: &str, shape: ResponseShape, json: bool) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {file}"))?;

    let content =
        check_reply(&raw, shape).with_context(|| format!("{file} is not a valid {shape}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
    } else {
        println!("OK: {}", summarize(&content));
    }
    Ok(())
}

/// Normalize then parse `raw` as `shape`.
pub fn check_reply(raw: &str, shape: ResponseShape) -> Result<GeneratedContent> {
    let candidate = normalize_response(raw);
    Ok(parse_as(shape, &candidate)?)
}

fn summarize(content: &GeneratedContent) -> String {
    match content {
        GeneratedContent::StudyPlan(plan) => format!(
            "plan \"{}\" with {} items over {} days",
            plan.title,
            plan.schedule.len(),
            plan.days().len()
        ),
        GeneratedContent::Quiz(quiz) => format!(
            "quiz \"{}\" with {} questions",
            quiz.topic,
            quiz.questions.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use syllabus_test_utils::{FENCED_PLAN_REPLY, QUIZ_REPLY};

    use super::*;

    #[test]
    fn fenced_plan_passes() {
        let content = check_reply(FENCED_PLAN_REPLY, ResponseShape::StudyPlan).unwrap();
        assert_eq!(
            summarize(&content),
            "plan \"Court Clerk 2025\" with 3 items over 2 days"
        );
    }

    #[test]
    fn quiz_passes() {
        let content = check_reply(QUIZ_REPLY, ResponseShape::Quiz).unwrap();
        assert_eq!(
            summarize(&content),
            "quiz \"Separation of powers\" with 2 questions"
        );
    }

    #[test]
    fn wrong_shape_fails_with_parse_error() {
        let err = check_reply(QUIZ_REPLY, ResponseShape::StudyPlan).unwrap_err();
        assert!(err.to_string().starts_with("invalid AI response"), "got: {err}");
    }

    #[test]
    fn prose_only_fails() {
        assert!(check_reply("Sorry, I can't do that.", ResponseShape::Quiz).is_err());
    }

    #[tokio::test]
    async fn run_check_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("reply.txt");
        std::fs::write(&path, FENCED_PLAN_REPLY).unwrap();

        run_check(path.to_str().unwrap(), ResponseShape::StudyPlan, false)
            .await
            .unwrap();
        assert!(
            run_check(path.to_str().unwrap(), ResponseShape::Quiz, false)
                .await
                .is_err()
        );
    }
}
