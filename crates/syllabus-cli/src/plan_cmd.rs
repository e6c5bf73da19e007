//! `syllabus plan <file>`: generate a study plan from a syllabus document.

use std::path::Path;

use anyhow::{Context, Result};

use syllabus_core::{DocumentKind, Generator, StudyPlan};

/// Run the plan command.
///
/// The document kind comes from the file extension. With `output`, the plan
/// JSON is written there; otherwise it is printed, as JSON or grouped by day.
pub async fn run_plan(
    generator: &Generator,
    file: &Path,
    preferences: Option<&str>,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let kind = DocumentKind::from_path(file).with_context(|| {
        format!(
            "unsupported file type: {} (expected .pdf or .xlsx)",
            file.display()
        )
    })?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let plan = generator
        .generate_study_plan(bytes, kind, preferences)
        .await
        .with_context(|| format!("could not generate a plan from {}", file.display()))?;

    if let Some(path) = output {
        let contents = serde_json::to_string_pretty(&plan)?;
        tokio::fs::write(path, contents)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "Plan \"{}\" ({} items) written to {}",
            plan.title,
            plan.schedule.len(),
            path.display()
        );
    } else if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_plan(&plan));
    }

    Ok(())
}

/// Human-readable plan: header, then one block per day in schedule order.
///
/// Methods outside Theory / Exercises / Review are marked with `*` and
/// explained in a trailing note.
pub fn render_plan(plan: &StudyPlan) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", plan.title));
    out.push_str(&format!("{}\n", plan.description));
    out.push_str(&format!(
        "Total: {} min across {} items\n",
        plan.total_minutes(),
        plan.schedule.len()
    ));

    for group in plan.days() {
        out.push_str(&format!("\n{} ({} min)\n", group.day, group.total_minutes()));
        for item in &group.items {
            let marker = if item.method.is_known() { "" } else { "*" };
            out.push_str(&format!(
                "  - [{}{marker}] {}: {} ({} min)\n",
                item.method, item.subject, item.topic, item.duration_minutes
            ));
        }
    }

    if plan.schedule.iter().any(|i| !i.method.is_known()) {
        out.push_str("\n* not one of Theory, Exercises or Review\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use syllabus_core::{StudyItem, StudyMethod};

    use super::*;

    fn item(day: &str, subject: &str, method: StudyMethod, minutes: i64) -> StudyItem {
        StudyItem {
            day: day.to_string(),
            subject: subject.to_string(),
            topic: "topic".to_string(),
            method,
            duration_minutes: minutes,
        }
    }

    #[test]
    fn render_groups_by_day_in_order() {
        let plan = StudyPlan {
            title: "Court Clerk".to_string(),
            description: "Balanced".to_string(),
            schedule: vec![
                item("Tuesday", "Law", StudyMethod::Theory, 60),
                item("Monday", "Logic", StudyMethod::Exercises, 30),
                item("Tuesday", "Law", StudyMethod::Review, 15),
            ],
        };
        let text = render_plan(&plan);

        assert!(text.starts_with("Court Clerk\nBalanced\nTotal: 105 min across 3 items\n"));
        let tuesday = text.find("Tuesday (75 min)").unwrap();
        let monday = text.find("Monday (30 min)").unwrap();
        assert!(tuesday < monday);
        assert!(text.contains("  - [Review] Law: topic (15 min)\n"));
        assert!(!text.contains('*'));
    }

    #[test]
    fn render_marks_unknown_methods() {
        let plan = StudyPlan {
            title: "t".to_string(),
            description: "d".to_string(),
            schedule: vec![
                item("Day 1", "Math", StudyMethod::from("Flashcards".to_string()), 20),
                item("Day 1", "Law", StudyMethod::from("Teoria".to_string()), 40),
            ],
        };
        let text = render_plan(&plan);
        assert!(text.contains("[Flashcards*] Math"));
        assert!(text.contains("[Theory] Law"));
        assert!(text.ends_with("\n* not one of Theory, Exercises or Review\n"));
    }

    #[test]
    fn render_survives_huge_durations() {
        let plan = StudyPlan {
            title: "t".to_string(),
            description: "d".to_string(),
            schedule: vec![
                item("Day 1", "Math", StudyMethod::Theory, i64::MAX),
                item("Day 1", "Law", StudyMethod::Review, 60),
            ],
        };
        let text = render_plan(&plan);
        assert!(text.contains(&format!("Total: {} min across 2 items", i64::MAX)));
        assert!(text.contains(&format!("Day 1 ({} min)", i64::MAX)));
    }

    #[tokio::test]
    async fn rejects_unsupported_extension() {
        let generator = crate::test_util::generator_replying("{}");
        let err = run_plan(&generator, Path::new("notes.txt"), None, false, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }
}
