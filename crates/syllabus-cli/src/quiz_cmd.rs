//! `syllabus quiz <file|->`: generate a quiz from study text, and optionally
//! take it in the terminal.

use std::io::{BufRead, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use syllabus_core::types::QuizScore;
use syllabus_core::{Difficulty, Generator, Quiz};

const OPTION_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Run the quiz command.
///
/// `file` of `-` reads the content from stdin. With `take`, the questions
/// are asked one by one on stdin/stdout and the attempt is scored.
pub async fn run_quiz(
    generator: &Generator,
    file: &str,
    difficulty: Difficulty,
    json: bool,
    take: bool,
) -> Result<()> {
    if take && file == "-" {
        bail!("--take reads answers from stdin; pass the content as a file, not `-`");
    }

    let content = read_content(file).await?;
    if content.trim().is_empty() {
        bail!("no study content in {file}");
    }

    let quiz = generator
        .generate_quiz_from_content(&content, difficulty)
        .await
        .context("could not generate a quiz")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quiz)?);
        return Ok(());
    }

    if take {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let score = take_quiz(&quiz, stdin.lock(), stdout.lock())?;
        tracing::info!(correct = score.correct, total = score.total, "quiz attempt scored");
    } else {
        print!("{}", render_quiz(&quiz));
    }
    Ok(())
}

async fn read_content(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read study content from stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(Path::new(file))
        .await
        .with_context(|| format!("failed to read {file}"))
}

fn option_label(idx: usize) -> String {
    OPTION_LABELS
        .get(idx)
        .map(char::to_string)
        .unwrap_or_else(|| (idx + 1).to_string())
}

/// Parse an answer like `b`, `B` or `2` into a zero-based option index.
pub fn parse_answer(input: &str, option_count: usize) -> Option<usize> {
    let input = input.trim();
    let idx = if let Ok(n) = input.parse::<usize>() {
        n.checked_sub(1)?
    } else {
        let mut chars = input.chars();
        let c = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() {
            return None;
        }
        OPTION_LABELS.iter().position(|&l| l == c)?
    };
    (idx < option_count).then_some(idx)
}

/// Full quiz with answers and explanations.
pub fn render_quiz(quiz: &Quiz) -> String {
    let mut out = format!("Quiz: {}\n", quiz.topic);
    for (n, question) in quiz.questions.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", n + 1, question.statement));
        for (idx, option) in question.options.iter().enumerate() {
            out.push_str(&format!("   {}) {option}\n", option_label(idx)));
        }
        match usize::try_from(question.correct_answer)
            .ok()
            .filter(|&i| i < question.options.len())
        {
            Some(idx) => out.push_str(&format!("   Answer: {}\n", option_label(idx))),
            None => out.push_str("   Answer: (not available)\n"),
        }
        out.push_str(&format!("   {}\n", question.explanation));
    }
    out
}

/// Ask each question on `output`, read one answer per line from `input`,
/// then print the result. Unparseable or missing answers count as wrong.
pub fn take_quiz<R: BufRead, W: Write>(quiz: &Quiz, input: R, mut output: W) -> Result<QuizScore> {
    let mut lines = input.lines();
    let mut selections = Vec::with_capacity(quiz.questions.len());

    writeln!(output, "Quiz: {}", quiz.topic)?;
    for (n, question) in quiz.questions.iter().enumerate() {
        writeln!(output, "\n{}. {}", n + 1, question.statement)?;
        for (idx, option) in question.options.iter().enumerate() {
            writeln!(output, "   {}) {option}", option_label(idx))?;
        }
        write!(output, "Your answer: ")?;
        output.flush()?;

        let line = lines.next().transpose()?.unwrap_or_default();
        let selected = parse_answer(&line, question.options.len());
        selections.push(selected);

        let verdict = match selected {
            Some(s) if question.is_correct(s) => "Correct!".to_string(),
            _ => match question.correct_option() {
                Some(answer) => format!("Wrong. The answer is: {answer}"),
                None => "Wrong.".to_string(),
            },
        };
        writeln!(output, "{verdict}\n   {}", question.explanation)?;
    }

    let score = quiz.grade(&selections);
    writeln!(
        output,
        "\nScore: {}/{} ({})",
        score.correct,
        score.total,
        if score.passed() { "passed" } else { "keep studying" }
    )?;
    Ok(score)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use syllabus_core::QuizQuestion;

    use super::*;

    fn quiz() -> Quiz {
        let question = |statement: &str, answer: i64| QuizQuestion {
            statement: statement.to_string(),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct_answer: answer,
            explanation: format!("because {statement}"),
        };
        Quiz {
            topic: "Logic".to_string(),
            questions: vec![question("q1", 0), question("q2", 2), question("q3", 9)],
        }
    }

    // -- parse_answer tests --

    #[test]
    fn parse_answer_letters_and_numbers() {
        assert_eq!(parse_answer("a", 4), Some(0));
        assert_eq!(parse_answer(" D\n", 4), Some(3));
        assert_eq!(parse_answer("2", 4), Some(1));
    }

    #[test]
    fn parse_answer_rejects_out_of_range_and_noise() {
        assert_eq!(parse_answer("E", 4), None);
        assert_eq!(parse_answer("0", 4), None);
        assert_eq!(parse_answer("5", 4), None);
        assert_eq!(parse_answer("ab", 4), None);
        assert_eq!(parse_answer("", 4), None);
    }

    // -- render_quiz tests --

    #[test]
    fn render_shows_letters_answers_and_explanations() {
        let text = render_quiz(&quiz());
        assert!(text.starts_with("Quiz: Logic\n"));
        assert!(text.contains("1. q1\n   A) w\n   B) x\n"));
        assert!(text.contains("   Answer: C\n   because q2\n"));
        assert!(text.contains("   Answer: (not available)\n"));
    }

    // -- take_quiz tests --

    #[test]
    fn take_quiz_scores_answers() {
        let mut out = Vec::new();
        let score = take_quiz(&quiz(), Cursor::new("a\nc\nb\n"), &mut out).unwrap();
        assert_eq!(score.correct, 2);
        assert_eq!(score.total, 3);
        assert!(score.passed());

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("Correct!"));
        assert!(transcript.contains("Wrong.\n   because q3"));
        assert!(transcript.contains("Score: 2/3 (passed)"));
    }

    #[test]
    fn take_quiz_with_early_eof_counts_missing_as_wrong() {
        let mut out = Vec::new();
        let score = take_quiz(&quiz(), Cursor::new("b\n"), &mut out).unwrap();
        assert_eq!(score.correct, 0);
        assert!(!score.passed());

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("Wrong. The answer is: w"));
        assert!(transcript.contains("Score: 0/3 (keep studying)"));
    }
}
