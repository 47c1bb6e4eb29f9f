//! The `quizplay validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let quiz = quizplay_core::parser::load_quiz_file(&quiz_path)?;

    println!("Quiz: {} ({} questions)", quiz_path.display(), quiz.questions.len());

    let warnings = quizplay_core::parser::validate_quiz(&quiz);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [q{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Quiz is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
