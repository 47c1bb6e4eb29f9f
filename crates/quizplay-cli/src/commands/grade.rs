//! The `quizplay grade` command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use quizplay_core::grader::{grade, GradingResult};
use quizplay_core::parser::load_quiz_file;
use quizplay_core::AnswerValue;

pub fn execute(quiz_path: PathBuf, answers_path: PathBuf, format: String) -> Result<()> {
    let quiz = load_quiz_file(&quiz_path)?;
    let answers = load_answers(&answers_path)?;

    let result = grade(&quiz, &answers).context("cannot grade this submission")?;

    match format.as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(&result).context("failed to serialize result")?;
            println!("{json}");
        }
        "text" => print_result(&result),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

/// Read a JSON object mapping question ids to answers.
fn load_answers(path: &Path) -> Result<HashMap<usize, AnswerValue>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    let raw: HashMap<String, Value> = serde_json::from_str(&content)
        .with_context(|| format!("answers must be a JSON object: {}", path.display()))?;

    raw.into_iter()
        .map(|(key, value)| {
            let id: usize = key
                .trim()
                .trim_start_matches('q')
                .parse()
                .with_context(|| format!("invalid question id: '{key}'"))?;
            let answer = answer_value(&value)
                .with_context(|| format!("unsupported answer for question {id}: {value}"))?;
            Ok((id, answer))
        })
        .collect()
}

fn answer_value(value: &Value) -> Option<AnswerValue> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Some(None),
                other => scalar(other).map(Some),
            })
            .collect::<Option<Vec<_>>>()
            .map(AnswerValue::OrderedList),
        other => scalar(other).map(AnswerValue::Scalar),
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn print_result(result: &GradingResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result"]);

    for detail in &result.details {
        let user_answer = if detail.user_answer.is_unset() {
            "No answer provided".to_string()
        } else {
            detail.user_answer.to_string()
        };
        table.add_row(vec![
            Cell::new(detail.question_id + 1),
            Cell::new(&detail.prompt),
            Cell::new(user_answer),
            Cell::new(detail.correct_answer.to_string()),
            Cell::new(if detail.is_correct { "Correct" } else { "Incorrect" }),
        ]);
    }

    println!("{table}");
    println!(
        "\nYour Score: {}% ({} out of {} correct)",
        result.score, result.correct_count, result.total
    );

    for detail in result
        .details
        .iter()
        .filter(|d| d.explanation.is_some() || !d.references.is_empty())
    {
        println!("\nQuestion {}:", detail.question_id + 1);
        if let Some(explanation) = &detail.explanation {
            println!("  {explanation}");
        }
        for reference in &detail.references {
            println!("  - {} ({}): {}", reference.title, reference.source, reference.url);
        }
    }
}
