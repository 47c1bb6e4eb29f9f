//! The `quizplay init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizplay.toml").exists() {
        println!("quizplay.toml already exists, skipping.");
    } else {
        std::fs::write("quizplay.toml", SAMPLE_CONFIG)?;
        println!("Created quizplay.toml");
    }

    std::fs::create_dir_all("quizzes")?;
    let sample_path = Path::new("quizzes/sample.json");
    if sample_path.exists() {
        println!("quizzes/sample.json already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_QUIZ)?;
        println!("Created quizzes/sample.json");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY or edit quizplay.toml");
    println!("  2. Run: quizplay validate --quiz quizzes/sample.json");
    println!("  3. Run: quizplay generate --topic \"networking\" --output quizzes/networking.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizplay configuration

default_provider = "gemini"
default_model = "gemini-1.5-flash"
default_num_questions = 5
default_question_types = ["multiple_choice", "true_false", "fill_blank", "drag_drop", "coding"]

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.offline]
type = "mock"
"#;

const SAMPLE_QUIZ: &str = r#"{
  "questions": [
    {
      "type": "multiple_choice",
      "question": "Which keyword declares an immutable binding in Rust?",
      "options": ["let", "mut", "var", "const fn"],
      "correct_answer": "let",
      "explanation": "Bindings introduced with `let` are immutable unless marked `mut`.",
      "references": [
        {"title": "Variables and Mutability", "url": "https://doc.rust-lang.org/book/ch03-01-variables-and-mutability.html"}
      ]
    },
    {
      "type": "true_false",
      "question": "A value can have two mutable references alive at once.",
      "correct_answer": false
    },
    {
      "type": "drag_drop",
      "question": "Order the steps of building a crate:",
      "options": ["cargo build", "cargo new", "edit src/main.rs"],
      "correct_answer": ["cargo new", "edit src/main.rs", "cargo build"]
    },
    {
      "type": "coding",
      "question": "Complete the function so it returns the length of the slice.",
      "code_template": "fn len(xs: &[i32]) -> usize {\n    xs._____()\n}",
      "options": ["len", "count", "size"],
      "correct_answer": ["len"]
    }
  ]
}
"#;
