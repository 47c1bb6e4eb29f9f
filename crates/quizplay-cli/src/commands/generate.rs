//! The `quizplay generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizplay_core::parser::validate_quiz;
use quizplay_core::traits::QuizRequest;
use quizplay_core::QuizPlayer;
use quizplay_providers::config::load_config_from;
use quizplay_providers::{create_provider, ProviderConfig};

pub async fn execute(
    topic: String,
    num_questions: Option<u32>,
    types: Option<String>,
    provider_name: Option<String>,
    model: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!topic.trim().is_empty(), "topic must not be empty");

    let config = load_config_from(config_path.as_deref())?;
    let provider_name = provider_name.unwrap_or_else(|| config.default_provider.clone());
    let Some(provider_config) = config.providers.get(&provider_name) else {
        anyhow::bail!(
            "provider '{}' not found in config. Available: {:?}",
            provider_name,
            config.providers.keys().collect::<Vec<_>>()
        );
    };
    let generator = create_provider(&provider_name, provider_config)?;

    let question_types = match &types {
        Some(t) => t
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => config.default_question_types.clone(),
    };
    let mut request = QuizRequest::new(
        topic,
        num_questions.unwrap_or(config.default_num_questions),
        question_types,
    );
    let model = match (model, provider_config) {
        (Some(m), _) => Some(m),
        (None, ProviderConfig::Gemini { model: None, .. }) => Some(config.default_model.clone()),
        _ => None,
    };
    if let Some(m) = model {
        request = request.with_model(m);
    }

    eprintln!(
        "Generating {} question(s) about '{}' with {}...",
        request.num_questions,
        request.topic,
        generator.name()
    );

    tracing::debug!(provider = %provider_name, model = ?request.model, types = ?request.question_types, "requesting quiz");
    let mut player = QuizPlayer::new();
    let session = player.load_from(generator.as_ref(), &request).await?;
    let quiz = session.quiz();

    for w in validate_quiz(quiz) {
        let prefix = w
            .question_id
            .map(|id| format!("  [q{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        eprintln!("{prefix} WARNING: {}", w.message);
    }

    let json = serde_json::to_string_pretty(quiz).context("failed to serialize quiz")?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write quiz to {}", path.display()))?;
            eprintln!("Quiz with {} questions saved to: {}", quiz.questions.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
