//! quizplay CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use quizplay_core::QuizError;

mod commands;

#[derive(Parser)]
#[command(name = "quizplay", version, about = "Generate, validate and grade quizzes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz from a topic
    Generate {
        /// Quiz topic
        #[arg(long)]
        topic: String,

        /// Number of questions (1-20)
        #[arg(long)]
        num_questions: Option<u32>,

        /// Question types (comma-separated, e.g. "multiple_choice,drag_drop")
        #[arg(long)]
        types: Option<String>,

        /// Provider name from the config (default: config's default_provider)
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Write the quiz JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a quiz payload file
    Validate {
        /// Path to the quiz JSON (fenced payloads are accepted)
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Grade answers against a quiz
    Grade {
        /// Path to the quiz JSON
        #[arg(long)]
        quiz: PathBuf,

        /// Path to the answers JSON (question id -> answer)
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and a sample quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizplay=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            topic,
            num_questions,
            types,
            provider,
            model,
            output,
            config,
        } => {
            commands::generate::execute(
                topic,
                num_questions,
                types,
                provider,
                model,
                output,
                config,
            )
            .await
        }
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Grade {
            quiz,
            answers,
            format,
        } => commands::grade::execute(quiz, answers, format),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        if let Some(hint) = hint_for(&e) {
            eprintln!("Hint: {hint}");
        }
        process::exit(1);
    }
}

/// Suggest a next step for quiz errors the user can act on.
fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    let quiz_err = err.chain().find_map(|c| c.downcast_ref::<QuizError>())?;
    let hint = match quiz_err {
        QuizError::IncompleteSubmission { .. } => "answer every question and grade again",
        _ if quiz_err.is_user_recoverable() => "generate the quiz again",
        _ => "the quiz uses a question type quizplay cannot grade; fix or regenerate the file",
    };
    Some(hint)
}
