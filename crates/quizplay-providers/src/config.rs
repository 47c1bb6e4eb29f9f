//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizplay_core::traits::{QuizGenerator, WIRE_QUESTION_TYPES};

use crate::gemini::GeminiProvider;
use crate::mock::MockGenerator;

/// Configuration for a single generator backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Mock {
        /// File whose contents are returned for every request.
        #[serde(default)]
        payload_file: Option<PathBuf>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::Mock { payload_file } => f
                .debug_struct("Mock")
                .field("payload_file", payload_file)
                .finish(),
        }
    }
}

/// Top-level quizplay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizplayConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Questions per quiz when the request does not say.
    #[serde(default = "default_num_questions")]
    pub default_num_questions: u32,
    /// Question types to request when none are given.
    #[serde(default = "default_question_types")]
    pub default_question_types: Vec<String>,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_num_questions() -> u32 {
    5
}
fn default_question_types() -> Vec<String> {
    WIRE_QUESTION_TYPES.iter().map(|t| t.to_string()).collect()
}

impl Default for QuizplayConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_num_questions: default_num_questions(),
            default_question_types: default_question_types(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("${") {
        let start = search_from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        search_from = start + value.len();
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            model: model.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Mock { payload_file } => ProviderConfig::Mock {
            payload_file: payload_file.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizplay.toml` in the current directory
/// 2. `~/.config/quizplay/config.toml`
///
/// Environment variable override: `QUIZPLAY_GEMINI_KEY`.
pub fn load_config() -> Result<QuizplayConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizplayConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizplay.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizplayConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizplayConfig::default(),
    };

    if let Ok(key) = std::env::var("QUIZPLAY_GEMINI_KEY") {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizplay"))
}

/// Create a generator instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn QuizGenerator>> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => {
            if api_key.trim().is_empty() {
                anyhow::bail!(
                    "provider '{name}' has no API key; set QUIZPLAY_GEMINI_KEY or api_key in quizplay.toml"
                );
            }
            let mut provider = GeminiProvider::new(api_key, base_url.clone());
            if let Some(model) = model {
                provider = provider.with_default_model(model.clone());
            }
            Ok(Box::new(provider))
        }
        ProviderConfig::Mock { payload_file } => match payload_file {
            Some(path) => {
                let payload = std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read mock payload: {}", path.display())
                })?;
                Ok(Box::new(MockGenerator::with_fixed_payload(&payload)))
            }
            None => Ok(Box::new(MockGenerator::default())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZPLAY_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZPLAY_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZPLAY_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_QUIZPLAY_UNSET_VAR}"), "");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_QUIZPLAY_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizplayConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.default_num_questions, 5);
        assert_eq!(config.default_question_types.len(), 5);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "gemini"
default_model = "gemini-1.5-pro"
default_num_questions = 10

[providers.gemini]
type = "gemini"
api_key = "test-key"

[providers.offline]
type = "mock"
"#;
        let config: QuizplayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.default_num_questions, 10);
        assert!(matches!(
            config.providers.get("offline"),
            Some(ProviderConfig::Mock { payload_file: None })
        ));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ProviderConfig::Gemini {
            api_key: "secret".into(),
            base_url: None,
            model: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizplay.toml");
        std::fs::write(&path, "[providers.local]\ntype = \"mock\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert!(config.providers.contains_key("local"));

        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn create_mock_and_reject_keyless_gemini() {
        let mock = create_provider("offline", &ProviderConfig::Mock { payload_file: None }).unwrap();
        assert_eq!(mock.name(), "mock");

        let keyless = ProviderConfig::Gemini {
            api_key: String::new(),
            base_url: None,
            model: None,
        };
        assert!(create_provider("gemini", &keyless).is_err());
    }
}
