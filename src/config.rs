use std::env;
use std::path::PathBuf;

use anyhow::Result;

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub project_id: String,
    pub location: String,
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: usize,
    pub temperature: f32,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub corpus_dir: PathBuf,
    pub max_occurrences: usize,
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// The API key and project id must be present; nothing else about them is checked.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let location = var("GOOGLE_LOCATION").unwrap_or_else(|| "us-central1".to_string());
        let base_url = var("GEMINI_BASE_URL")
            .unwrap_or_else(|| format!("https://{location}-aiplatform.googleapis.com"));

        Ok(Self {
            bind_addr: var("BOOK_EXPLAINER_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            corpus_dir: var("BOOK_EXPLAINER_CORPUS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            max_occurrences: var("MAX_OCCURRENCES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            generator: GeneratorConfig {
                api_key: required(&var, "GOOGLE_GEMINI2_API_KEY")?,
                project_id: required(&var, "GOOGLE_PROJECT_ID")?,
                model: var("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash-002".to_string()),
                base_url: base_url.trim_end_matches('/').to_string(),
                location,
                max_output_tokens: var("MAX_OUTPUT_TOKENS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1_024),
                temperature: var("GENERATION_TEMPERATURE")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0.2),
            },
        })
    }
}

fn required(var: impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match var(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("missing required environment variable {key}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const CREDENTIALS: [(&str, &str); 2] = [
        ("GOOGLE_GEMINI2_API_KEY", "key"),
        ("GOOGLE_PROJECT_ID", "proj"),
    ];

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = load(&CREDENTIALS).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.corpus_dir, PathBuf::from("./data"));
        assert_eq!(config.max_occurrences, 3);
        assert_eq!(config.generator.api_key, "key");
        assert_eq!(config.generator.project_id, "proj");
        assert_eq!(config.generator.location, "us-central1");
        assert_eq!(config.generator.model, "gemini-1.5-flash-002");
        assert_eq!(
            config.generator.base_url,
            "https://us-central1-aiplatform.googleapis.com"
        );
        assert_eq!(config.generator.max_output_tokens, 1_024);
    }

    #[test]
    fn overrides_are_parsed_and_base_url_is_trimmed() {
        let mut vars = CREDENTIALS.to_vec();
        vars.extend([
            ("MAX_OCCURRENCES", "5"),
            ("GOOGLE_LOCATION", "europe-west4"),
            ("GEMINI_BASE_URL", "http://localhost:9000/"),
            ("MAX_OUTPUT_TOKENS", "not-a-number"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.max_occurrences, 5);
        assert_eq!(config.generator.location, "europe-west4");
        assert_eq!(config.generator.base_url, "http://localhost:9000");
        assert_eq!(config.generator.max_output_tokens, 1_024);
    }

    #[test]
    fn location_feeds_default_base_url() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("GOOGLE_LOCATION", "asia-east1"));
        let config = load(&vars).unwrap();

        assert_eq!(
            config.generator.base_url,
            "https://asia-east1-aiplatform.googleapis.com"
        );
    }

    #[test]
    fn missing_or_blank_credentials_fail() {
        let err = load(&[("GOOGLE_PROJECT_ID", "proj")]).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_GEMINI2_API_KEY"));

        let err = load(&[("GOOGLE_GEMINI2_API_KEY", "key"), ("GOOGLE_PROJECT_ID", "  ")])
            .unwrap_err();
        assert!(err.to_string().contains("GOOGLE_PROJECT_ID"));
    }
}
