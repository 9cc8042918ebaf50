use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_AI_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";
const DEFAULT_OLLAMA_MODEL: &str = "qwen3:8b";
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Chat backend routing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    Disabled,
    Local,
    Cloud,
    HybridAuto,
}

impl AiMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disabled" => Some(Self::Disabled),
            "local" => Some(Self::Local),
            "cloud" => Some(Self::Cloud),
            "hybrid" | "hybrid_auto" | "auto" => Some(Self::HybridAuto),
            _ => None,
        }
    }
}

/// Runtime chat backend settings (env-driven).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    pub enabled: bool,
    pub mode: AiMode,
    pub timeout_ms: u64,
    pub ollama_endpoint: String,
    pub ollama_model: String,
    pub gemini_endpoint: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AiSettings {
    /// Chat is the whole point of this tool, so the backend defaults to
    /// enabled with a local Ollama unless explicitly switched off.
    pub fn from_env() -> Self {
        let enabled = env_parse_bool("RECONCHAT_AI_ENABLED", true);
        let mode = if enabled {
            env_var("RECONCHAT_AI_MODE")
                .and_then(|v| AiMode::parse(&v))
                .unwrap_or(AiMode::Local)
        } else {
            AiMode::Disabled
        };

        Self {
            enabled,
            mode,
            timeout_ms: env_parse_u64(
                "RECONCHAT_AI_TIMEOUT_MS",
                DEFAULT_AI_TIMEOUT_MS,
                500,
                60_000,
            ),
            ollama_endpoint: env_var("RECONCHAT_AI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
            ollama_model: env_var("RECONCHAT_AI_MODEL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            gemini_endpoint: env_var("RECONCHAT_AI_GEMINI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            gemini_model: env_var("RECONCHAT_AI_GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_key: env_var("RECONCHAT_AI_GEMINI_API_KEY"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse_bool(name: &str, default: bool) -> bool {
    match env_var(name) {
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

fn env_parse_u64(name: &str, default: u64, min: u64, max: u64) -> u64 {
    match env_var(name).and_then(|v| v.parse::<u64>().ok()) {
        Some(v) => v.clamp(min, max),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_mode_parse_accepts_aliases() {
        assert_eq!(AiMode::parse("hybrid"), Some(AiMode::HybridAuto));
        assert_eq!(AiMode::parse("auto"), Some(AiMode::HybridAuto));
        assert_eq!(AiMode::parse("LOCAL"), Some(AiMode::Local));
        assert_eq!(AiMode::parse("cloud"), Some(AiMode::Cloud));
        assert_eq!(AiMode::parse("bad"), None);
    }

    #[test]
    fn timeout_env_value_clamps_to_supported_range() {
        // Unique var names so parallel tests never race on the same key.
        std::env::set_var("RECONCHAT_AI_TIMEOUT_MS_CLAMP_HIGH", "999999");
        assert_eq!(
            env_parse_u64("RECONCHAT_AI_TIMEOUT_MS_CLAMP_HIGH", 1000, 500, 60_000),
            60_000
        );

        std::env::set_var("RECONCHAT_AI_TIMEOUT_MS_CLAMP_LOW", "10");
        assert_eq!(
            env_parse_u64("RECONCHAT_AI_TIMEOUT_MS_CLAMP_LOW", 1000, 500, 60_000),
            500
        );

        assert_eq!(
            env_parse_u64("RECONCHAT_AI_TIMEOUT_MS_CLAMP_UNSET", 1000, 500, 60_000),
            1000
        );
    }

    #[test]
    fn timeout_converts_to_duration() {
        let settings = AiSettings {
            enabled: true,
            mode: AiMode::Local,
            timeout_ms: 1500,
            ollama_endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            gemini_endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_key: None,
        };
        assert_eq!(settings.timeout(), Duration::from_millis(1500));
    }
}
