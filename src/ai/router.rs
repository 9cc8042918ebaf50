use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::config::{AiMode, AiSettings};
use crate::ai::provider::ChatProvider;
use crate::ai::providers::{gemini::GeminiProvider, ollama::OllamaProvider};
use crate::ai::session::ChatSession;

/// One successful model exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// Owns the conversation history and routes prompts to the configured
/// backend. One in-flight exchange at a time; the session is only
/// appended to after a successful reply, so a failed query leaves the
/// history exactly as it was.
pub struct ChatEngine {
    settings: AiSettings,
    client: Client,
    session: ChatSession,
}

impl ChatEngine {
    pub fn new(settings: AiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build chat HTTP client")?;
        Ok(Self {
            settings,
            client,
            session: ChatSession::new(),
        })
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn reset_history(&mut self) {
        self.session.reset();
    }

    pub async fn generate(&mut self, prompt: &str) -> Result<ChatReply> {
        if !self.settings.enabled || self.settings.mode == AiMode::Disabled {
            return Err(anyhow!(
                "Chat backend is disabled. Set RECONCHAT_AI_ENABLED=1 and pick a mode."
            ));
        }

        let reply = self.dispatch(prompt).await?;
        self.session.push_user(prompt);
        self.session.push_assistant(reply.text.clone());
        Ok(reply)
    }

    async fn dispatch(&self, prompt: &str) -> Result<ChatReply> {
        let local = OllamaProvider::new(
            self.settings.ollama_endpoint.clone(),
            self.settings.ollama_model.clone(),
        );

        match self.settings.mode {
            AiMode::Local => self.call_provider(&local, prompt).await,
            AiMode::Cloud => {
                let cloud = build_gemini_provider(&self.settings)?;
                self.call_provider(&cloud, prompt).await
            }
            AiMode::HybridAuto => match self.call_provider(&local, prompt).await {
                Ok(reply) => Ok(reply),
                Err(local_err) => {
                    tracing::warn!("Local backend failed in hybrid mode, trying cloud: {}", local_err);
                    let cloud = build_gemini_provider(&self.settings).map_err(|cfg_err| {
                        anyhow!("hybrid chat failed. local={}, cloud-config={}", local_err, cfg_err)
                    })?;
                    self.call_provider(&cloud, prompt).await.map_err(|cloud_err| {
                        anyhow!("hybrid chat failed. local={}, cloud={}", local_err, cloud_err)
                    })
                }
            },
            AiMode::Disabled => Err(anyhow!("Chat backend is disabled")),
        }
    }

    async fn call_provider<P: ChatProvider>(&self, provider: &P, prompt: &str) -> Result<ChatReply> {
        let text = provider
            .generate(&self.client, self.session.turns(), prompt)
            .await?;
        Ok(ChatReply {
            text,
            provider: provider.provider_id().to_string(),
            model: provider.model_name().to_string(),
        })
    }
}

fn build_gemini_provider(settings: &AiSettings) -> Result<GeminiProvider> {
    let api_key = settings.gemini_api_key.clone().ok_or_else(|| {
        anyhow!("RECONCHAT_AI_GEMINI_API_KEY is required for cloud/hybrid cloud fallback")
    })?;

    Ok(GeminiProvider::new(
        settings.gemini_endpoint.clone(),
        settings.gemini_model.clone(),
        api_key,
    ))
}

/// Readiness report for the `ai-check` command. Pure settings
/// inspection, no network calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiCheckReport {
    pub ai_enabled: bool,
    pub mode: AiMode,
    pub ollama_endpoint: String,
    pub ollama_model: String,
    pub gemini_endpoint: String,
    pub gemini_model: String,
    pub gemini_key_present: bool,
    pub overall_ok: bool,
}

pub fn ai_check_report(settings: &AiSettings) -> AiCheckReport {
    let gemini_key_present = settings.gemini_api_key.is_some();
    let overall_ok = match settings.mode {
        AiMode::Disabled => true,
        AiMode::Local | AiMode::HybridAuto => true,
        AiMode::Cloud => gemini_key_present,
    };

    AiCheckReport {
        ai_enabled: settings.enabled,
        mode: settings.mode,
        ollama_endpoint: settings.ollama_endpoint.clone(),
        ollama_model: settings.ollama_model.clone(),
        gemini_endpoint: settings.gemini_endpoint.clone(),
        gemini_model: settings.gemini_model.clone(),
        gemini_key_present,
        overall_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings(mode: AiMode) -> AiSettings {
        AiSettings {
            enabled: mode != AiMode::Disabled,
            mode,
            timeout_ms: 1000,
            ollama_endpoint: "http://127.0.0.1:11434".to_string(),
            ollama_model: "qwen3:8b".to_string(),
            gemini_endpoint: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_api_key: None,
        }
    }

    #[tokio::test]
    async fn disabled_engine_rejects_generation_without_touching_history() {
        let mut engine =
            ChatEngine::new(test_settings(AiMode::Disabled)).expect("engine should build");
        let err = engine
            .generate("hello")
            .await
            .expect_err("disabled backend should refuse");
        assert!(err.to_string().contains("disabled"));
        assert!(engine.session().is_empty());
    }

    #[tokio::test]
    async fn cloud_mode_without_key_fails_with_config_error() {
        let mut engine =
            ChatEngine::new(test_settings(AiMode::Cloud)).expect("engine should build");
        let err = engine
            .generate("hello")
            .await
            .expect_err("cloud mode without key should fail");
        assert!(err.to_string().contains("RECONCHAT_AI_GEMINI_API_KEY"));
        assert!(engine.session().is_empty());
    }

    #[test]
    fn reset_history_clears_the_session() {
        let mut engine =
            ChatEngine::new(test_settings(AiMode::Local)).expect("engine should build");
        engine.session.push_user("hello");
        engine.reset_history();
        assert!(engine.session().is_empty());
    }

    #[test]
    fn ai_check_cloud_mode_requires_key() {
        let report = ai_check_report(&test_settings(AiMode::Cloud));
        assert!(!report.gemini_key_present);
        assert!(!report.overall_ok);

        let mut with_key = test_settings(AiMode::Cloud);
        with_key.gemini_api_key = Some("key".to_string());
        let report = ai_check_report(&with_key);
        assert!(report.overall_ok);
    }

    #[test]
    fn ai_check_disabled_mode_is_ok() {
        let report = ai_check_report(&test_settings(AiMode::Disabled));
        assert!(!report.ai_enabled);
        assert!(report.overall_ok);
    }
}
