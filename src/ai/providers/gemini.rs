use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;

use crate::ai::provider::{ChatProvider, non_empty_reply};
use crate::ai::session::{ChatRole, ChatTurn};

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(endpoint: String, model: String, api_key: String) -> Self {
        Self {
            endpoint,
            model,
            api_key,
        }
    }
}

/// Gemini calls the assistant role "model".
fn build_contents(history: &[ChatTurn], prompt: &str) -> Vec<Value> {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| {
            json!({
                "role": match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "model",
                },
                "parts": [{ "text": turn.content }],
            })
        })
        .collect();
    contents.push(json!({
        "role": "user",
        "parts": [{ "text": prompt }],
    }));
    contents
}

impl ChatProvider for GeminiProvider {
    fn provider_id(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate<'a>(
        &'a self,
        client: &'a Client,
        history: &'a [ChatTurn],
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let endpoint = self.endpoint.trim_end_matches('/');
            let url = format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                endpoint, self.model, self.api_key
            );

            let response = client
                .post(url)
                .json(&json!({
                    "contents": build_contents(history, prompt),
                    "generationConfig": {
                        "temperature": 0.7
                    }
                }))
                .send()
                .await
                .context("Failed to call Gemini generateContent endpoint")?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow!("Gemini request failed with {}: {}", status, body));
            }

            let payload: Value = response
                .json()
                .await
                .context("Failed to parse Gemini response JSON")?;

            let text = payload
                .get("candidates")
                .and_then(Value::as_array)
                .and_then(|arr| arr.first())
                .and_then(|candidate| candidate.get("content"))
                .and_then(|content| content.get("parts"))
                .and_then(Value::as_array)
                .and_then(|parts| parts.first())
                .and_then(|part| part.get("text"))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    anyhow!("Gemini response missing candidates[0].content.parts[0].text")
                })?;

            non_empty_reply("Gemini", text)
        })
    }
}
