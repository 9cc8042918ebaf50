use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;

use crate::ai::provider::{ChatProvider, non_empty_reply};
use crate::ai::session::{ChatRole, ChatTurn};

#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(endpoint: String, model: String) -> Self {
        Self { endpoint, model }
    }
}

fn build_messages(history: &[ChatTurn], prompt: &str) -> Vec<Value> {
    let mut messages: Vec<Value> = history
        .iter()
        .map(|turn| {
            json!({
                "role": match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                "content": turn.content,
            })
        })
        .collect();
    messages.push(json!({ "role": "user", "content": prompt }));
    messages
}

impl ChatProvider for OllamaProvider {
    fn provider_id(&self) -> &'static str {
        "ollama"
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
            let url = format!("{}/api/chat", endpoint);

            let response = client
                .post(url)
                .json(&json!({
                    "model": self.model,
                    "messages": build_messages(history, prompt),
                    "stream": false
                }))
                .send()
                .await
                .context("Failed to call Ollama chat endpoint")?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow!("Ollama request failed with {}: {}", status, body));
            }

            let payload: Value = response
                .json()
                .await
                .context("Failed to parse Ollama response JSON")?;
            let text = payload
                .get("message")
                .and_then(|message| message.get("content"))
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("Ollama response missing message.content"))?;

            non_empty_reply("Ollama", text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_messages_appends_new_prompt_after_history() {
        let history = vec![
            ChatTurn {
                role: ChatRole::User,
                content: "hi".to_string(),
            },
            ChatTurn {
                role: ChatRole::Assistant,
                content: "hello".to_string(),
            },
        ];
        let messages = build_messages(&history, "analyze this host");
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["content"], "analyze this host");
    }

    #[test]
    fn build_messages_with_empty_history_has_single_turn() {
        let messages = build_messages(&[], "hello");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }
}
