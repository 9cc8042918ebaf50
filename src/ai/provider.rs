use anyhow::{Result, anyhow};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::ai::session::ChatTurn;

pub(crate) trait ChatProvider: Send + Sync {
    fn provider_id(&self) -> &'static str;
    fn model_name(&self) -> &str;
    /// Generate the next assistant reply given the prior conversation
    /// and the new user prompt. History mutation is the caller's job.
    fn generate<'a>(
        &'a self,
        client: &'a Client,
        history: &'a [ChatTurn],
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

pub(crate) fn non_empty_reply(provider: &str, text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} returned an empty reply", provider));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_reply_trims_whitespace() {
        let reply = non_empty_reply("ollama", "  hello\n").expect("reply should pass");
        assert_eq!(reply, "hello");
    }

    #[test]
    fn blank_reply_is_rejected() {
        let err = non_empty_reply("gemini", "   \n").expect_err("blank reply should fail");
        assert!(err.to_string().contains("gemini"));
    }
}
