pub(crate) mod gemini;
pub(crate) mod ollama;
