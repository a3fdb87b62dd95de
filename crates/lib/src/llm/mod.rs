//! LLM client for the Ollama analyzer backend.
//!
//! Non-streaming chat completion with JSON output against a local Ollama instance.

mod ollama;

pub use ollama::{ChatMessage, ChatResponse, OllamaClient, OllamaError, OllamaModel};
