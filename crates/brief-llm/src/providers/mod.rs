//! Concrete chat provider implementations

mod ollama;

pub use ollama::{OllamaConfig, OllamaProvider};
