pub mod cloud;
pub mod ollama;
pub mod openrouter;
