//! Text-completion backends.
//!
//! A single [`CompletionBackend`] trait fronts every text-generation endpoint.
//! The production implementation speaks the OpenAI-compatible chat-completions
//! API; a mock (behind the `testing` feature) serves canned responses and
//! records the prompts it was given.
//!
//! # Components
//!
//! - [`backend`]: the trait, the shared handle type, and the mock
//! - [`openai`]: OpenAI-compatible HTTP implementation

pub mod backend;
pub mod error;
pub mod openai;

pub use backend::{CompletionBackend, SharedBackend};
pub use error::{LlmError, Result};
pub use openai::{DEFAULT_MODEL, DEFAULT_OPENAI_BASE, OpenAiBackend, OpenAiConfig};

#[cfg(any(test, feature = "testing"))]
pub use backend::{MockBackend, RecordedPrompt};
