//! # contract: interfaces between the pipeline and the generation service
//!
//! This module defines the [`Generator`] trait plus the supporting request
//! and observer types. The pipeline only ever talks to the generation
//! service through this trait, so tests can substitute a deterministic mock
//! and capture streamed chunks without any network or console I/O.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.
//!
//! ## Adding New Generation Backends
//! - Implement the trait for your backend.
//! - Forward every streamed fragment to the observer in arrival order; on
//!   success the concatenation of forwarded fragments must equal the
//!   returned final text.
//! - Convert all meaningful upstream errors to a boxed error.

use std::io::Write;

use async_trait::async_trait;

use mockall::{automock, predicate::*};

/// Everything the generation service needs for one document.
///
/// One request per source document; the endpoint, model and credential are
/// adapter construction state, not request fields.
pub struct GenerationRequest<'a> {
    /// Fixed system instructions for the whole run.
    pub system_instructions: &'a str,
    /// The source file's content, passed as contextual system-level input.
    pub source_content: &'a str,
    /// Fixed user prompt for the whole run.
    pub user_prompt: &'a str,
}

/// Error type for the Generator trait (simple boxed error for now).
pub type GenerateError = Box<dyn std::error::Error + Send + Sync>;

/// Receives streamed text fragments as they arrive.
///
/// Invoked synchronously from inside the generate call, in arrival order.
pub trait ChunkObserver: Send {
    fn on_chunk(&mut self, text: &str);
}

/// Echoes every fragment straight to stdout, flushing so partial lines show
/// up while the model is still producing.
pub struct ConsoleEcho;

impl ChunkObserver for ConsoleEcho {
    fn on_chunk(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Collects fragments in order; handy for tests asserting chunk sequences.
impl ChunkObserver for Vec<String> {
    fn on_chunk(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Trait for turning one source document into generated text.
///
/// The trait is implemented by real clients and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Issue one generation request, forwarding each streamed fragment to
    /// `observer`, and return the final assembled text.
    ///
    /// No retry is performed; a transport or service failure is the outcome
    /// for this single document.
    async fn generate<'a, 'b>(
        &self,
        request: GenerationRequest<'a>,
        observer: &'b mut (dyn ChunkObserver + 'b),
    ) -> Result<String, GenerateError>;
}
