//! Generation channel and prompt builder contracts.

use crate::error::Result;
use crate::session::TransformKind;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Sequence of generated fragments, terminated by end-of-stream or an error.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// Opens one streaming generation for a prompt.
///
/// Called exactly once per `Generating` state. An `Err` from `generate` means
/// the channel could not be opened; an `Err` item means it failed mid-stream.
#[async_trait]
pub trait GenerationChannel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<FragmentStream>;
}

/// Turns user text and a transform kind into a model prompt.
///
/// Implementations must be free of side effects.
pub trait PromptBuilder: Send + Sync {
    fn build(&self, text: &str, kind: TransformKind) -> Result<String>;
}
