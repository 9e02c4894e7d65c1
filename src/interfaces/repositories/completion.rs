use async_trait::async_trait;
use derive_more::Display;

use crate::entities::chat::HistoryEntry;

/// Why a completion attempt produced no usable reply. Every variant
/// resolves to a canned fallback; none reach the HTTP caller.
#[derive(Debug, Display)]
pub enum CompletionError {
    #[display("No completion endpoint configured")]
    NotConfigured,

    #[display("Transport error: {_0}")]
    Transport(String),

    #[display("Upstream returned status {_0}")]
    Status(u16),

    #[display("Malformed upstream body: {_0}")]
    Malformed(String),

    #[display("Upstream returned an empty completion")]
    Empty,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Sends the full prompt (system turn first) and returns the reply text.
    async fn complete(&self, messages: &[HistoryEntry]) -> Result<String, CompletionError>;
}
