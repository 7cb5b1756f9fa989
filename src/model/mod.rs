//! The completion gateway: turns a transcript into reply text.

mod client;
mod error;

pub use client::ChatCompletionClient;
pub use error::GatewayError;

use async_trait::async_trait;

use crate::chat::Turn;

#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the whole transcript, in order, and return the reply text.
    async fn complete(&self, transcript: &[Turn]) -> Result<String, GatewayError>;
}
