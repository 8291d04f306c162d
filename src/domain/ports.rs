use crate::domain::model::Message;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Capability to deliver one composed message to one recipient. A single
/// transport instance is reused for every recipient of a run; failures are
/// scoped to the recipient and never abort the run.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: &Message, to: &str) -> Result<()>;
}

/// Pacing policy between consecutive delivery attempts. `pace` is awaited
/// before each attempt and suspends until the next attempt may start.
#[async_trait]
pub trait Pacer: Send {
    async fn pace(&mut self);
}
