//! Channel abstraction handed to a peer session: an already-open,
//! ordered, reliable, bidirectional message pipe. Establishment and
//! signaling live outside this crate's scope; implementations here only
//! move [`Message`] values.

use crate::protocol::Message;

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

pub mod in_memory;
pub mod tcp;
