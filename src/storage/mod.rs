pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Message, NewMessage};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Access to the `messages` collection.
///
/// Implementations are shared across request handlers, so every method takes
/// `&self` and is safe to call concurrently. There is no ordering guarantee
/// between concurrent `create` calls.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Every message, in the store's natural order
    async fn list(&self) -> Result<Vec<Message>, StoreError>;

    /// Zero or one messages. An unknown id is an empty list, a malformed id
    /// is [`StoreError::InvalidId`].
    async fn find_by_id(&self, id: &str) -> Result<Vec<Message>, StoreError>;

    async fn create(&self, new: NewMessage) -> Result<Message, StoreError>;

    /// Readiness probe
    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self);
}
