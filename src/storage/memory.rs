use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use parking_lot::RwLock;

use super::MessageStore;
use crate::error::StoreError;
use crate::models::{Message, NewMessage};

/// In-process store with the same id semantics as MongoDB. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    messages: RwLock<Vec<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        Ok(self.messages.read().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<Message>, StoreError> {
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
        let hex = oid.to_hex();

        Ok(self
            .messages
            .read()
            .iter()
            .filter(|m| m.id == hex)
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewMessage) -> Result<Message, StoreError> {
        let now = Utc::now();
        let message = Message {
            id: ObjectId::new().to_hex(),
            name: new.name,
            message: new.message,
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.messages.write().push(message.clone());

        Ok(message)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(name: &str, message: &str) -> NewMessage {
        NewMessage {
            name: name.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_preserves_order() {
        let store = MemoryStore::new();
        let first = store.create(new_message("Ada", "hello")).await.unwrap();
        let second = store.create(new_message("Grace", "hi")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.list().await.unwrap(), vec![first, second]);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = MemoryStore::new();
        let saved = store.create(new_message("Ada", "hello")).await.unwrap();

        assert_eq!(store.find_by_id(&saved.id).await.unwrap(), vec![saved]);
        assert!(store
            .find_by_id(&ObjectId::new().to_hex())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_find_by_malformed_id() {
        let store = MemoryStore::new();
        assert_eq!(
            store.find_by_id("not-an-id").await,
            Err(StoreError::InvalidId("not-an-id".into()))
        );
    }

    #[tokio::test]
    async fn test_find_by_id_is_case_insensitive() {
        let store = MemoryStore::new();
        let saved = store.create(new_message("Ada", "hello")).await.unwrap();

        let found = store.find_by_id(&saved.id.to_uppercase()).await.unwrap();
        assert_eq!(found.len(), 1);
    }
}
