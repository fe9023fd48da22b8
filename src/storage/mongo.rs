//! # MongoDB
//!
//! Document store holding the `messages` and `users` collections.
//!
//! The connection is attempted once at startup. A failed attempt does not stop
//! the server: when no client could be built the store stays disconnected and
//! every call fails fast with [`StoreError::Connectivity`]; when the client was
//! built but the first ping failed, the driver keeps trying in the background
//! and calls fail once its server selection timeout expires.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId},
    options::{ClientOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::MessageStore;
use crate::config::Config;
use crate::error::StoreError;
use crate::models::{Message, NewMessage, User};

const MESSAGES: &str = "messages";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<bson::DateTime>,
}

impl From<MessageDocument> for Message {
    fn from(doc: MessageDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            message: doc.message,
            created_at: doc.created_at.map(|t| t.to_chrono()),
            updated_at: doc.updated_at.map(|t| t.to_chrono()),
        }
    }
}

/// Outcome of the startup checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    Ready,
    Unreachable(String),
    SetupFailed(String),
}

impl Startup {
    pub fn describe(&self) -> String {
        match self {
            Startup::Ready => "Connected to MongoDB".to_string(),
            Startup::Unreachable(err) => format!("Failed to connect to MongoDB: {err}"),
            Startup::SetupFailed(err) => {
                format!("Connected to MongoDB, but failed to set up the users collection: {err}")
            }
        }
    }

    fn log(&self) {
        match self {
            Startup::Ready => info!("{}", self.describe()),
            _ => error!("{}", self.describe()),
        }
    }
}

enum Connection {
    Ready { client: Client, database: Database },
    Disconnected { reason: String },
}

pub struct MongoStore {
    connection: Connection,
}

impl MongoStore {
    /// Connect using the configured URI. Never fails; see the module docs.
    pub async fn connect(config: &Config) -> Self {
        let Some(uri) = config.db_connection_string.as_deref() else {
            error!("Failed to connect to MongoDB: DB_CONNECTION_STRING is not set");
            return Self::disconnected("DB_CONNECTION_STRING is not set");
        };

        let (client, database) = match Self::open(uri, config).await {
            Ok(opened) => opened,
            Err(err) => {
                error!("Failed to connect to MongoDB: {err:#}");
                return Self::disconnected(format!("{err:#}"));
            }
        };

        let store = Self {
            connection: Connection::Ready { client, database },
        };

        store.initialize(config.connect_timeout).await.log();

        store
    }

    /// First ping, then collection setup. Each step is reported on its own.
    pub async fn initialize(&self, timeout: Duration) -> Startup {
        match tokio::time::timeout(timeout, self.ping()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Startup::Unreachable(err.to_string()),
            Err(_) => return Startup::Unreachable("timed out".to_string()),
        }

        match tokio::time::timeout(timeout, self.setup_collections()).await {
            Ok(Ok(())) => Startup::Ready,
            Ok(Err(err)) => Startup::SetupFailed(err.to_string()),
            Err(_) => Startup::SetupFailed("timed out".to_string()),
        }
    }

    /// A store that rejects every call, as if the database were unreachable
    pub fn disconnected(reason: impl Into<String>) -> Self {
        Self {
            connection: Connection::Disconnected {
                reason: reason.into(),
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Ready { .. })
    }

    async fn open(uri: &str, config: &Config) -> Result<(Client, Database)> {
        debug!("setting up mongo client");

        let mut options = tokio::time::timeout(config.connect_timeout, ClientOptions::parse(uri))
            .await
            .map_err(|_| anyhow!("timed out parsing connection string"))?
            .context("invalid connection string")?;
        options.server_selection_timeout = Some(config.connect_timeout);
        options.app_name.get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options).context("mongodb")?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.db_name));

        Ok((client, database))
    }

    fn database(&self) -> Result<&Database, StoreError> {
        match &self.connection {
            Connection::Ready { database, .. } => Ok(database),
            Connection::Disconnected { reason } => Err(StoreError::Connectivity(reason.clone())),
        }
    }

    fn messages(&self) -> Result<Collection<MessageDocument>, StoreError> {
        Ok(self.database()?.collection(MESSAGES))
    }

    fn users(&self) -> Result<Collection<User>, StoreError> {
        Ok(self.database()?.collection(User::COLLECTION))
    }

    /// Make sure the `users` indexes exist
    pub async fn setup_collections(&self) -> Result<(), StoreError> {
        debug!("setting up users collection");

        self.users()?
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(Some(IndexOptions::builder().unique(Some(true)).build()))
                    .build(),
                None,
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl MessageStore for MongoStore {
    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        let cursor = self.messages()?.find(doc! {}, None).await?;
        let docs: Vec<MessageDocument> = cursor.try_collect().await?;

        Ok(docs.into_iter().map(Message::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<Message>, StoreError> {
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;

        let cursor = self.messages()?.find(doc! { "_id": oid }, None).await?;
        let docs: Vec<MessageDocument> = cursor.try_collect().await?;

        Ok(docs.into_iter().map(Message::from).collect())
    }

    async fn create(&self, new: NewMessage) -> Result<Message, StoreError> {
        let now = bson::DateTime::from_chrono(Utc::now());
        let doc = MessageDocument {
            id: ObjectId::new(),
            name: new.name,
            message: new.message,
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.messages()?.insert_one(&doc, None).await?;

        Ok(doc.into())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database()?.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    async fn close(&self) {
        if let Connection::Ready { client, .. } = &self.connection {
            info!("Closing MongoDB connection");
            client.clone().shutdown().await;
        } else {
            warn!("MongoDB was never connected, nothing to close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_uri_is_disconnected() {
        let store = MongoStore::connect(&Config::default()).await;
        assert!(!store.is_connected());
        assert!(matches!(store.list().await, Err(StoreError::Connectivity(_))));
    }

    #[tokio::test]
    async fn test_bad_uri_is_disconnected() {
        let config = Config {
            db_connection_string: Some("not a mongodb uri".into()),
            ..Config::default()
        };
        let store = MongoStore::connect(&config).await;
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_disconnected_store_rejects_everything() {
        let store = MongoStore::disconnected("refused");

        assert_eq!(
            store.ping().await,
            Err(StoreError::Connectivity("refused".into()))
        );
        assert!(matches!(
            store
                .create(NewMessage {
                    name: "Ada".into(),
                    message: "hello".into(),
                })
                .await,
            Err(StoreError::Connectivity(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_id_checked_before_connection() {
        let store = MongoStore::disconnected("refused");
        assert_eq!(
            store.find_by_id("xyz").await,
            Err(StoreError::InvalidId("xyz".into()))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unreachable_server_is_not_a_setup_failure() {
        let config = Config {
            db_connection_string: Some("mongodb://127.0.0.1:1/board".into()),
            connect_timeout: Duration::from_secs(1),
            ..Config::default()
        };
        let store = MongoStore::connect(&config).await;
        assert!(store.is_connected());

        let startup = store.initialize(config.connect_timeout).await;
        assert!(matches!(startup, Startup::Unreachable(_)));
    }

    #[test]
    fn test_setup_failure_is_reported_separately() {
        let setup = Startup::SetupFailed("E11000 duplicate key".into()).describe();
        assert!(!setup.contains("Failed to connect"));
        assert!(setup.contains("users collection"));
        assert!(setup.contains("E11000 duplicate key"));

        let unreachable = Startup::Unreachable("refused".into()).describe();
        assert_eq!(unreachable, "Failed to connect to MongoDB: refused");
        assert_eq!(Startup::Ready.describe(), "Connected to MongoDB");
    }

    #[test]
    fn test_document_conversion() {
        let id = ObjectId::new();
        let now = bson::DateTime::now();
        let message: Message = MessageDocument {
            id,
            name: "Ada".into(),
            message: "hello".into(),
            created_at: Some(now),
            updated_at: None,
        }
        .into();

        assert_eq!(message.id, id.to_hex());
        assert_eq!(message.created_at, Some(now.to_chrono()));
        assert!(message.updated_at.is_none());
    }
}
