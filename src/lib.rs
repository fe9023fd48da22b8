//! # Message Board
//!
//! A small REST service for posting and reading messages, backed by MongoDB.
//!
//! ## Routes
//!
//! - `GET /messages` - every message
//! - `GET /messages/{id}` - zero or one messages, always as a list
//! - `POST /messages/save` - create a message from `{ name, message }` (JSON or form)
//! - `GET /about` - static about page content
//! - `GET /health` - database readiness
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use message_board::{server, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     message_board::logging::init();
//!     let config = Config::from_env()?;
//!     server::start(config, false).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod storage;

// Re-export main types for library consumers
pub use config::Config;
pub use error::{ApiError, ErrorKind, StoreError};
pub use models::{Message, MessageInput, NewMessage, User};
pub use storage::{MemoryStore, MessageStore, MongoStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
