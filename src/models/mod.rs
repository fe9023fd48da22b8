pub mod message;
pub mod user;

pub use message::{Message, MessageInput, NewMessage};
pub use user::User;
