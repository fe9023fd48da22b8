use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Document in the `users` collection. No route reads or writes it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
}

impl User {
    pub const COLLECTION: &'static str = "users";
}
