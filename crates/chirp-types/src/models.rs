use serde::{Deserialize, Serialize};

/// A registered user identity. Serializes straight onto the wire as
/// `{id, username, password}` — passwords are stored and returned in
/// plaintext in this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// A posted text item. `posted_at` is epoch milliseconds supplied by the
/// client at creation time; `posted_by` references an account id but is
/// stored without a foreign-key check at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub posted_by: i64,
    pub text: String,
    pub posted_at: i64,
}
