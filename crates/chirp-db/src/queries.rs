use crate::Database;
use anyhow::Result;
use chirp_types::models::{Account, Message};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, error};

/// Every public operation converts storage failure into absence after
/// logging it; errors never cross this boundary. Input validation lives in
/// chirp-service — these methods are purely mechanical.
impl Database {
    // -- Accounts --

    /// Inserts a new account, or returns `None` when the username is taken.
    /// The existence check and the insert are two statements; a concurrent
    /// registration of the same username can still lose the race and fail
    /// on the UNIQUE constraint, which also surfaces as `None`.
    pub fn create_account(&self, username: &str, password: &str) -> Option<Account> {
        let outcome = self.with_conn(|conn| {
            if query_account_by_username(conn, username)?.is_some() {
                debug!("Username already taken: {}", username);
                return Ok(None);
            }

            conn.execute(
                "INSERT INTO account (username, password) VALUES (?1, ?2)",
                params![username, password],
            )?;

            Ok(Some(Account {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                password: password.to_string(),
            }))
        });

        match outcome {
            Ok(account) => account,
            Err(e) => {
                error!("Error creating account: {}", e);
                None
            }
        }
    }

    pub fn get_account_by_username(&self, username: &str) -> Option<Account> {
        let outcome = self.with_conn(|conn| query_account_by_username(conn, username));

        match outcome {
            Ok(account) => account,
            Err(e) => {
                error!("Error finding account: {}", e);
                None
            }
        }
    }

    // -- Messages --

    pub fn create_message(&self, posted_by: i64, text: &str, posted_at: i64) -> Option<Message> {
        let outcome = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO message (posted_by, text, posted_at) VALUES (?1, ?2, ?3)",
                params![posted_by, text, posted_at],
            )?;

            Ok(Message {
                id: conn.last_insert_rowid(),
                posted_by,
                text: text.to_string(),
                posted_at,
            })
        });

        match outcome {
            Ok(message) => Some(message),
            Err(e) => {
                error!("Error creating message: {}", e);
                None
            }
        }
    }

    /// Highest message id in storage, 0 when no messages exist.
    pub fn last_created_message_id(&self) -> i64 {
        let outcome = self.with_conn(|conn| {
            let id = conn.query_row(
                "SELECT COALESCE(MAX(id), 0) FROM message",
                [],
                |row| row.get(0),
            )?;
            Ok(id)
        });

        match outcome {
            Ok(id) => id,
            Err(e) => {
                error!("Error fetching last message id: {}", e);
                0
            }
        }
    }

    pub fn get_message_by_id(&self, id: i64) -> Option<Message> {
        let outcome = self.with_conn(|conn| query_message_by_id(conn, id));

        match outcome {
            Ok(message) => message,
            Err(e) => {
                error!("Error fetching message {}: {}", id, e);
                None
            }
        }
    }

    /// All messages in storage order; no ORDER BY, so the sequence is
    /// whatever SQLite returns (insertion order in practice).
    pub fn get_all_messages(&self) -> Vec<Message> {
        let outcome = self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, posted_by, text, posted_at FROM message")?;
            let rows = stmt
                .query_map([], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        });

        match outcome {
            Ok(messages) => messages,
            Err(e) => {
                error!("Error fetching messages: {}", e);
                Vec::new()
            }
        }
    }

    pub fn get_all_messages_for_user(&self, posted_by: i64) -> Vec<Message> {
        let outcome = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, posted_by, text, posted_at FROM message WHERE posted_by = ?1",
            )?;
            let rows = stmt
                .query_map([posted_by], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        });

        match outcome {
            Ok(messages) => messages,
            Err(e) => {
                error!("Error fetching messages for account {}: {}", posted_by, e);
                Vec::new()
            }
        }
    }

    /// Updates the text and returns the post-update row, or `None` when no
    /// row matched. The UPDATE and the re-SELECT are separate statements,
    /// so a concurrent delete between them loses the row; an accepted race.
    pub fn update_message(&self, id: i64, new_text: &str) -> Option<Message> {
        let outcome = self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE message SET text = ?1 WHERE id = ?2",
                params![new_text, id],
            )?;
            if affected == 0 {
                return Ok(None);
            }
            query_message_by_id(conn, id)
        });

        match outcome {
            Ok(message) => message,
            Err(e) => {
                error!("Error updating message {}: {}", id, e);
                None
            }
        }
    }

    /// Deletes the row if present and returns the pre-deletion snapshot.
    pub fn delete_message(&self, id: i64) -> Option<Message> {
        let outcome = self.with_conn(|conn| {
            let Some(message) = query_message_by_id(conn, id)? else {
                return Ok(None);
            };
            conn.execute("DELETE FROM message WHERE id = ?1", [id])?;
            Ok(Some(message))
        });

        match outcome {
            Ok(message) => message,
            Err(e) => {
                error!("Error deleting message {}: {}", id, e);
                None
            }
        }
    }
}

fn query_account_by_username(conn: &Connection, username: &str) -> Result<Option<Account>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password FROM account WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(Account {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_message_by_id(conn: &Connection, id: i64) -> Result<Option<Message>> {
    let mut stmt =
        conn.prepare("SELECT id, posted_by, text, posted_at FROM message WHERE id = ?1")?;

    let row = stmt.query_row([id], message_from_row).optional()?;

    Ok(row)
}

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        posted_by: row.get(1)?,
        text: row.get(2)?,
        posted_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn create_account_assigns_ids_in_sequence() {
        let db = db();
        let a = db.create_account("bob", "pass1").unwrap();
        let b = db.create_account("alice", "pass2").unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.username, "bob");
        assert_eq!(a.password, "pass1");
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = db();
        assert!(db.create_account("bob", "pass1").is_some());
        assert!(db.create_account("bob", "other").is_none());
    }

    #[test]
    fn get_account_by_username_misses_unknown() {
        let db = db();
        db.create_account("bob", "pass1");
        assert!(db.get_account_by_username("alice").is_none());
        let found = db.get_account_by_username("bob").unwrap();
        assert_eq!(found.password, "pass1");
    }

    #[test]
    fn message_round_trip() {
        let db = db();
        let created = db.create_message(7, "hello", 1_700_000_000_000).unwrap();
        let fetched = db.get_message_by_id(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.posted_by, 7);
        assert_eq!(fetched.posted_at, 1_700_000_000_000);
    }

    #[test]
    fn last_created_message_id_starts_at_zero() {
        let db = db();
        assert_eq!(db.last_created_message_id(), 0);
        db.create_message(1, "a", 1);
        db.create_message(1, "b", 2);
        assert_eq!(db.last_created_message_id(), 2);
    }

    #[test]
    fn messages_filtered_by_user() {
        let db = db();
        db.create_message(1, "from one", 10);
        db.create_message(2, "from two", 20);
        db.create_message(1, "one again", 30);

        assert_eq!(db.get_all_messages().len(), 3);

        let for_one = db.get_all_messages_for_user(1);
        assert_eq!(for_one.len(), 2);
        assert!(for_one.iter().all(|m| m.posted_by == 1));

        assert!(db.get_all_messages_for_user(99).is_empty());
    }

    #[test]
    fn update_changes_only_text() {
        let db = db();
        let created = db.create_message(3, "before", 42).unwrap();
        let updated = db.update_message(created.id, "after").unwrap();

        assert_eq!(updated.text, "after");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.posted_by, created.posted_by);
        assert_eq!(updated.posted_at, created.posted_at);
    }

    #[test]
    fn update_missing_message_is_absent() {
        let db = db();
        assert!(db.update_message(999, "text").is_none());
    }

    #[test]
    fn delete_returns_snapshot_and_removes_row() {
        let db = db();
        let created = db.create_message(5, "doomed", 1).unwrap();
        let deleted = db.delete_message(created.id).unwrap();
        assert_eq!(deleted, created);
        assert!(db.get_message_by_id(created.id).is_none());
        assert!(db.delete_message(created.id).is_none());
    }
}
