use chirp_db::Database;
use chirp_types::models::{Account, Message};
use tracing::debug;

const MIN_PASSWORD_LEN: usize = 4;
const MAX_MESSAGE_LEN: usize = 255;

/// Gatekeeper in front of the data access layer. All input validation
/// happens here; chirp-db stays purely mechanical. Operations with no
/// rules to enforce delegate straight through.
pub struct SocialService {
    db: Database,
}

impl SocialService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // -- Accounts --

    pub fn create_account(&self, username: &str, password: &str) -> Option<Account> {
        if username.is_empty() || password.is_empty() {
            debug!("Rejected registration with empty credentials");
            return None;
        }
        if password.len() < MIN_PASSWORD_LEN {
            debug!("Rejected registration with short password");
            return None;
        }
        self.db.create_account(username, password)
    }

    /// Returns the account only when both fields match exactly.
    pub fn validate_password(&self, username: &str, password: &str) -> Option<Account> {
        self.db
            .get_account_by_username(username)
            .filter(|account| account.username == username && account.password == password)
    }

    // -- Messages --

    pub fn create_message(&self, posted_by: i64, text: &str, posted_at: i64) -> Option<Message> {
        if !message_text_ok(text) {
            debug!("Rejected message with invalid text");
            return None;
        }
        self.db.create_message(posted_by, text, posted_at)
    }

    pub fn get_message_by_id(&self, id: i64) -> Option<Message> {
        self.db.get_message_by_id(id)
    }

    pub fn get_all_messages(&self) -> Vec<Message> {
        self.db.get_all_messages()
    }

    pub fn get_all_messages_for_user(&self, posted_by: i64) -> Vec<Message> {
        self.db.get_all_messages_for_user(posted_by)
    }

    pub fn update_message(&self, id: i64, new_text: &str) -> Option<Message> {
        if !message_text_ok(new_text) {
            debug!("Rejected update with invalid text");
            return None;
        }
        self.db.update_message(id, new_text)
    }

    pub fn delete_message(&self, id: i64) -> Option<Message> {
        self.db.delete_message(id)
    }

    pub fn last_created_message_id(&self) -> i64 {
        self.db.last_created_message_id()
    }
}

/// Non-blank and at most 255 characters.
fn message_text_ok(text: &str) -> bool {
    !text.trim().is_empty() && text.chars().count() <= MAX_MESSAGE_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SocialService {
        SocialService::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn registration_rejects_empty_fields() {
        let svc = service();
        assert!(svc.create_account("", "pass1").is_none());
        assert!(svc.create_account("bob", "").is_none());
    }

    #[test]
    fn registration_rejects_short_password() {
        let svc = service();
        assert!(svc.create_account("bob", "abc").is_none());
        assert!(svc.create_account("bob", "abcd").is_some());
    }

    #[test]
    fn registration_rejects_taken_username() {
        let svc = service();
        assert!(svc.create_account("bob", "pass1").is_some());
        assert!(svc.create_account("bob", "completely-different").is_none());
    }

    #[test]
    fn returned_account_echoes_input() {
        let svc = service();
        let account = svc.create_account("alice", "secret").unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.password, "secret");
    }

    #[test]
    fn login_requires_exact_match() {
        let svc = service();
        svc.create_account("bob", "pass1");

        let account = svc.validate_password("bob", "pass1").unwrap();
        assert_eq!(account.username, "bob");

        assert!(svc.validate_password("bob", "wrong").is_none());
        assert!(svc.validate_password("alice", "pass1").is_none());
    }

    #[test]
    fn message_text_boundaries() {
        let svc = service();
        svc.create_account("bob", "pass1");

        assert!(svc.create_message(1, "", 0).is_none());
        assert!(svc.create_message(1, "   ", 0).is_none());
        assert!(svc.create_message(1, &"x".repeat(256), 0).is_none());

        assert!(svc.create_message(1, "x", 0).is_some());
        assert!(svc.create_message(1, &"x".repeat(255), 0).is_some());
    }

    #[test]
    fn update_validates_text_before_touching_storage() {
        let svc = service();
        let msg = svc.create_message(1, "original", 5).unwrap();

        assert!(svc.update_message(msg.id, "").is_none());
        assert!(svc.update_message(msg.id, &"y".repeat(256)).is_none());
        assert_eq!(svc.get_message_by_id(msg.id).unwrap().text, "original");

        let updated = svc.update_message(msg.id, "edited").unwrap();
        assert_eq!(updated.text, "edited");
        assert_eq!(updated.posted_at, 5);
    }

    #[test]
    fn delete_passes_through() {
        let svc = service();
        let msg = svc.create_message(2, "bye", 9).unwrap();
        assert_eq!(svc.delete_message(msg.id).unwrap(), msg);
        assert!(svc.delete_message(msg.id).is_none());
    }

    #[test]
    fn last_id_tracks_creation() {
        let svc = service();
        assert_eq!(svc.last_created_message_id(), 0);
        let msg = svc.create_message(1, "first", 0).unwrap();
        assert_eq!(svc.last_created_message_id(), msg.id);
    }
}
