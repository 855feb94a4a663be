//! Repositories over the shared [`Database`] handle.
//!
//! These are synchronous; async callers run them through
//! [`crate::error::run_blocking`].

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use painter_db::Database;
use painter_db::models::{PaintingRow, UserRow};

use crate::password::{hash_password, verify_password, verify_unknown_user};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self { id: row.id, username: row.username }
    }
}

/// A user to be created. `password` is the plaintext credential; only its
/// hash reaches the store.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Painting {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub shapes_data: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PaintingRow> for Painting {
    fn from(row: PaintingRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            shapes_data: row.shapes_data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPainting {
    pub user_id: i64,
    pub title: String,
    pub shapes_data: String,
}

// -- Users --

#[derive(Clone)]
pub struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Unknown username and wrong credential both yield `None`, after the
    /// same amount of hashing work.
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(row) = self.db.get_user_by_username(username)? else {
            verify_unknown_user(password)?;
            return Ok(None);
        };

        if verify_password(password, &row.password)? {
            Ok(Some(row.into()))
        } else {
            Ok(None)
        }
    }

    pub fn count(&self) -> Result<i64> {
        self.db.count_users()
    }

    pub fn save(&self, user: &NewUser<'_>) -> Result<User> {
        let password_hash = hash_password(user.password)?;
        let row = self.db.insert_user(user.username, &password_hash)?;
        debug!("Created user '{}' with id {}", row.username, row.id);
        Ok(row.into())
    }

    /// Create all `users` atomically if no user exists yet. Hashing happens
    /// before the store is touched. Returns how many users were created.
    pub fn save_all_if_empty(&self, users: &[NewUser<'_>]) -> Result<usize> {
        let hashes = users
            .iter()
            .map(|user| hash_password(user.password))
            .collect::<Result<Vec<_>>>()?;

        let rows: Vec<(&str, &str)> = users
            .iter()
            .zip(&hashes)
            .map(|(user, hash)| (user.username, hash.as_str()))
            .collect();

        self.db.insert_users_if_empty(&rows)
    }
}

// -- Paintings --

#[derive(Clone)]
pub struct PaintingRepository {
    db: Arc<Database>,
}

impl PaintingRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_by_user_id(&self, user_id: i64) -> Result<Option<Painting>> {
        Ok(self.db.get_painting_by_user_id(user_id)?.map(Painting::from))
    }

    /// Insert the user's painting, or overwrite it in place if one exists.
    pub fn save(&self, painting: &NewPainting) -> Result<Painting> {
        let now = chrono::Utc::now().timestamp_millis();
        let row = self.db.upsert_painting(
            painting.user_id,
            &painting.title,
            &painting.shapes_data,
            now,
        )?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repos() -> (Arc<Database>, UserRepository, PaintingRepository) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        (db.clone(), UserRepository::new(db.clone()), PaintingRepository::new(db))
    }

    #[test]
    fn credentials_must_match_exactly() {
        let (db, users, _) = repos();
        let saved = users.save(&NewUser { username: "artist", password: "paint123" }).unwrap();

        assert_eq!(users.find_by_credentials("artist", "paint123").unwrap(), Some(saved));
        assert_eq!(users.find_by_credentials("artist", "Paint123").unwrap(), None);
        assert_eq!(users.find_by_credentials("Artist", "paint123").unwrap(), None);
        assert_eq!(users.find_by_credentials("nobody", "paint123").unwrap(), None);

        let stored = db.get_user_by_username("artist").unwrap().unwrap();
        assert_ne!(stored.password, "paint123");
    }

    #[test]
    fn unknown_username_costs_a_hash() {
        let (_, users, _) = repos();

        // Argon2 with default parameters takes well over a millisecond.
        let started = std::time::Instant::now();
        assert_eq!(users.find_by_credentials("ghost", "paint123").unwrap(), None);
        assert!(started.elapsed() >= std::time::Duration::from_millis(1));
    }

    #[test]
    fn save_all_if_empty_is_all_or_nothing() {
        let (_, users, _) = repos();
        let batch = [
            NewUser { username: "admin", password: "admin123" },
            NewUser { username: "user1", password: "password1" },
        ];

        assert_eq!(users.save_all_if_empty(&batch).unwrap(), 2);
        assert_eq!(users.save_all_if_empty(&batch).unwrap(), 0);
        assert_eq!(users.count().unwrap(), 2);
        assert!(users.find_by_credentials("user1", "password1").unwrap().is_some());
    }

    #[test]
    fn count_tracks_saved_users() {
        let (_, users, _) = repos();
        assert_eq!(users.count().unwrap(), 0);
        users.save(&NewUser { username: "user1", password: "password1" }).unwrap();
        assert_eq!(users.count().unwrap(), 1);
    }

    #[test]
    fn painting_save_updates_in_place() {
        let (db, _, paintings) = repos();
        assert_eq!(paintings.find_by_user_id(4).unwrap(), None);

        let created = paintings
            .save(&NewPainting { user_id: 4, title: "Draft".into(), shapes_data: "[]".into() })
            .unwrap();
        let updated = paintings
            .save(&NewPainting {
                user_id: 4,
                title: "Sunset".into(),
                shapes_data: r#"[{"type":"circle"}]"#.into(),
            })
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(paintings.find_by_user_id(4).unwrap(), Some(updated));
        let rows: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM paintings WHERE user_id = 4", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }
}
