use crate::models::{PaintingRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, Row};

impl Database {
    // -- Users --

    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Insert a user and return the stored row with its assigned id.
    /// Fails if the username is already taken.
    pub fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO users (username, password) VALUES (?1, ?2)
                 RETURNING id, username, password",
                (username, password_hash),
                user_from_row,
            )?;
            Ok(row)
        })
    }

    /// Insert every `(username, password_hash)` pair in one transaction, but
    /// only if the user table is empty. Either all rows land or none do.
    /// Returns how many users were inserted.
    pub fn insert_users_if_empty(&self, users: &[(&str, &str)]) -> Result<usize> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            if existing > 0 {
                return Ok(0);
            }

            {
                let mut stmt = tx.prepare("INSERT INTO users (username, password) VALUES (?1, ?2)")?;
                for &(username, password_hash) in users {
                    stmt.execute((username, password_hash))?;
                }
            }

            tx.commit()?;
            Ok(users.len())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Paintings --

    pub fn get_painting_by_user_id(&self, user_id: i64) -> Result<Option<PaintingRow>> {
        self.with_conn(|conn| query_painting_by_user_id(conn, user_id))
    }

    /// Create or replace the painting owned by `user_id` in one statement.
    /// On conflict the row keeps its id and `created_at`; title and shapes
    /// are overwritten and `updated_at` moves forward to `now_ms`.
    pub fn upsert_painting(
        &self,
        user_id: i64,
        title: &str,
        shapes_data: &str,
        now_ms: i64,
    ) -> Result<PaintingRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO paintings (user_id, title, shapes_data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     title = excluded.title,
                     shapes_data = excluded.shapes_data,
                     updated_at = MAX(paintings.updated_at, excluded.updated_at)
                 RETURNING id, user_id, title, shapes_data, created_at, updated_at",
                rusqlite::params![user_id, title, shapes_data, now_ms],
                painting_from_row,
            )?;
            Ok(row)
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

fn painting_from_row(row: &Row<'_>) -> rusqlite::Result<PaintingRow> {
    Ok(PaintingRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        shapes_data: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, username, password FROM users WHERE username = ?1")?;

    let row = stmt.query_row([username], user_from_row).optional()?;

    Ok(row)
}

fn query_painting_by_user_id(conn: &Connection, user_id: i64) -> Result<Option<PaintingRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, shapes_data, created_at, updated_at
         FROM paintings WHERE user_id = ?1",
    )?;

    let row = stmt.query_row([user_id], painting_from_row).optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painting_rows(db: &Database, user_id: i64) -> i64 {
        db.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM paintings WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .unwrap()
    }

    #[test]
    fn insert_user_assigns_ids_and_counts() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.count_users().unwrap(), 0);

        let first = db.insert_user("admin", "hash-a").unwrap();
        let second = db.insert_user("artist", "hash-b").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.username, "admin");
        assert_eq!(db.count_users().unwrap(), 2);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user("admin", "hash-a").unwrap();

        assert!(db.insert_user("admin", "hash-b").is_err());
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn batch_insert_only_into_empty_table() {
        let db = Database::open_in_memory().unwrap();

        assert_eq!(db.insert_users_if_empty(&[("admin", "h1"), ("user1", "h2")]).unwrap(), 2);
        assert_eq!(db.insert_users_if_empty(&[("user2", "h3")]).unwrap(), 0);
        assert_eq!(db.count_users().unwrap(), 2);
        assert!(db.get_user_by_username("user2").unwrap().is_none());
    }

    #[test]
    fn failed_batch_insert_leaves_no_rows() {
        let db = Database::open_in_memory().unwrap();

        // Third row collides with the first, after two rows were written.
        let result = db.insert_users_if_empty(&[("admin", "h1"), ("user1", "h2"), ("admin", "h3")]);
        assert!(result.is_err());
        assert_eq!(db.count_users().unwrap(), 0);

        assert_eq!(db.insert_users_if_empty(&[("admin", "h1"), ("user1", "h2")]).unwrap(), 2);
    }

    #[test]
    fn username_lookup_is_case_sensitive() {
        let db = Database::open_in_memory().unwrap();
        let stored = db.insert_user("admin", "hash-a").unwrap();

        assert_eq!(db.get_user_by_username("admin").unwrap(), Some(stored));
        assert_eq!(db.get_user_by_username("Admin").unwrap(), None);
        assert_eq!(db.get_user_by_username("nobody").unwrap(), None);
    }

    #[test]
    fn missing_painting_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_painting_by_user_id(1).unwrap(), None);
    }

    #[test]
    fn upsert_keeps_single_row_and_created_at() {
        let db = Database::open_in_memory().unwrap();

        let first = db.upsert_painting(1, "Draft", "[]", 1_000).unwrap();
        assert_eq!(first.created_at, 1_000);
        assert_eq!(first.updated_at, 1_000);

        let second = db.upsert_painting(1, "Sunset", r#"[{"type":"circle"}]"#, 2_000).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, 1_000);
        assert_eq!(second.updated_at, 2_000);
        assert_eq!(second.title, "Sunset");

        assert_eq!(painting_rows(&db, 1), 1);
        assert_eq!(db.get_painting_by_user_id(1).unwrap(), Some(second));
    }

    #[test]
    fn upsert_never_moves_updated_at_backwards() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_painting(3, "A", "[]", 5_000).unwrap();

        let row = db.upsert_painting(3, "B", "[]", 4_000).unwrap();
        assert_eq!(row.updated_at, 5_000);
        assert_eq!(row.title, "B");
    }

    #[test]
    fn paintings_are_isolated_per_user() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_painting(1, "One", "[1]", 10).unwrap();
        db.upsert_painting(2, "Two", "[2]", 20).unwrap();

        assert_eq!(db.get_painting_by_user_id(1).unwrap().unwrap().title, "One");
        assert_eq!(db.get_painting_by_user_id(2).unwrap().unwrap().title, "Two");
    }
}
