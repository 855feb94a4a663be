//! Database row types. These map directly to SQLite rows and stay
//! independent of the JSON types in painter-types.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, never the plaintext credential.
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintingRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub shapes_data: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}
