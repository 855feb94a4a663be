use serde::{Deserialize, Serialize};

// -- Auth --

/// Missing fields deserialize as empty strings so that an incomplete login
/// is rejected the same way as a wrong password.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user_id: i64,
    pub username: String,
}

/// `{"success": ..., "message": ...}` body shared by save confirmations and
/// every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

// -- Paintings --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingResponse {
    pub title: String,
    pub shapes_data: String,
}

/// Raw save payload. Every field is optional here; the handler decides what
/// a usable request looks like and reports what is missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePaintingRequest {
    pub user_id: Option<UserIdField>,
    pub title: Option<String>,
    pub shapes_data: Option<String>,
}

/// Clients send `userId` either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserIdField {
    Number(serde_json::Number),
    Text(String),
}

impl UserIdField {
    /// Integer value of the field, or `None` if it is fractional, out of
    /// range, or not a number at all.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(s) => s.parse().ok(),
        }
    }
}
