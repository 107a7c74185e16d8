//! Request and response types for the STASH HTTP surface.

use serde::{Deserialize, Serialize};

/// Body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

/// Body for `GET /connect`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub redis: bool,
    pub db: bool,
}

/// Body for `GET /stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub users: i64,
    pub files: i64,
}

/// An id field that clients may send as a JSON number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(i64),
    Text(String),
}

impl RawId {
    /// Normalize to the string form the pipeline validates.
    pub fn into_string(self) -> String {
        match self {
            RawId::Num(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Body for `POST /files`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<String>,
    pub parent_id: Option<RawId>,
    #[serde(default)]
    pub is_public: bool,
}

/// Query parameters for `GET /files`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub parent_id: Option<String>,
    pub page: Option<u32>,
}

/// Query parameters for `GET /files/:id/data`.
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    pub size: Option<u32>,
}
