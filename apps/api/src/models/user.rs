use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// A row of the `users` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Fields required to insert a new user. The email must already be trimmed and lowercased.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}
