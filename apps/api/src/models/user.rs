use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row in the `users` table. Never serialized directly: the password hash
/// must not leave the server.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
