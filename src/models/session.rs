// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A login session. The token itself is the primary key and is handed to the
/// client at login; requests carry it back in the `X-Session-Token` header.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Session {
  pub token: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}
