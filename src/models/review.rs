// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub rating: i32,
  pub body: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
