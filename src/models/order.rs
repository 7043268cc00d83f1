// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Shipped,
  Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  // Nullable: orders outlive deleted accounts.
  pub user_id: Option<Uuid>,
  pub full_name: String,
  pub address: String,
  pub city: String,
  pub postal_code: String,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub created_at: DateTime<Utc>,
}
