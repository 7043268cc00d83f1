// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
  pub id: Uuid,
  pub order_id: Uuid,
  pub user_id: Option<Uuid>,
  pub invoice_no: String,
  pub issued_on: NaiveDate,
  pub created_at: DateTime<Utc>,
}
