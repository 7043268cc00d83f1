// src/models/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "report_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
  Pending,
  Resolved,
  Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "report_type_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
  Product,
  Review,
  User,
}

/// A moderation ticket. Exactly one of the reported_* columns is set,
/// matching report_type.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Report {
  pub id: Uuid,
  pub reporter_id: Uuid,
  pub report_type: ReportType,
  pub reported_product_id: Option<Uuid>,
  pub reported_review_id: Option<Uuid>,
  pub reported_user_id: Option<Uuid>,
  pub status: ReportStatus,
  pub title: String,
  pub description: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
