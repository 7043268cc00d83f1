// src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Canonical categories are Shoes, Jersey, Ball, Hoop and Accessories, but
/// the column stays open text because imported datasets carry others.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub brand: String,
  pub category: String,
  pub price_cents: i32,
  pub stock: i32,
  pub description: String,
  pub image_url: Option<String>,
  pub rating: f64, // average of review ratings, 0 when unreviewed
  pub is_available: bool,
  pub release_date: Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
