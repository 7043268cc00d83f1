// src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_at_purchase_cents: i32,
}

impl OrderItem {
  pub fn line_total_cents(&self) -> i64 {
    self.price_at_purchase_cents as i64 * self.quantity as i64
  }
}
