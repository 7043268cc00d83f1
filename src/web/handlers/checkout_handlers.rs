// src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Invoice, Order, OrderStatus};
use crate::services::invoice as invoice_service;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  #[serde(default)]
  pub full_name: String,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub postal_code: String,
}

#[derive(Debug, FromRow)]
struct CheckoutLine {
  product_id: Uuid,
  name: String,
  price_cents: i32,
  quantity: i32,
}

/// Turns the caller's cart into an order, its line items and an invoice, and
/// clears the cart — all inside one transaction. Stock decrements are guarded
/// so a concurrent checkout can never drive stock negative; if any line lost
/// its stock the whole transaction rolls back.
#[instrument(name = "handler::checkout", skip(app_state, req_payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let mut tx = app_state.db_pool.begin().await?;

  let lines: Vec<CheckoutLine> = sqlx::query_as(
    "SELECT c.product_id, p.name, p.price_cents, c.quantity \
     FROM cart_items c JOIN products p ON p.id = c.product_id \
     WHERE c.user_id = $1 ORDER BY c.added_at",
  )
  .bind(auth_user.user_id)
  .fetch_all(&mut *tx)
  .await?;

  if lines.is_empty() {
    return Err(AppError::Validation("Your cart is empty.".to_string()));
  }

  let full_name = req_payload.full_name.trim();
  let address = req_payload.address.trim();
  let city = req_payload.city.trim();
  let postal_code = req_payload.postal_code.trim();
  if full_name.is_empty() || address.is_empty() || city.is_empty() || postal_code.is_empty() {
    return Err(AppError::Validation("All address fields are required.".to_string()));
  }

  let total_cents: i64 = lines
    .iter()
    .map(|line| line.price_cents as i64 * line.quantity as i64)
    .sum();

  let order: Order = sqlx::query_as(
    "INSERT INTO orders (id, user_id, full_name, address, city, postal_code, status, total_cents) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
     RETURNING id, user_id, full_name, address, city, postal_code, status, total_cents, created_at",
  )
  .bind(Uuid::new_v4())
  .bind(auth_user.user_id)
  .bind(full_name)
  .bind(address)
  .bind(city)
  .bind(postal_code)
  .bind(OrderStatus::Pending)
  .bind(total_cents)
  .fetch_one(&mut *tx)
  .await?;

  for line in &lines {
    // Guarded decrement: zero rows affected means someone got there first.
    let stock_update = sqlx::query("UPDATE products SET stock = stock - $1, updated_at = NOW() WHERE id = $2 AND stock >= $1")
      .bind(line.quantity)
      .bind(line.product_id)
      .execute(&mut *tx)
      .await?;
    if stock_update.rows_affected() == 0 {
      warn!(
        "Checkout aborted: insufficient stock for product {} ({}).",
        line.product_id, line.name
      );
      return Err(AppError::Validation(format!(
        "Insufficient stock for {}.",
        line.name
      )));
    }

    sqlx::query(
      "INSERT INTO order_items (id, order_id, product_id, quantity, price_at_purchase_cents) \
       VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(line.price_cents)
    .execute(&mut *tx)
    .await?;
  }

  let now = Utc::now();
  let invoice: Invoice = sqlx::query_as(
    "INSERT INTO invoices (id, order_id, user_id, invoice_no, issued_on) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING id, order_id, user_id, invoice_no, issued_on, created_at",
  )
  .bind(Uuid::new_v4())
  .bind(order.id)
  .bind(auth_user.user_id)
  .bind(invoice_service::generate_invoice_no(auth_user.user_id, now))
  .bind(now.date_naive())
  .fetch_one(&mut *tx)
  .await?;

  sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(auth_user.user_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;

  info!(order_id = %order.id, invoice_no = %invoice.invoice_no, total_cents, "Checkout completed.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Order placed successfully.",
      "orderId": order.id.to_string(),
      "invoiceNo": invoice.invoice_no,
      "totalCents": total_cents,
  })))
}
