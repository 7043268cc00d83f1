// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CartItem;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  pub quantity: i32,
}

/// One cart row joined with its product, as returned by GET /cart.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub id: Uuid,
  pub product_id: Uuid,
  pub name: String,
  pub image_url: Option<String>,
  pub price_cents: i32,
  pub quantity: i32,
}

impl CartLine {
  pub fn subtotal_cents(&self) -> i64 {
    self.price_cents as i64 * self.quantity as i64
  }
}

pub fn cart_total_cents(lines: &[CartLine]) -> i64 {
  lines.iter().map(CartLine::subtotal_cents).sum()
}

#[instrument(name = "handler::view_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let lines: Vec<CartLine> = sqlx::query_as(
    "SELECT c.id, c.product_id, p.name, p.image_url, p.price_cents, c.quantity \
     FROM cart_items c JOIN products p ON p.id = c.product_id \
     WHERE c.user_id = $1 ORDER BY c.added_at DESC",
  )
  .bind(auth_user.user_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  let total_cents = cart_total_cents(&lines);
  let items: Vec<_> = lines
    .iter()
    .map(|line| {
      json!({
          "id": line.id,
          "productId": line.product_id,
          "name": line.name,
          "imageUrl": line.image_url,
          "priceCents": line.price_cents,
          "quantity": line.quantity,
          "subtotalCents": line.subtotal_cents(),
      })
    })
    .collect();

  Ok(HttpResponse::Ok().json(json!({
      "message": "Cart fetched successfully.",
      "items": items,
      "totalCents": total_cents,
  })))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  if req_payload.quantity <= 0 {
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }

  let product: Option<(i32, bool)> = sqlx::query_as("SELECT stock, is_available FROM products WHERE id = $1")
    .bind(req_payload.product_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  let (stock, is_available) = product.ok_or_else(|| {
    warn!("Product {} not found.", req_payload.product_id);
    AppError::NotFound(format!("Product with ID {} not found.", req_payload.product_id))
  })?;
  if !is_available {
    return Err(AppError::Validation("Product is not available.".to_string()));
  }

  // The new line quantity is what gets checked against stock, counting
  // whatever is already in the cart.
  let already_in_cart: Option<i32> =
    sqlx::query_scalar("SELECT quantity FROM cart_items WHERE user_id = $1 AND product_id = $2")
      .bind(auth_user.user_id)
      .bind(req_payload.product_id)
      .fetch_optional(&app_state.db_pool)
      .await?;
  let requested_total = already_in_cart.unwrap_or(0) + req_payload.quantity;
  if requested_total > stock {
    warn!(
      "Insufficient stock for product {}. Available: {}, Requested: {}.",
      req_payload.product_id, stock, requested_total
    );
    return Err(AppError::Validation(format!(
      "Insufficient stock. Only {} available.",
      stock
    )));
  }

  let cart_item: CartItem = sqlx::query_as(
    "INSERT INTO cart_items (id, user_id, product_id, quantity, added_at) \
     VALUES ($1, $2, $3, $4, NOW()) \
     ON CONFLICT (user_id, product_id) DO UPDATE \
     SET quantity = cart_items.quantity + EXCLUDED.quantity, added_at = NOW() \
     RETURNING id, user_id, product_id, quantity, added_at",
  )
  .bind(Uuid::new_v4())
  .bind(auth_user.user_id)
  .bind(req_payload.product_id)
  .bind(req_payload.quantity)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(cart_item_id = %cart_item.id, new_quantity = cart_item.quantity, "Cart item added/updated.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item added to cart successfully.",
      "cartItem": cart_item
  })))
}

#[instrument(
    name = "handler::remove_from_cart",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
    .bind(auth_user.user_id)
    .bind(product_id)
    .execute(&app_state.db_pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound("Cart item not found.".to_string()));
  }

  Ok(HttpResponse::Ok().json(json!({
      "message": "Item removed from cart.",
      "productId": product_id.to_string(),
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(price_cents: i32, quantity: i32) -> CartLine {
    CartLine {
      id: Uuid::new_v4(),
      product_id: Uuid::new_v4(),
      name: "Test Product".to_string(),
      image_url: None,
      price_cents,
      quantity,
    }
  }

  #[test]
  fn subtotal_is_price_times_quantity() {
    assert_eq!(line(150_000, 2).subtotal_cents(), 300_000);
  }

  #[test]
  fn cart_total_sums_subtotals() {
    let lines = vec![line(150_000, 2), line(750_000, 1)];
    assert_eq!(cart_total_cents(&lines), 1_050_000);
  }

  #[test]
  fn empty_cart_totals_zero() {
    assert_eq!(cart_total_cents(&[]), 0);
  }

  #[test]
  fn large_carts_do_not_overflow_i32() {
    let lines = vec![line(i32::MAX, 1000)];
    assert_eq!(cart_total_cents(&lines), i32::MAX as i64 * 1000);
  }
}
