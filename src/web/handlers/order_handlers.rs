// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Order, OrderItem};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

const ORDER_COLUMNS: &str = "id, user_id, full_name, address, city, postal_code, status, total_cents, created_at";

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders: Vec<Order> = sqlx::query_as(&format!(
    "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    ORDER_COLUMNS
  ))
  .bind(auth_user.user_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Orders fetched successfully.",
      "orders": orders
  })))
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();

  let order: Option<Order> = sqlx::query_as(&format!(
    "SELECT {} FROM orders WHERE id = $1 AND user_id = $2",
    ORDER_COLUMNS
  ))
  .bind(order_id)
  .bind(auth_user.user_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  let order = order.ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found.", order_id)))?;

  let items: Vec<OrderItem> = sqlx::query_as(
    "SELECT id, order_id, product_id, quantity, price_at_purchase_cents \
     FROM order_items WHERE order_id = $1",
  )
  .bind(order_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  let items: Vec<_> = items
    .iter()
    .map(|item| {
      json!({
          "id": item.id,
          "productId": item.product_id,
          "quantity": item.quantity,
          "priceAtPurchaseCents": item.price_at_purchase_cents,
          "lineTotalCents": item.line_total_cents(),
      })
    })
    .collect();

  Ok(HttpResponse::Ok().json(json!({
      "message": "Order fetched successfully.",
      "order": order,
      "items": items
  })))
}
