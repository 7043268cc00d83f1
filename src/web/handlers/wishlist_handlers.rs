// src/web/handlers/wishlist_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::FromRow;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::WishlistItem;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

/// One wishlist row joined with its product, as returned by GET /wishlist.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WishlistLine {
  pub id: Uuid,
  pub product_id: Uuid,
  pub name: String,
  pub brand: String,
  pub price_cents: i32,
  pub image_url: Option<String>,
  pub is_available: bool,
  pub added_at: DateTime<Utc>,
}

async fn ensure_product_exists(app_state: &AppState, product_id: Uuid) -> Result<(), AppError> {
  let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if exists.is_none() {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }
  Ok(())
}

#[instrument(name = "handler::list_wishlist", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_wishlist_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let items: Vec<WishlistLine> = sqlx::query_as(
    "SELECT w.id, w.product_id, p.name, p.brand, p.price_cents, p.image_url, p.is_available, w.added_at \
     FROM wishlist_items w JOIN products p ON p.id = w.product_id \
     WHERE w.user_id = $1 ORDER BY w.added_at DESC",
  )
  .bind(auth_user.user_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Wishlist fetched successfully.",
      "items": items
  })))
}

#[instrument(
    name = "handler::add_to_wishlist",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn add_to_wishlist_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  ensure_product_exists(&app_state, product_id).await?;

  // get-or-create: the unique (user_id, product_id) constraint decides.
  let result = sqlx::query(
    "INSERT INTO wishlist_items (id, user_id, product_id) VALUES ($1, $2, $3) \
     ON CONFLICT (user_id, product_id) DO NOTHING",
  )
  .bind(Uuid::new_v4())
  .bind(auth_user.user_id)
  .bind(product_id)
  .execute(&app_state.db_pool)
  .await?;

  let created = result.rows_affected() > 0;
  let body = json!({
      "created": created,
      "productId": product_id.to_string(),
      "message": if created { "Added to wishlist" } else { "Already in wishlist" },
  });
  if created {
    info!("Product {} added to wishlist.", product_id);
    Ok(HttpResponse::Created().json(body))
  } else {
    Ok(HttpResponse::Ok().json(body))
  }
}

#[instrument(
    name = "handler::toggle_wishlist",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn toggle_wishlist_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  ensure_product_exists(&app_state, product_id).await?;

  let removed = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
    .bind(auth_user.user_id)
    .bind(product_id)
    .execute(&app_state.db_pool)
    .await?
    .rows_affected()
    > 0;

  let status = if removed {
    "removed"
  } else {
    sqlx::query("INSERT INTO wishlist_items (id, user_id, product_id) VALUES ($1, $2, $3)")
      .bind(Uuid::new_v4())
      .bind(auth_user.user_id)
      .bind(product_id)
      .execute(&app_state.db_pool)
      .await?;
    "added"
  };

  Ok(HttpResponse::Ok().json(json!({
      "status": status,
      "productId": product_id.to_string(),
  })))
}

#[instrument(
    name = "handler::remove_from_wishlist",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, wishlist_id = %path.as_ref())
)]
pub async fn remove_from_wishlist_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let wishlist_id = path.into_inner();

  let item: Option<WishlistItem> =
    sqlx::query_as("SELECT id, user_id, product_id, added_at FROM wishlist_items WHERE id = $1")
      .bind(wishlist_id)
      .fetch_optional(&app_state.db_pool)
      .await?;

  let item = item.ok_or_else(|| AppError::NotFound(format!("Wishlist item {} not found.", wishlist_id)))?;

  // Owners remove their own items; staff may remove anyone's.
  if item.user_id != auth_user.user_id && !auth_user.is_staff {
    return Err(AppError::Forbidden(
      "You don't have permission to remove this item.".to_string(),
    ));
  }

  sqlx::query("DELETE FROM wishlist_items WHERE id = $1")
    .bind(wishlist_id)
    .execute(&app_state.db_pool)
    .await?;

  Ok(HttpResponse::Ok().json(json!({
      "deleted": true,
      "wishlistId": wishlist_id.to_string(),
  })))
}
