// src/web/handlers/review_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgConnection;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Review;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

const REVIEW_COLUMNS: &str = "id, user_id, product_id, rating, body, created_at, updated_at";

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct ReviewPayload {
  pub rating: i32,
  #[serde(default)]
  pub body: Option<String>,
}

pub fn validate_rating(rating: i32) -> Result<(), AppError> {
  if !(1..=5).contains(&rating) {
    return Err(AppError::Validation("Rating must be between 1 and 5.".to_string()));
  }
  Ok(())
}

// Keeps products.rating in sync with the review rows.
async fn recompute_product_rating(conn: &mut PgConnection, product_id: Uuid) -> Result<(), AppError> {
  sqlx::query(
    "UPDATE products SET rating = COALESCE((SELECT AVG(rating) FROM reviews WHERE product_id = $1), 0), \
     updated_at = NOW() WHERE id = $1",
  )
  .bind(product_id)
  .execute(conn)
  .await?;
  Ok(())
}

#[instrument(name = "handler::list_my_reviews", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_my_reviews_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let reviews: Vec<Review> = sqlx::query_as(&format!(
    "SELECT {} FROM reviews WHERE user_id = $1 ORDER BY created_at DESC",
    REVIEW_COLUMNS
  ))
  .bind(auth_user.user_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Reviews fetched successfully.",
      "reviews": reviews
  })))
}

#[instrument(
    name = "handler::create_review",
    skip(app_state, req_payload, auth_user, path),
    fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn create_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<ReviewPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  validate_rating(req_payload.rating)?;
  let product_id = path.into_inner();

  let mut tx = app_state.db_pool.begin().await?;

  let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?;
  if exists.is_none() {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }

  let review: Review = sqlx::query_as(&format!(
    "INSERT INTO reviews (id, user_id, product_id, rating, body) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
    REVIEW_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(auth_user.user_id)
  .bind(product_id)
  .bind(req_payload.rating)
  .bind(&req_payload.body)
  .fetch_one(&mut *tx)
  .await?;

  recompute_product_rating(&mut tx, product_id).await?;
  tx.commit().await?;

  info!(review_id = %review.id, "Review added.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Review added!",
      "review": review
  })))
}

#[instrument(
    name = "handler::update_review",
    skip(app_state, req_payload, auth_user, path),
    fields(user_id = %auth_user.user_id, review_id = %path.as_ref())
)]
pub async fn update_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<ReviewPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  validate_rating(req_payload.rating)?;
  let review_id = path.into_inner();

  let mut tx = app_state.db_pool.begin().await?;

  let review: Option<Review> = sqlx::query_as(&format!(
    "UPDATE reviews SET rating = $1, body = $2, updated_at = NOW() \
     WHERE id = $3 AND user_id = $4 RETURNING {}",
    REVIEW_COLUMNS
  ))
  .bind(req_payload.rating)
  .bind(&req_payload.body)
  .bind(review_id)
  .bind(auth_user.user_id)
  .fetch_optional(&mut *tx)
  .await?;

  let review = review.ok_or_else(|| AppError::NotFound(format!("Review with ID {} not found.", review_id)))?;

  recompute_product_rating(&mut tx, review.product_id).await?;
  tx.commit().await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Review updated!",
      "review": review
  })))
}

#[instrument(
    name = "handler::delete_review",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, review_id = %path.as_ref())
)]
pub async fn delete_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let review_id = path.into_inner();

  let mut tx = app_state.db_pool.begin().await?;

  let product_id: Option<Uuid> =
    sqlx::query_scalar("DELETE FROM reviews WHERE id = $1 AND user_id = $2 RETURNING product_id")
      .bind(review_id)
      .bind(auth_user.user_id)
      .fetch_optional(&mut *tx)
      .await?;

  let product_id = product_id.ok_or_else(|| AppError::NotFound(format!("Review with ID {} not found.", review_id)))?;

  recompute_product_rating(&mut tx, product_id).await?;
  tx.commit().await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Review deleted!",
      "reviewId": review_id.to_string(),
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ratings_outside_one_to_five_are_rejected() {
    assert!(validate_rating(0).is_err());
    assert!(validate_rating(6).is_err());
    assert!(validate_rating(-3).is_err());
  }

  #[test]
  fn boundary_ratings_are_accepted() {
    assert!(validate_rating(1).is_ok());
    assert!(validate_rating(5).is_ok());
  }
}
