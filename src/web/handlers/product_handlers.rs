// src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::{Postgres, QueryBuilder};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Product, Review};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

const PRODUCT_COLUMNS: &str = "id, name, brand, category, price_cents, stock, description, image_url, rating, \
                               is_available, release_date, created_at, updated_at";

#[derive(Deserialize, Debug, Default)]
pub struct ListProductsQuery {
  pub q: Option<String>,
  pub category: Option<String>,
  pub brand: Option<String>,
  pub min_price: Option<i64>,
  pub max_price: Option<i64>,
  pub available: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct ProductPayload {
  pub name: String,
  pub brand: String,
  pub category: String,
  pub price_cents: i32,
  pub stock: i32,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default = "default_available")]
  pub is_available: bool,
  #[serde(default)]
  pub release_date: Option<chrono::NaiveDate>,
}

fn default_available() -> bool {
  true
}

fn validate_product_payload(payload: &ProductPayload) -> Result<(), AppError> {
  if payload.name.trim().is_empty() || payload.brand.trim().is_empty() {
    return Err(AppError::Validation("Product name and brand are required.".to_string()));
  }
  if payload.price_cents < 0 {
    return Err(AppError::Validation("Price cannot be negative.".to_string()));
  }
  if payload.stock < 0 {
    return Err(AppError::Validation("Stock cannot be negative.".to_string()));
  }
  Ok(())
}

/// Translates the catalog filters into a SELECT. Every filter is optional and
/// they combine with AND.
pub fn product_filter_query(filters: &ListProductsQuery) -> QueryBuilder<'static, Postgres> {
  let mut builder = QueryBuilder::new(format!("SELECT {} FROM products WHERE 1=1", PRODUCT_COLUMNS));

  if let Some(q) = filters.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    builder.push(" AND name ILIKE ");
    builder.push_bind(format!("%{}%", q));
  }
  if let Some(category) = filters.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    builder.push(" AND category = ");
    builder.push_bind(category.to_string());
  }
  if let Some(brand) = filters.brand.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    builder.push(" AND brand ILIKE ");
    builder.push_bind(format!("%{}%", brand));
  }
  if let Some(min_price) = filters.min_price {
    builder.push(" AND price_cents >= ");
    builder.push_bind(min_price);
  }
  if let Some(max_price) = filters.max_price {
    builder.push(" AND price_cents <= ");
    builder.push_bind(max_price);
  }
  if let Some(available) = filters.available {
    builder.push(" AND is_available = ");
    builder.push_bind(available);
  }

  builder.push(" ORDER BY name ASC");
  builder
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let products: Vec<Product> = product_filter_query(&query_params)
    .build_query_as()
    .fetch_all(&app_state.db_pool)
    .await?;

  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({
      "message": "Products fetched successfully.",
      "products": products
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let product: Option<Product> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
    .bind(product_id)
    .fetch_optional(&app_state.db_pool)
    .await?;

  match product {
    Some(product) => Ok(HttpResponse::Ok().json(json!({
        "message": "Product fetched successfully.",
        "product": product
    }))),
    None => {
      warn!("Product {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

#[instrument(name = "handler::create_product", skip(app_state, req_payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ProductPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.require_staff()?;
  validate_product_payload(&req_payload)?;

  let product: Product = sqlx::query_as(&format!(
    "INSERT INTO products (id, name, brand, category, price_cents, stock, description, image_url, \
     is_available, release_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
    PRODUCT_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(req_payload.name.trim())
  .bind(req_payload.brand.trim())
  .bind(req_payload.category.trim())
  .bind(req_payload.price_cents)
  .bind(req_payload.stock)
  .bind(&req_payload.description)
  .bind(&req_payload.image_url)
  .bind(req_payload.is_available)
  .bind(req_payload.release_date)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(product_id = %product.id, "Product created.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Product created successfully.",
      "product": product
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, req_payload, auth_user, path), fields(product_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<ProductPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.require_staff()?;
  validate_product_payload(&req_payload)?;
  let product_id = path.into_inner();

  let product: Option<Product> = sqlx::query_as(&format!(
    "UPDATE products SET name = $1, brand = $2, category = $3, price_cents = $4, stock = $5, \
     description = $6, image_url = $7, is_available = $8, release_date = $9, updated_at = NOW() \
     WHERE id = $10 RETURNING {}",
    PRODUCT_COLUMNS
  ))
  .bind(req_payload.name.trim())
  .bind(req_payload.brand.trim())
  .bind(req_payload.category.trim())
  .bind(req_payload.price_cents)
  .bind(req_payload.stock)
  .bind(&req_payload.description)
  .bind(&req_payload.image_url)
  .bind(req_payload.is_available)
  .bind(req_payload.release_date)
  .bind(product_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match product {
    Some(product) => Ok(HttpResponse::Ok().json(json!({
        "message": "Product updated successfully.",
        "product": product
    }))),
    None => Err(AppError::NotFound(format!("Product with ID {} not found.", product_id))),
  }
}

#[instrument(name = "handler::delete_product", skip(app_state, auth_user, path), fields(product_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.require_staff()?;
  let product_id = path.into_inner();

  let result = sqlx::query("DELETE FROM products WHERE id = $1")
    .bind(product_id)
    .execute(&app_state.db_pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }

  info!("Product {} deleted.", product_id);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Product deleted successfully.",
      "productId": product_id.to_string(),
  })))
}

#[instrument(name = "handler::product_reviews", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn product_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if exists.is_none() {
    return Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)));
  }

  let reviews: Vec<Review> = sqlx::query_as(
    "SELECT id, user_id, product_id, rating, body, created_at, updated_at \
     FROM reviews WHERE product_id = $1 ORDER BY created_at DESC",
  )
  .bind(product_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Reviews fetched successfully.",
      "reviews": reviews
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_filters_means_plain_ordered_select() {
    let mut builder = product_filter_query(&ListProductsQuery::default());
    let sql = builder.sql();
    assert!(sql.starts_with("SELECT "));
    assert!(!sql.contains("AND"));
    assert!(sql.ends_with("ORDER BY name ASC"));
  }

  #[test]
  fn each_filter_adds_its_clause() {
    let filters = ListProductsQuery {
      q: Some("jersey".to_string()),
      category: Some("Jersey".to_string()),
      brand: Some("nike".to_string()),
      min_price: Some(100),
      max_price: Some(900_000),
      available: Some(true),
    };
    let mut builder = product_filter_query(&filters);
    let sql = builder.sql();

    assert!(sql.contains("name ILIKE"));
    assert!(sql.contains("category ="));
    assert!(sql.contains("brand ILIKE"));
    assert!(sql.contains("price_cents >="));
    assert!(sql.contains("price_cents <="));
    assert!(sql.contains("is_available ="));
  }

  #[test]
  fn blank_filter_strings_are_ignored() {
    let filters = ListProductsQuery {
      q: Some("   ".to_string()),
      category: Some(String::new()),
      ..Default::default()
    };
    let mut builder = product_filter_query(&filters);
    assert!(!builder.sql().contains("AND"));
  }

  #[test]
  fn payload_validation_catches_bad_fields() {
    let mut payload = ProductPayload {
      name: "Street Ball".to_string(),
      brand: "Spalding".to_string(),
      category: "Ball".to_string(),
      price_cents: 250_000,
      stock: 10,
      description: String::new(),
      image_url: None,
      is_available: true,
      release_date: None,
    };
    assert!(validate_product_payload(&payload).is_ok());

    payload.price_cents = -1;
    assert!(validate_product_payload(&payload).is_err());

    payload.price_cents = 0;
    payload.name = "  ".to_string();
    assert!(validate_product_payload(&payload).is_err());
  }
}
