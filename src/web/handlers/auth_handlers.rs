// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::User;
use crate::services::auth as auth_service;
use crate::state::AppState;
use crate::web::auth::{session_token_from_request, AuthenticatedUser};

pub const MIN_PASSWORD_LEN: usize = 8;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub username: String,
  pub password1: String,
  pub password2: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub username: String,
  pub password: String,
}

// Checks the register form fields before any database work.
pub fn validate_registration(payload: &RegisterRequestPayload) -> Result<String, AppError> {
  let username = payload.username.trim().to_string();

  if username.is_empty() || payload.password1.is_empty() || payload.password2.is_empty() {
    return Err(AppError::Validation("All fields are required.".to_string()));
  }
  if payload.password1 != payload.password2 {
    return Err(AppError::Validation(
      "Password and confirmation do not match.".to_string(),
    ));
  }
  if payload.password1.len() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters.",
      MIN_PASSWORD_LEN
    )));
  }
  Ok(username)
}

#[instrument(
    name = "handler::register",
    skip(app_state, req_payload),
    fields(req_username = %req_payload.username)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let username = validate_registration(&req_payload)?;

  let taken: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
    .bind(&username)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if taken.is_some() {
    warn!("Registration rejected: username already taken.");
    return Err(AppError::Validation("Username is already taken.".to_string()));
  }

  let password_hash = auth_service::hash_password(&req_payload.password1)?;
  let user: User = sqlx::query_as(
    "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) \
     RETURNING id, username, password_hash, is_staff, created_at, updated_at",
  )
  .bind(Uuid::new_v4())
  .bind(&username)
  .bind(&password_hash)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(user_id = %user.id, "User registered.");
  Ok(HttpResponse::Created().json(json!({
      "message": "User created successfully.",
      "userId": user.id.to_string(),
      "username": user.username,
  })))
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload),
    fields(req_username = %req_payload.username)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let username = req_payload.username.trim();
  if username.is_empty() || req_payload.password.is_empty() {
    return Err(AppError::Auth("Invalid username or password.".to_string()));
  }

  let user: Option<User> = sqlx::query_as(
    "SELECT id, username, password_hash, is_staff, created_at, updated_at FROM users WHERE username = $1",
  )
  .bind(username)
  .fetch_optional(&app_state.db_pool)
  .await?;

  let user = match user {
    Some(user) if auth_service::verify_password(&user.password_hash, &req_payload.password)? => user,
    _ => {
      warn!("Login failed: bad credentials.");
      return Err(AppError::Auth("Invalid username or password.".to_string()));
    }
  };

  let session = auth_service::create_session(&app_state.db_pool, user.id, app_state.config.session_ttl_hours).await?;

  info!(user_id = %user.id, "Login successful.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Login successful.",
      "token": session.token.to_string(),
      "userId": user.id.to_string(),
      "username": user.username,
  })))
}

#[instrument(name = "handler::logout", skip(app_state, req))]
pub async fn logout_handler(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
  let token = session_token_from_request(&req)?;
  auth_service::revoke_session(&app_state.db_pool, token).await?;

  Ok(HttpResponse::Ok().json(json!({"message": "Logged out."})))
}

#[instrument(name = "handler::me", skip(auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({
      "user": {
          "id": auth_user.user_id.to_string(),
          "username": auth_user.username,
          "isStaff": auth_user.is_staff,
      }
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(username: &str, p1: &str, p2: &str) -> RegisterRequestPayload {
    RegisterRequestPayload {
      username: username.to_string(),
      password1: p1.to_string(),
      password2: p2.to_string(),
    }
  }

  #[test]
  fn valid_registration_passes_and_trims_username() {
    let username = validate_registration(&payload("  coach ", "longenough", "longenough")).unwrap();
    assert_eq!(username, "coach");
  }

  #[test]
  fn blank_fields_are_rejected() {
    assert!(validate_registration(&payload("", "longenough", "longenough")).is_err());
    assert!(validate_registration(&payload("coach", "", "")).is_err());
  }

  #[test]
  fn mismatched_passwords_are_rejected() {
    let err = validate_registration(&payload("coach", "longenough", "different")).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn short_passwords_are_rejected() {
    let err = validate_registration(&payload("coach", "short", "short")).unwrap_err();
    match err {
      AppError::Validation(msg) => assert!(msg.contains("at least 8")),
      other => panic!("expected validation error, got {:?}", other),
    }
  }
}
