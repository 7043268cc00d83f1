// src/services/auth.rs

//! Password hashing/verification and DB-backed login sessions.

use crate::errors::AppError;
use crate::models::{Session, User};
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on a simple mismatch; errors are reserved for a
/// malformed stored hash or an internal Argon2 failure.
#[instrument(name = "auth::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if stored_hash.is_empty() || provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(other) => {
      error!(error = %other, "Argon2 password verification encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other
      )))
    }
  }
}

/// Issues a new session token for `user_id`.
#[instrument(name = "auth::create_session", skip(pool), err(Display))]
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_hours: i64) -> Result<Session, AppError> {
  let now = Utc::now();
  let session: Session = sqlx::query_as(
    "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4) \
     RETURNING token, user_id, created_at, expires_at",
  )
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(now)
  .bind(now + Duration::hours(ttl_hours))
  .fetch_one(pool)
  .await?;

  debug!(user_id = %user_id, "Session created.");
  Ok(session)
}

/// Deletes a session token. Returns whether a row was actually removed.
#[instrument(name = "auth::revoke_session", skip_all, err(Display))]
pub async fn revoke_session(pool: &PgPool, token: Uuid) -> Result<bool, AppError> {
  let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() > 0)
}

/// Resolves a session token to its user, ignoring expired sessions.
#[instrument(name = "auth::user_for_token", skip_all, err(Display))]
pub async fn user_for_token(pool: &PgPool, token: Uuid) -> Result<Option<User>, AppError> {
  let user: Option<User> = sqlx::query_as(
    "SELECT u.id, u.username, u.password_hash, u.is_staff, u.created_at, u.updated_at \
     FROM sessions s JOIN users u ON u.id = s.user_id \
     WHERE s.token = $1 AND s.expires_at > NOW()",
  )
  .bind(token)
  .fetch_optional(pool)
  .await?;
  Ok(user)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_roundtrip() {
    let hash = hash_password("hunter2hunter2").expect("hashing should succeed");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "hunter2hunter2").unwrap());
  }

  #[test]
  fn wrong_password_does_not_verify() {
    let hash = hash_password("correct-horse-battery").expect("hashing should succeed");
    assert!(!verify_password(&hash, "incorrect-horse").unwrap());
  }

  #[test]
  fn empty_password_cannot_be_hashed() {
    let err = hash_password("").expect_err("empty password must be rejected");
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn empty_inputs_never_verify() {
    let hash = hash_password("some-password").unwrap();
    assert!(!verify_password(&hash, "").unwrap());
    assert!(!verify_password("", "some-password").unwrap());
  }

  #[test]
  fn garbage_stored_hash_is_an_internal_error() {
    let err = verify_password("not-a-phc-string", "whatever").expect_err("must fail");
    assert!(matches!(err, AppError::Internal(_)));
  }

  #[test]
  fn salts_differ_between_hashes() {
    let a = hash_password("same-password").unwrap();
    let b = hash_password("same-password").unwrap();
    assert_ne!(a, b);
  }
}
