// src/web/auth.rs

//! Request authentication: resolves the `X-Session-Token` header against the
//! sessions table and exposes the caller as an extractor.

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth as auth_service;
use crate::state::AppState;

pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub username: String,
  pub is_staff: bool,
}

impl AuthenticatedUser {
  pub fn require_staff(&self) -> Result<(), AppError> {
    if self.is_staff {
      Ok(())
    } else {
      Err(AppError::Forbidden("Staff privileges required.".to_string()))
    }
  }
}

/// Pulls the session token out of the request headers.
pub fn session_token_from_request(req: &HttpRequest) -> Result<Uuid, AppError> {
  let header = req
    .headers()
    .get(SESSION_TOKEN_HEADER)
    .and_then(|value| value.to_str().ok())
    .ok_or_else(|| AppError::Auth(format!("Missing {} header.", SESSION_TOKEN_HEADER)))?;

  Uuid::parse_str(header).map_err(|_| AppError::Auth(format!("Invalid {} header.", SESSION_TOKEN_HEADER)))
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let token_result = session_token_from_request(req);
    let app_state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let token = token_result?;
      let app_state =
        app_state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

      match auth_service::user_for_token(&app_state.db_pool, token).await? {
        Some(user) => Ok(AuthenticatedUser {
          user_id: user.id,
          username: user.username,
          is_staff: user.is_staff,
        }),
        None => {
          warn!("Rejected request with unknown or expired session token.");
          Err(AppError::Auth("Invalid or expired session token.".to_string()))
        }
      }
    })
  }
}
