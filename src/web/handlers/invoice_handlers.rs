// src/web/handlers/invoice_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Invoice;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

const INVOICE_COLUMNS: &str = "id, order_id, user_id, invoice_no, issued_on, created_at";

#[instrument(name = "handler::list_invoices", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_invoices_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let invoices: Vec<Invoice> = sqlx::query_as(&format!(
    "SELECT {} FROM invoices WHERE user_id = $1 ORDER BY created_at DESC",
    INVOICE_COLUMNS
  ))
  .bind(auth_user.user_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Invoices fetched successfully.",
      "invoices": invoices
  })))
}

#[instrument(
    name = "handler::get_invoice",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, invoice_id = %path.as_ref())
)]
pub async fn get_invoice_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let invoice_id = path.into_inner();

  let invoice: Option<Invoice> = sqlx::query_as(&format!(
    "SELECT {} FROM invoices WHERE id = $1 AND user_id = $2",
    INVOICE_COLUMNS
  ))
  .bind(invoice_id)
  .bind(auth_user.user_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match invoice {
    Some(invoice) => Ok(HttpResponse::Ok().json(json!({
        "message": "Invoice fetched successfully.",
        "invoice": invoice
    }))),
    None => Err(AppError::NotFound(format!("Invoice with ID {} not found.", invoice_id))),
  }
}
