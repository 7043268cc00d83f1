// src/web/handlers/report_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Report, ReportType};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

const REPORT_COLUMNS: &str = "id, reporter_id, report_type, reported_product_id, reported_review_id, \
                              reported_user_id, status, title, description, created_at, updated_at";

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct CreateReportPayload {
  pub title: String,
  #[serde(default)]
  pub description: String,
  pub report_type: ReportType,
  pub object_id: Uuid,
}

#[derive(Deserialize, Debug)]
pub struct UpdateReportPayload {
  pub title: String,
  #[serde(default)]
  pub description: String,
}

/// Removes anything between `<` and `>`, the same cleanup the report form
/// applies to user-submitted titles and descriptions.
pub fn strip_tags(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  let mut in_tag = false;
  for c in input.chars() {
    match c {
      '<' => in_tag = true,
      '>' if in_tag => in_tag = false,
      c if !in_tag => out.push(c),
      _ => {}
    }
  }
  out
}

fn clean_report_fields(title: &str, description: &str) -> Result<(String, String), AppError> {
  let title = strip_tags(title).trim().to_string();
  let description = strip_tags(description).trim().to_string();
  if title.is_empty() {
    return Err(AppError::Validation("Title is required.".to_string()));
  }
  Ok((title, description))
}

// Verifies the reported object exists before a report can point at it.
async fn check_target_exists(
  app_state: &AppState,
  report_type: ReportType,
  object_id: Uuid,
) -> Result<(), AppError> {
  let query = match report_type {
    ReportType::Product => "SELECT 1 FROM products WHERE id = $1",
    ReportType::Review => "SELECT 1 FROM reviews WHERE id = $1",
    ReportType::User => "SELECT 1 FROM users WHERE id = $1",
  };
  let exists: Option<i32> = sqlx::query_scalar(query)
    .bind(object_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if exists.is_none() {
    warn!("Report target {:?} {} not found.", report_type, object_id);
    return Err(AppError::NotFound(format!(
      "Reported {:?} with ID {} not found.",
      report_type, object_id
    )));
  }
  Ok(())
}

#[instrument(name = "handler::list_reports", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_reports_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let reports: Vec<Report> = sqlx::query_as(&format!(
    "SELECT {} FROM reports WHERE reporter_id = $1 ORDER BY created_at DESC",
    REPORT_COLUMNS
  ))
  .bind(auth_user.user_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Reports fetched successfully.",
      "reports": reports
  })))
}

#[instrument(
    name = "handler::get_report",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, report_id = %path.as_ref())
)]
pub async fn get_report_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let report_id = path.into_inner();

  let report: Option<Report> = sqlx::query_as(&format!(
    "SELECT {} FROM reports WHERE id = $1 AND reporter_id = $2",
    REPORT_COLUMNS
  ))
  .bind(report_id)
  .bind(auth_user.user_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match report {
    Some(report) => Ok(HttpResponse::Ok().json(json!({
        "message": "Report fetched successfully.",
        "report": report
    }))),
    None => Err(AppError::NotFound(format!("Report with ID {} not found.", report_id))),
  }
}

#[instrument(
    name = "handler::create_report",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, report_type = ?req_payload.report_type)
)]
pub async fn create_report_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreateReportPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (title, description) = clean_report_fields(&req_payload.title, &req_payload.description)?;
  check_target_exists(&app_state, req_payload.report_type, req_payload.object_id).await?;

  let (product_id, review_id, user_id) = match req_payload.report_type {
    ReportType::Product => (Some(req_payload.object_id), None, None),
    ReportType::Review => (None, Some(req_payload.object_id), None),
    ReportType::User => (None, None, Some(req_payload.object_id)),
  };

  let report: Report = sqlx::query_as(&format!(
    "INSERT INTO reports (id, reporter_id, report_type, reported_product_id, reported_review_id, \
     reported_user_id, title, description) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
    REPORT_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(auth_user.user_id)
  .bind(req_payload.report_type)
  .bind(product_id)
  .bind(review_id)
  .bind(user_id)
  .bind(&title)
  .bind(&description)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(report_id = %report.id, "Report created.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Report submitted successfully.",
      "report": report
  })))
}

#[instrument(
    name = "handler::update_report",
    skip(app_state, req_payload, auth_user, path),
    fields(user_id = %auth_user.user_id, report_id = %path.as_ref())
)]
pub async fn update_report_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateReportPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (title, description) = clean_report_fields(&req_payload.title, &req_payload.description)?;
  let report_id = path.into_inner();

  let report: Option<Report> = sqlx::query_as(&format!(
    "UPDATE reports SET title = $1, description = $2, updated_at = NOW() \
     WHERE id = $3 AND reporter_id = $4 RETURNING {}",
    REPORT_COLUMNS
  ))
  .bind(&title)
  .bind(&description)
  .bind(report_id)
  .bind(auth_user.user_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match report {
    Some(report) => Ok(HttpResponse::Ok().json(json!({
        "message": "Report successfully updated.",
        "report": report
    }))),
    None => Err(AppError::NotFound(format!("Report with ID {} not found.", report_id))),
  }
}

#[instrument(
    name = "handler::delete_report",
    skip(app_state, auth_user, path),
    fields(user_id = %auth_user.user_id, report_id = %path.as_ref())
)]
pub async fn delete_report_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let report_id = path.into_inner();

  let result = sqlx::query("DELETE FROM reports WHERE id = $1 AND reporter_id = $2")
    .bind(report_id)
    .bind(auth_user.user_id)
    .execute(&app_state.db_pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Report with ID {} not found.", report_id)));
  }

  Ok(HttpResponse::Ok().json(json!({
      "message": "Report deleted successfully!",
      "reportId": report_id.to_string(),
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strip_tags_removes_markup_but_keeps_text() {
    assert_eq!(strip_tags("<b>Broken</b> ball"), "Broken ball");
    assert_eq!(strip_tags("no markup at all"), "no markup at all");
    assert_eq!(strip_tags("<script>alert('x')</script>"), "alert('x')");
  }

  #[test]
  fn strip_tags_handles_unclosed_tags() {
    assert_eq!(strip_tags("dangling <i>tail"), "dangling tail");
    assert_eq!(strip_tags("text < not a tag"), "text ");
  }

  #[test]
  fn title_made_of_only_markup_is_rejected() {
    let err = clean_report_fields("<b></b>", "fine").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn cleaned_fields_are_trimmed() {
    let (title, description) = clean_report_fields("  Misleading listing ", " <i>details</i> ").unwrap();
    assert_eq!(title, "Misleading listing");
    assert_eq!(description, "details");
  }
}
