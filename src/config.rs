// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// Lifetime of a login session, in hours.
  pub session_ttl_hours: i64,

  /// Apply schema.sql on startup when true.
  pub apply_schema: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let session_ttl_hours = get_env("SESSION_TTL_HOURS")
      .unwrap_or_else(|_| "336".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_TTL_HOURS: {}", e)))?;
    if session_ttl_hours <= 0 {
      return Err(AppError::Config("SESSION_TTL_HOURS must be positive.".to_string()));
    }

    let apply_schema = get_env("APPLY_SCHEMA")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid APPLY_SCHEMA value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      session_ttl_hours,
      apply_schema,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn clear_env() {
    for var in [
      "SERVER_HOST",
      "SERVER_PORT",
      "DATABASE_URL",
      "SESSION_TTL_HOURS",
      "APPLY_SCHEMA",
    ] {
      env::remove_var(var);
    }
  }

  #[test]
  #[serial]
  fn defaults_applied_when_only_database_url_is_set() {
    clear_env();
    env::set_var("DATABASE_URL", "postgres://localhost/hoopstore_test");

    let cfg = AppConfig::from_env().expect("config should load");
    assert_eq!(cfg.server_host, "127.0.0.1");
    assert_eq!(cfg.server_port, 8080);
    assert_eq!(cfg.session_ttl_hours, 336);
    assert!(!cfg.apply_schema);
  }

  #[test]
  #[serial]
  fn missing_database_url_is_a_config_error() {
    clear_env();

    let err = AppConfig::from_env().expect_err("config should fail");
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  #[serial]
  fn invalid_port_is_rejected() {
    clear_env();
    env::set_var("DATABASE_URL", "postgres://localhost/hoopstore_test");
    env::set_var("SERVER_PORT", "not-a-port");

    let err = AppConfig::from_env().expect_err("config should fail");
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  #[serial]
  fn nonpositive_session_ttl_is_rejected() {
    clear_env();
    env::set_var("DATABASE_URL", "postgres://localhost/hoopstore_test");
    env::set_var("SESSION_TTL_HOURS", "0");

    let err = AppConfig::from_env().expect_err("config should fail");
    assert!(matches!(err, AppError::Config(_)));
  }
}
