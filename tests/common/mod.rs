// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use actix_web::web;
use once_cell::sync::Lazy;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use hoopstore::config::AppConfig;
use hoopstore::state::AppState;

static TRACING: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

/// App state backed by a pool that never actually connects, so tests can
/// exercise everything that fails before the first query: routing, JSON
/// validation and the session-token extractor's header checks.
pub fn lazy_test_state() -> web::Data<AppState> {
  let config = AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: "postgres://postgres@127.0.0.1:1/hoopstore_test".to_string(),
    session_ttl_hours: 1,
    apply_schema: false,
  };
  let db_pool = PgPoolOptions::new()
    .connect_lazy(&config.database_url)
    .expect("lazy pool construction should not fail");

  web::Data::new(AppState {
    db_pool,
    config: Arc::new(config),
  })
}
