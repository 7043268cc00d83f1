// src/bin/import_products.rs

//! Imports products from a JSON seed file, upserting by (name, brand).
//!
//! Usage: `import_products <seed.json> [--update]`

use sqlx::PgPool;
use std::env;
use std::process::ExitCode;
use tracing::Level;

use hoopstore::config::AppConfig;
use hoopstore::services::catalog_import;

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let args: Vec<String> = env::args().skip(1).collect();
  let update = args.iter().any(|a| a == "--update");
  let seed_path = match args.iter().find(|a| !a.starts_with("--")) {
    Some(path) => path.clone(),
    None => {
      eprintln!("Usage: import_products <seed.json> [--update]");
      return ExitCode::from(2);
    }
  };

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load configuration.");
      return ExitCode::FAILURE;
    }
  };

  let contents = match std::fs::read_to_string(&seed_path) {
    Ok(contents) => contents,
    Err(e) => {
      tracing::error!(error = %e, path = %seed_path, "Seed file not found or unreadable.");
      return ExitCode::FAILURE;
    }
  };

  let seeds = match catalog_import::parse_seed_file(&contents) {
    Ok(seeds) => seeds,
    Err(e) => {
      tracing::error!(error = %e, "Seed file is invalid.");
      return ExitCode::FAILURE;
    }
  };

  let pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      return ExitCode::FAILURE;
    }
  };

  match catalog_import::import_products(&pool, &seeds, update).await {
    Ok(stats) => {
      println!(
        "Done. created={}, updated={}, skipped={}",
        stats.created, stats.updated, stats.skipped
      );
      ExitCode::SUCCESS
    }
    Err(e) => {
      tracing::error!(error = %e, "Import failed.");
      ExitCode::FAILURE
    }
  }
}
