// src/services/catalog_import.rs

//! Product seed-file import: parses a JSON array of product records and
//! upserts them by (name, brand). Used by the `import_products` binary.

use crate::errors::AppError;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

/// One record as it appears in the seed file. Price and stock are `Value`
/// because exported datasets mix numbers with strings like "549.000".
#[derive(Debug, Deserialize)]
pub struct RawProductRecord {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub brand: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub price: Option<Value>,
  #[serde(default)]
  pub stock: Option<Value>,
  #[serde(default)]
  pub release_date: Option<String>,
}

/// A record cleaned up and ready for the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSeed {
  pub name: String,
  pub brand: String,
  pub category: String,
  pub description: String,
  pub image_url: Option<String>,
  pub price_cents: i32,
  pub stock: i32,
  pub is_available: bool,
  pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
  pub created: u64,
  pub updated: u64,
  pub skipped: u64,
}

/// Parses a date in any of the formats seen in exported datasets.
pub fn parse_seed_date(s: &str) -> Result<NaiveDate, AppError> {
  let trimmed = s.trim();
  for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"] {
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
      return Ok(date);
    }
  }
  Err(AppError::Validation(format!("Unknown date format: {:?}", trimmed)))
}

// Accepts 549000, "549000" or "549.000" (thousand separators), defaulting to 0.
fn lenient_int(value: Option<&Value>) -> i32 {
  match value {
    Some(Value::Number(n)) => n.as_i64().unwrap_or(0).clamp(0, i32::MAX as i64) as i32,
    Some(Value::String(s)) => {
      let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
      digits.parse::<i64>().unwrap_or(0).clamp(0, i32::MAX as i64) as i32
    }
    _ => 0,
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ProductSeed {
  /// Cleans one raw record. `index` is only used for error messages.
  pub fn from_raw(raw: RawProductRecord, index: usize) -> Result<Self, AppError> {
    let name =
      non_empty(raw.name).ok_or_else(|| AppError::Validation(format!("Record {}: missing product name.", index)))?;
    let brand =
      non_empty(raw.brand).ok_or_else(|| AppError::Validation(format!("Record {}: missing product brand.", index)))?;

    let stock_provided = raw.stock.is_some();
    let stock = lenient_int(raw.stock.as_ref());
    let release_date = match raw.release_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
      Some(s) => Some(parse_seed_date(s)?),
      None => None,
    };

    Ok(Self {
      name,
      brand,
      category: non_empty(raw.category).unwrap_or_default(),
      description: non_empty(raw.description).unwrap_or_default(),
      image_url: non_empty(raw.image),
      price_cents: lenient_int(raw.price.as_ref()),
      stock,
      // Rows without a stock column are listed as available.
      is_available: if stock_provided { stock > 0 } else { true },
      release_date,
    })
  }
}

/// Parses the whole seed file into cleaned records.
pub fn parse_seed_file(contents: &str) -> Result<Vec<ProductSeed>, AppError> {
  let raw_records: Vec<RawProductRecord> =
    serde_json::from_str(contents).map_err(|e| AppError::Validation(format!("Invalid seed file: {}", e)))?;

  raw_records
    .into_iter()
    .enumerate()
    .map(|(index, raw)| ProductSeed::from_raw(raw, index))
    .collect()
}

/// Upserts the records by (name, brand) inside one transaction. Existing rows
/// are overwritten when `update` is set and skipped otherwise.
#[instrument(name = "catalog_import::import_products", skip(pool, seeds), fields(record_count = seeds.len()))]
pub async fn import_products(pool: &PgPool, seeds: &[ProductSeed], update: bool) -> Result<ImportStats, AppError> {
  let mut stats = ImportStats::default();
  let mut tx = pool.begin().await?;

  for seed in seeds {
    let existing_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM products WHERE name = $1 AND brand = $2")
      .bind(&seed.name)
      .bind(&seed.brand)
      .fetch_optional(&mut *tx)
      .await?;

    match existing_id {
      Some(id) if update => {
        sqlx::query(
          "UPDATE products SET category = $1, description = $2, image_url = $3, price_cents = $4, \
           stock = $5, is_available = $6, release_date = $7, updated_at = NOW() WHERE id = $8",
        )
        .bind(&seed.category)
        .bind(&seed.description)
        .bind(&seed.image_url)
        .bind(seed.price_cents)
        .bind(seed.stock)
        .bind(seed.is_available)
        .bind(seed.release_date)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        stats.updated += 1;
      }
      Some(_) => {
        stats.skipped += 1;
      }
      None => {
        sqlx::query(
          "INSERT INTO products (id, name, brand, category, price_cents, stock, description, image_url, \
           is_available, release_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(Uuid::new_v4())
        .bind(&seed.name)
        .bind(&seed.brand)
        .bind(&seed.category)
        .bind(seed.price_cents)
        .bind(seed.stock)
        .bind(&seed.description)
        .bind(&seed.image_url)
        .bind(seed.is_available)
        .bind(seed.release_date)
        .execute(&mut *tx)
        .await?;
        stats.created += 1;
      }
    }
  }

  tx.commit().await?;
  info!(
    created = stats.created,
    updated = stats.updated,
    skipped = stats.skipped,
    "Product import finished."
  );
  Ok(stats)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_all_supported_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2025, 10, 23).unwrap();
    assert_eq!(parse_seed_date("2025-10-23").unwrap(), expected);
    assert_eq!(parse_seed_date("23/10/2025").unwrap(), expected);
    assert_eq!(parse_seed_date("2025/10/23").unwrap(), expected);
    assert_eq!(parse_seed_date("  2025-10-23 ").unwrap(), expected);
  }

  #[test]
  fn unknown_date_format_is_rejected() {
    assert!(matches!(parse_seed_date("10-23-2025"), Err(AppError::Validation(_))));
  }

  #[test]
  fn price_accepts_numbers_and_separator_strings() {
    let contents = r#"[
      {"name": "Ball A", "brand": "Spalding", "price": 549000, "stock": 3},
      {"name": "Ball B", "brand": "Spalding", "price": "549.000", "stock": "12"}
    ]"#;
    let seeds = parse_seed_file(contents).unwrap();
    assert_eq!(seeds[0].price_cents, 549000);
    assert_eq!(seeds[1].price_cents, 549000);
    assert_eq!(seeds[1].stock, 12);
  }

  #[test]
  fn availability_follows_stock_when_present() {
    let contents = r#"[
      {"name": "Hoop", "brand": "Acme", "stock": 0},
      {"name": "Net", "brand": "Acme", "stock": 4},
      {"name": "Whistle", "brand": "Acme"}
    ]"#;
    let seeds = parse_seed_file(contents).unwrap();
    assert!(!seeds[0].is_available);
    assert!(seeds[1].is_available);
    assert!(seeds[2].is_available); // no stock column at all
  }

  #[test]
  fn missing_name_or_brand_fails_with_record_index() {
    let contents = r#"[{"name": "Ball", "brand": "Spalding"}, {"name": "  ", "brand": "Spalding"}]"#;
    let err = parse_seed_file(contents).expect_err("blank name must fail");
    match err {
      AppError::Validation(msg) => assert!(msg.contains("Record 1")),
      other => panic!("expected validation error, got {:?}", other),
    }
  }

  #[test]
  fn fields_are_trimmed_and_defaulted() {
    let contents = r#"[{"name": " Jersey ", "brand": " Nike ", "image": "  "}]"#;
    let seeds = parse_seed_file(contents).unwrap();
    assert_eq!(seeds[0].name, "Jersey");
    assert_eq!(seeds[0].brand, "Nike");
    assert_eq!(seeds[0].category, "");
    assert_eq!(seeds[0].image_url, None);
    assert_eq!(seeds[0].price_cents, 0);
  }
}
