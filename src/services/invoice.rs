// src/services/invoice.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Maximum length of an invoice number, mirroring the column width.
pub const INVOICE_NO_MAX_LEN: usize = 32;

/// Builds an invoice number of the form `INV{YYYYMMDD}-{user}-{HHMMSS}{us}`,
/// truncated to the column width. The user fragment is the first 8 hex digits
/// of the customer's id; the microsecond tail keeps numbers from colliding
/// within a day.
pub fn generate_invoice_no(user_id: Uuid, now: DateTime<Utc>) -> String {
  let user_fragment: String = user_id.simple().to_string().chars().take(8).collect();
  let mut invoice_no = format!(
    "INV{}-{}-{}",
    now.format("%Y%m%d"),
    user_fragment,
    now.format("%H%M%S%6f")
  );
  invoice_no.truncate(INVOICE_NO_MAX_LEN);
  invoice_no
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 23, 14, 30, 5).unwrap() + chrono::Duration::microseconds(123456)
  }

  #[test]
  fn invoice_no_has_expected_shape() {
    let user_id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174001").unwrap();
    let invoice_no = generate_invoice_no(user_id, fixed_now());

    assert!(invoice_no.starts_with("INV20251023-123e4567-"));
    assert!(invoice_no.len() <= INVOICE_NO_MAX_LEN);
  }

  #[test]
  fn invoice_no_never_exceeds_column_width() {
    let invoice_no = generate_invoice_no(Uuid::new_v4(), Utc::now());
    assert!(invoice_no.len() <= INVOICE_NO_MAX_LEN);
  }

  #[test]
  fn different_users_get_different_numbers() {
    let now = fixed_now();
    let a = generate_invoice_no(Uuid::new_v4(), now);
    let b = generate_invoice_no(Uuid::new_v4(), now);
    assert_ne!(a, b);
  }
}
