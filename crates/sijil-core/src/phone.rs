//! Phone-number normalisation to a canonical `+`-prefixed form.
//!
//! Accepts free-form input and either produces a canonical international
//! number or rejects it. Supported country codes are US (+1), Denmark
//! (+45) and Saudi Arabia (+966) — the destinations this service sends to.
//! The normaliser never truncates or guesses beyond the rules below.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
  #[error("Phone number is required")]
  Missing,

  #[error("{0}")]
  InvalidFormat(String),
}

const UNSUPPORTED: &str =
  "Invalid phone number format. Must be a valid US (+1), Danish (+45), or Saudi (+966) number.";

/// Normalise `raw` into canonical form.
///
/// Everything except digits and `+` is stripped first. A trailing `+` is
/// treated as a misplaced prefix and moved to the front. Inputs without a
/// `+` get a country code inferred; inputs with one are length-checked per
/// country code.
pub fn normalize(raw: &str) -> Result<String, PhoneError> {
  if raw.trim().is_empty() {
    return Err(PhoneError::Missing);
  }

  let cleaned: String = raw
    .chars()
    .filter(|c| c.is_ascii_digit() || *c == '+')
    .collect();

  if let Some(rest) = cleaned.strip_suffix('+') {
    return Ok(format!("+{rest}"));
  }

  let Some(rest) = cleaned.strip_prefix('+') else {
    // No country code supplied; infer one. A full Danish number is 10
    // digits and would otherwise be mistaken for a bare US number, so the
    // 45 prefix is checked first.
    return if cleaned.starts_with("45") && cleaned.len() == 10 {
      Ok(format!("+{cleaned}"))
    } else if cleaned.len() == 10 {
      Ok(format!("+1{cleaned}"))
    } else if cleaned.len() == 11 && cleaned.starts_with('1') {
      Ok(format!("+{cleaned}"))
    } else if cleaned.starts_with("45") || cleaned.starts_with("966") {
      Ok(format!("+{cleaned}"))
    } else {
      Err(PhoneError::InvalidFormat(UNSUPPORTED.to_owned()))
    };
  };

  // Already `+`-prefixed: validate the length per country code.
  if rest.starts_with('1') {
    if rest.len() != 11 {
      return Err(PhoneError::InvalidFormat(
        "Invalid US number length. Must be 10 digits after country code (e.g., +1XXXXXXXXXX)"
          .to_owned(),
      ));
    }
  } else if rest.starts_with("45") {
    if rest.len() != 10 {
      return Err(PhoneError::InvalidFormat(
        "Invalid Danish number length. Must be 8 digits after country code (e.g., +45XXXXXXXX)"
          .to_owned(),
      ));
    }
  } else if rest.starts_with("966") {
    if rest.len() != 12 {
      return Err(PhoneError::InvalidFormat(
        "Invalid Saudi number length. Must be 9 digits after country code (e.g., +966XXXXXXXXX)"
          .to_owned(),
      ));
    }
  } else {
    return Err(PhoneError::InvalidFormat(UNSUPPORTED.to_owned()));
  }

  Ok(cleaned)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn us_number_with_separators() {
    assert_eq!(normalize("555-123-4567").unwrap(), "+15551234567");
  }

  #[test]
  fn us_number_with_country_code() {
    assert_eq!(normalize("15551234567").unwrap(), "+15551234567");
  }

  #[test]
  fn canonical_input_is_unchanged() {
    assert_eq!(normalize("+14155552671").unwrap(), "+14155552671");
  }

  #[test]
  fn danish_number_without_plus() {
    assert_eq!(normalize("4512345678").unwrap(), "+4512345678");
  }

  #[test]
  fn saudi_number_without_plus() {
    assert_eq!(normalize("966551234567").unwrap(), "+966551234567");
  }

  #[test]
  fn trailing_plus_is_relocated() {
    assert_eq!(normalize("96655512345+").unwrap(), "+96655512345");
  }

  #[test]
  fn parentheses_and_spaces_are_stripped() {
    assert_eq!(normalize("(415) 555 2671").unwrap(), "+14155552671");
  }

  #[test]
  fn too_short_is_invalid() {
    assert!(matches!(normalize("123"), Err(PhoneError::InvalidFormat(_))));
  }

  #[test]
  fn empty_input_is_missing() {
    assert_eq!(normalize(""), Err(PhoneError::Missing));
    assert_eq!(normalize("   "), Err(PhoneError::Missing));
  }

  #[test]
  fn us_length_is_enforced() {
    let err = normalize("+1415555267").unwrap_err();
    assert!(matches!(err, PhoneError::InvalidFormat(ref m) if m.contains("US number length")));
  }

  #[test]
  fn danish_length_is_enforced() {
    let err = normalize("+45123456789").unwrap_err();
    assert!(matches!(err, PhoneError::InvalidFormat(ref m) if m.contains("Danish number length")));
  }

  #[test]
  fn saudi_length_is_enforced() {
    let err = normalize("+96655").unwrap_err();
    assert!(matches!(err, PhoneError::InvalidFormat(ref m) if m.contains("Saudi number length")));
  }

  #[test]
  fn unsupported_country_code_is_invalid() {
    let err = normalize("+447911123456").unwrap_err();
    assert!(matches!(err, PhoneError::InvalidFormat(ref m) if m == UNSUPPORTED));
  }
}
