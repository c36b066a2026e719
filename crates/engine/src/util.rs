//! Internal helpers for input validation and key generation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation rejects bad input the same way, before any
//! read or write happens.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Trim a required text field and reject it when empty.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidArgument(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blank values to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Validate an amount that may be zero: a stock level set directly, a price
/// or a cost.
pub(crate) fn validate_non_negative(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "{label} must be a finite number >= 0"
        )));
    }
    Ok(value)
}

/// Generate a recipe key.
///
/// Keys are random rather than derived from the product key and a clock
/// reading, so two keys minted in the same instant never collide.
pub(crate) fn new_recipe_id() -> String {
    format!("recipe_{}", Uuid::new_v4().simple())
}

/// Generate an ingredient line key.
pub(crate) fn new_ingredient_id() -> String {
    format!("ingredient_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(normalize_required("  Latte ", "name").unwrap(), "Latte");
        assert_eq!(
            normalize_required("   ", "name"),
            Err(EngineError::InvalidArgument(
                "name must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" barista ")),
            Some("barista".to_string())
        );
    }

    #[test]
    fn non_negative_allows_zero_but_not_negative() {
        assert_eq!(validate_non_negative(0.0, "inventory_a").unwrap(), 0.0);
        assert_eq!(
            validate_non_negative(-1.0, "inventory_b"),
            Err(EngineError::InvalidArgument(
                "inventory_b must be a finite number >= 0".to_string()
            ))
        );
        assert!(validate_non_negative(f64::NAN, "price").is_err());
    }

    #[test]
    fn generated_keys_are_prefixed_and_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| new_ingredient_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("ingredient_")));
        assert!(new_recipe_id().starts_with("recipe_"));
    }
}
