//! Address-book contact rules.

use crate::error::CoreError;

pub const CONTACT_CATEGORY_MATERIALS: &str = "materials";
pub const CONTACT_CATEGORY_LABOR: &str = "labor";
pub const CONTACT_CATEGORY_CLIENTS: &str = "clients";

/// All valid contact categories.
pub const VALID_CONTACT_CATEGORIES: &[&str] = &[
    CONTACT_CATEGORY_MATERIALS,
    CONTACT_CATEGORY_LABOR,
    CONTACT_CATEGORY_CLIENTS,
];

/// Validate that a contact category is one of the accepted values.
pub fn validate_contact_category(category: &str) -> Result<(), CoreError> {
    if VALID_CONTACT_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid contact category '{category}'. Must be one of: {}",
            VALID_CONTACT_CATEGORIES.join(", ")
        )))
    }
}

/// Validate a star rating: 1 through 5 when present.
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between 1 and 5, got {rating}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_accepted() {
        for c in VALID_CONTACT_CATEGORIES {
            assert!(validate_contact_category(c).is_ok());
        }
    }

    #[test]
    fn unknown_category_rejected() {
        assert!(validate_contact_category("suppliers").is_err());
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
