//! Ticket constants and draft validation.
//!
//! Category, priority, lifecycle status and creator-role values must match
//! the CHECK constraints on the `tickets` table.

use crate::error::CoreError;

/// Quote for labor only.
pub const CATEGORY_LABOR: &str = "labor";

/// Quote for materials only.
pub const CATEGORY_MATERIALS: &str = "materials";

/// Quote for labor plus materials.
pub const CATEGORY_COMBINED: &str = "combined";

/// All valid ticket categories.
pub const VALID_CATEGORIES: &[&str] = &[CATEGORY_LABOR, CATEGORY_MATERIALS, CATEGORY_COMBINED];

/// All valid ticket priorities.
pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

/// Ticket is awaiting quotes.
pub const TICKET_STATUS_PENDING: &str = "pending";

/// At least one responder has submitted an offer.
pub const TICKET_STATUS_QUOTED: &str = "quoted";

/// The requester approved an offer.
pub const TICKET_STATUS_APPROVED: &str = "approved";

/// The requester discarded the request.
pub const TICKET_STATUS_REJECTED: &str = "rejected";

/// All valid ticket lifecycle statuses.
pub const VALID_TICKET_STATUSES: &[&str] = &[
    TICKET_STATUS_PENDING,
    TICKET_STATUS_QUOTED,
    TICKET_STATUS_APPROVED,
    TICKET_STATUS_REJECTED,
];

/// Ticket originated by a constructor requesting work/materials.
pub const ROLE_CONSTRUCTOR: &str = "constructor";

/// Ticket originated by a materials supplier.
pub const ROLE_SUPPLIER: &str = "supplier";

/// All valid creator roles.
pub const VALID_CREATOR_ROLES: &[&str] = &[ROLE_CONSTRUCTOR, ROLE_SUPPLIER];

/// Validate that a category string is one of the accepted values.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid category '{category}'. Must be one of: {}",
            VALID_CATEGORIES.join(", ")
        )))
    }
}

/// Validate that a priority string is one of the accepted values.
pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        )))
    }
}

/// Validate that a creator role string is one of the accepted values.
pub fn validate_creator_role(role: &str) -> Result<(), CoreError> {
    if VALID_CREATOR_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid creator role '{role}'. Must be one of: {}",
            VALID_CREATOR_ROLES.join(", ")
        )))
    }
}

/// Validate the required free-text fields of a ticket draft.
///
/// Title and description must be non-empty after trimming. Runs before any
/// persistence, so a failing draft writes nothing.
pub fn validate_draft(title: &str, description: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Ticket title must not be empty".to_string(),
        ));
    }
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Ticket description must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Whether a category implies an attached materials list.
pub fn category_has_materials(category: &str) -> bool {
    category == CATEGORY_MATERIALS || category == CATEGORY_COMBINED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_categories_accepted() {
        for c in VALID_CATEGORIES {
            assert!(validate_category(c).is_ok());
        }
    }

    #[test]
    fn invalid_category_rejected() {
        let result = validate_category("paint");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_priority_rejected() {
        assert!(validate_priority("now").is_err());
        assert!(validate_priority("urgent").is_ok());
    }

    #[test]
    fn draft_requires_title_and_description() {
        assert!(validate_draft("Cerámicos", "50m2").is_ok());
        assert!(validate_draft("", "50m2").is_err());
        assert!(validate_draft("Cerámicos", "   ").is_err());
    }

    #[test]
    fn materials_implied_by_category() {
        assert!(category_has_materials(CATEGORY_MATERIALS));
        assert!(category_has_materials(CATEGORY_COMBINED));
        assert!(!category_has_materials(CATEGORY_LABOR));
    }
}
