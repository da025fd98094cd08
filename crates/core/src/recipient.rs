//! Recipient status constants and negotiation-thread rules.
//!
//! A recipient row tracks one negotiation thread between a ticket and a
//! single resolved target. Responder-facing actions move it through a
//! small, deliberately permissive state machine:
//!
//! ```text
//! sent ──> in_review ──> offered
//!   │          │            ^
//!   │          └──> rejected│ (re-offer stays allowed)
//!   ├──> rejected           │
//!   └──> offered ───────────┘
//! ```
//!
//! `accepted` is set by the requester-side finalization flow, never by the
//! responder actions defined here. Re-applying a transition overwrites the
//! previous outcome; there is no versioning and the last writer wins.

use crate::error::CoreError;

/// Initial status: the ticket was dispatched, no response yet.
pub const STATUS_SENT: &str = "sent";

/// The responder opened the ticket and is evaluating it.
pub const STATUS_IN_REVIEW: &str = "in_review";

/// The responder submitted a quote.
pub const STATUS_OFFERED: &str = "offered";

/// The requester accepted this thread's offer (requester-side flow).
pub const STATUS_ACCEPTED: &str = "accepted";

/// The responder declined the request.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid recipient statuses.
pub const VALID_RECIPIENT_STATUSES: &[&str] = &[
    STATUS_SENT,
    STATUS_IN_REVIEW,
    STATUS_OFFERED,
    STATUS_ACCEPTED,
    STATUS_REJECTED,
];

/// Validate that a recipient status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_RECIPIENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid recipient status '{status}'. Must be one of: {}",
            VALID_RECIPIENT_STATUSES.join(", ")
        )))
    }
}

/// Optional fields attached to a submitted offer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OfferInput {
    pub amount: Option<f64>,
    pub estimated_days: Option<i32>,
}

/// Validate offer fields: when present, amount and estimated days must be
/// non-negative finite numbers. Rejected before any row is touched.
pub fn validate_offer(offer: &OfferInput) -> Result<(), CoreError> {
    if let Some(amount) = offer.amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::Validation(format!(
                "Offer amount must be a non-negative number, got {amount}"
            )));
        }
    }
    if let Some(days) = offer.estimated_days {
        if days < 0 {
            return Err(CoreError::Validation(format!(
                "Estimated days must be non-negative, got {days}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_accepted() {
        for s in VALID_RECIPIENT_STATUSES {
            assert!(validate_status(s).is_ok());
        }
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(validate_status("pending").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn offer_without_fields_is_valid() {
        assert!(validate_offer(&OfferInput::default()).is_ok());
    }

    #[test]
    fn offer_with_valid_fields_is_valid() {
        let offer = OfferInput {
            amount: Some(125_000.50),
            estimated_days: Some(14),
        };
        assert!(validate_offer(&offer).is_ok());
    }

    #[test]
    fn negative_amount_rejected() {
        let offer = OfferInput {
            amount: Some(-5.0),
            estimated_days: None,
        };
        assert!(matches!(
            validate_offer(&offer),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn non_finite_amount_rejected() {
        let offer = OfferInput {
            amount: Some(f64::NAN),
            estimated_days: None,
        };
        assert!(validate_offer(&offer).is_err());
    }

    #[test]
    fn negative_days_rejected() {
        let offer = OfferInput {
            amount: None,
            estimated_days: Some(-1),
        };
        assert!(validate_offer(&offer).is_err());
    }
}
