//! Dispatch target identity resolution.
//!
//! Classifies a raw contact string as a phone number or an email address,
//! normalizes it, and matches it against a read-only snapshot of the
//! platform user directory and the requester's address book. Matching is
//! deterministic: platform users are scanned before contacts, first match
//! wins.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::DbId;

/// Country code prepended to national phone numbers (Argentina).
pub const DEFAULT_COUNTRY_CODE: &str = "54";

/// Minimum digit count for a normalized phone, excluding the leading `+`.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum digit count for a normalized phone, excluding the leading `+`.
pub const MAX_PHONE_DIGITS: usize = 15;

/// How a raw dispatch target was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Phone,
    Email,
}

/// A platform user as seen by the resolver: id plus reachable addresses.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub id: DbId,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// An address-book contact as seen by the resolver.
#[derive(Debug, Clone)]
pub struct DirectoryContact {
    pub id: DbId,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Read-only snapshot of both directories, captured at call time.
///
/// The resolver never reads live collections; callers fetch once and pass
/// the snapshot in, so a concurrent directory mutation cannot change the
/// outcome of a single resolution pass.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub users: Vec<DirectoryUser>,
    pub contacts: Vec<DirectoryContact>,
}

/// The outcome of resolving one raw dispatch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub kind: TargetKind,
    /// E.164 phone (`+5491112345678`) or lower-cased trimmed email.
    pub normalized: String,
    /// Set when the target matched a platform user. Takes precedence over
    /// any contact match.
    pub matched_user_id: Option<DbId>,
    /// Set when the target matched an address-book contact and no platform
    /// user matched first.
    pub matched_contact_id: Option<DbId>,
}

impl ResolvedTarget {
    /// Whether the target is a known platform user (drives the composed
    /// message tail and recipient identity fields).
    pub fn is_platform_user(&self) -> bool {
        self.matched_user_id.is_some()
    }
}

/// Classify a raw target string as phone or email.
///
/// After stripping punctuation, a string with more digits than letters is
/// treated as a phone number; everything else as an email address.
pub fn classify(raw: &str) -> TargetKind {
    let digits = raw.chars().filter(|c| c.is_ascii_digit()).count();
    let letters = raw.chars().filter(|c| c.is_alphabetic()).count();
    if digits > letters {
        TargetKind::Phone
    } else {
        TargetKind::Email
    }
}

/// Normalize a phone number to E.164 form.
///
/// Strips everything except digits and a leading `+`. Numbers without a
/// `+` prefix are assumed national: leading zeros are stripped and
/// `default_country_code` is prepended. Normalization is idempotent over
/// its own output.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let has_plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    let normalized = if has_plus {
        format!("+{digits}")
    } else {
        let national = digits.trim_start_matches('0');
        format!("+{default_country_code}{national}")
    };

    let digit_count = normalized.len() - 1;
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digit_count) {
        return Err(CoreError::Validation(format!(
            "Invalid phone '{raw}': expected {MIN_PHONE_DIGITS}-{MAX_PHONE_DIGITS} digits after normalization, got {digit_count}"
        )));
    }

    Ok(normalized)
}

/// Normalize an email address: trim whitespace, lowercase.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a normalized string looks like a deliverable email address.
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Resolve a raw dispatch target against a directory snapshot.
///
/// Classifies, normalizes, then scans platform users first and contacts
/// second for a record whose normalized phone or lower-cased email equals
/// the normalized input. The first match encountered wins; a platform-user
/// match suppresses any later contact match.
pub fn resolve(
    raw: &str,
    snapshot: &DirectorySnapshot,
    default_country_code: &str,
) -> Result<ResolvedTarget, CoreError> {
    let kind = classify(raw);

    let normalized = match kind {
        TargetKind::Phone => normalize_phone(raw, default_country_code)?,
        TargetKind::Email => {
            let email = normalize_email(raw);
            if !is_valid_email(&email) {
                return Err(CoreError::Validation(format!(
                    "Invalid email address '{raw}'"
                )));
            }
            email
        }
    };

    let matched_user_id = snapshot
        .users
        .iter()
        .find(|u| entry_matches(kind, &normalized, u.phone.as_deref(), u.email.as_deref(), default_country_code))
        .map(|u| u.id);

    let matched_contact_id = if matched_user_id.is_none() {
        snapshot
            .contacts
            .iter()
            .find(|c| entry_matches(kind, &normalized, c.phone.as_deref(), c.email.as_deref(), default_country_code))
            .map(|c| c.id)
    } else {
        None
    };

    Ok(ResolvedTarget {
        kind,
        normalized,
        matched_user_id,
        matched_contact_id,
    })
}

/// Compare a normalized target against one directory entry.
///
/// Stored phones are normalized with the same rules before comparison, so
/// `011 5123-4567` in the address book matches `+541151234567`. Entries
/// whose stored phone does not normalize cleanly are skipped, not errors.
fn entry_matches(
    kind: TargetKind,
    normalized: &str,
    phone: Option<&str>,
    email: Option<&str>,
    default_country_code: &str,
) -> bool {
    match kind {
        TargetKind::Phone => phone
            .and_then(|p| normalize_phone(p, default_country_code).ok())
            .is_some_and(|p| p == normalized),
        TargetKind::Email => email.is_some_and(|e| normalize_email(e) == normalized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DirectorySnapshot {
        DirectorySnapshot {
            users: vec![
                DirectoryUser {
                    id: 1,
                    phone: Some("+5491112345678".to_string()),
                    email: Some("Ana@Example.com".to_string()),
                },
                DirectoryUser {
                    id: 2,
                    phone: None,
                    email: Some("b@b.com".to_string()),
                },
            ],
            contacts: vec![
                DirectoryContact {
                    id: 10,
                    phone: Some("011 4555-1234".to_string()),
                    email: None,
                },
                DirectoryContact {
                    id: 11,
                    phone: Some("+5491112345678".to_string()),
                    email: Some("ana@example.com".to_string()),
                },
            ],
        }
    }

    #[test]
    fn classify_phone_when_digits_dominate() {
        assert_eq!(classify("+54 9 11 1234-5678"), TargetKind::Phone);
        assert_eq!(classify("1112345678"), TargetKind::Phone);
    }

    #[test]
    fn classify_email_when_letters_dominate() {
        assert_eq!(classify("ana@example.com"), TargetKind::Email);
        assert_eq!(classify("a1@b2.com"), TargetKind::Email);
    }

    #[test]
    fn normalize_phone_keeps_explicit_country_code() {
        assert_eq!(
            normalize_phone("+54 9 11 1234-5678", DEFAULT_COUNTRY_CODE).unwrap(),
            "+5491112345678"
        );
    }

    #[test]
    fn normalize_phone_prefixes_default_country_code() {
        assert_eq!(
            normalize_phone("9 11 1234-5678", DEFAULT_COUNTRY_CODE).unwrap(),
            "+5491112345678"
        );
    }

    #[test]
    fn normalize_phone_strips_leading_zeros() {
        assert_eq!(
            normalize_phone("011 4555-1234", DEFAULT_COUNTRY_CODE).unwrap(),
            "+541145551234"
        );
    }

    #[test]
    fn normalize_phone_is_idempotent() {
        let once = normalize_phone("011 4555-1234", DEFAULT_COUNTRY_CODE).unwrap();
        let twice = normalize_phone(&once, DEFAULT_COUNTRY_CODE).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_phone_rejects_too_few_digits() {
        let err = normalize_phone("12345", DEFAULT_COUNTRY_CODE);
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn normalize_phone_rejects_too_many_digits() {
        let err = normalize_phone("+1234567890123456", DEFAULT_COUNTRY_CODE);
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn resolve_prefers_platform_user_over_contact() {
        // +5491112345678 belongs to both user 1 and contact 11.
        let resolved = resolve("+5491112345678", &snapshot(), DEFAULT_COUNTRY_CODE).unwrap();
        assert_eq!(resolved.matched_user_id, Some(1));
        assert_eq!(resolved.matched_contact_id, None);
    }

    #[test]
    fn resolve_matches_email_case_insensitively() {
        let resolved = resolve("ANA@example.com", &snapshot(), DEFAULT_COUNTRY_CODE).unwrap();
        assert_eq!(resolved.kind, TargetKind::Email);
        assert_eq!(resolved.matched_user_id, Some(1));
    }

    #[test]
    fn resolve_matches_contact_by_unnormalized_stored_phone() {
        let resolved = resolve("+541145551234", &snapshot(), DEFAULT_COUNTRY_CODE).unwrap();
        assert_eq!(resolved.matched_user_id, None);
        assert_eq!(resolved.matched_contact_id, Some(10));
    }

    #[test]
    fn resolve_unmatched_target_has_no_ids() {
        let resolved = resolve("+19998887766", &snapshot(), DEFAULT_COUNTRY_CODE).unwrap();
        assert!(!resolved.is_platform_user());
        assert_eq!(resolved.matched_contact_id, None);
    }

    #[test]
    fn resolve_rejects_malformed_email() {
        let err = resolve("not-an-email", &snapshot(), DEFAULT_COUNTRY_CODE);
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }
}
