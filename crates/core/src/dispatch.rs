//! Dispatch planning: canonical identity keys and recipient deduplication.
//!
//! A recipient row is keyed by the resolved identity of its target, not by
//! the raw string the requester typed. Before any rows are written, the
//! planner splits the requested targets into those that already have a row
//! on the ticket (reuse) and those that need one (create), preserving
//! input order so the first target stays the primary one.

use std::collections::HashSet;

use crate::identity::{ResolvedTarget, TargetKind};
use crate::types::DbId;

/// Canonical identity key for a resolved dispatch target.
///
/// Precedence is fixed: a platform-user match always keys as `user:<id>`,
/// regardless of which address matched it. Unmatched targets key by their
/// normalized address.
pub fn identity_key(target: &ResolvedTarget) -> String {
    if let Some(user_id) = target.matched_user_id {
        return format!("user:{user_id}");
    }
    match target.kind {
        TargetKind::Phone => format!("phone:{}", target.normalized),
        TargetKind::Email => format!("email:{}", target.normalized),
    }
}

/// Canonical identity key for an already-stored recipient row.
///
/// Mirrors [`identity_key`]: profile id wins, then phone, then email. The
/// stored phone/email are already normalized at insert time. Returns
/// `None` for a row with no identifying field, which the schema forbids.
pub fn recipient_identity_key(
    profile_id: Option<DbId>,
    phone: Option<&str>,
    email: Option<&str>,
) -> Option<String> {
    if let Some(id) = profile_id {
        return Some(format!("user:{id}"));
    }
    if let Some(p) = phone {
        return Some(format!("phone:{p}"));
    }
    email.map(|e| format!("email:{e}"))
}

/// One target in a dispatch plan: the resolution outcome plus its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTarget {
    pub target: ResolvedTarget,
    pub key: String,
}

/// The outcome of planning one dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Targets that need a new recipient row, in input order.
    pub to_create: Vec<PlannedTarget>,
    /// Targets already covered by an existing row, in input order.
    pub to_reuse: Vec<PlannedTarget>,
    /// Whether the first requested target landed in `to_create`.
    pub primary_is_new: bool,
}

impl DispatchPlan {
    /// The primary target: the first target of the dispatch call, used to
    /// compose the synchronous outbound message.
    pub fn primary(&self) -> Option<&PlannedTarget> {
        if self.primary_is_new {
            self.to_create.first()
        } else {
            self.to_reuse.first()
        }
    }
}

/// Split resolved targets into create/reuse sets against the identity keys
/// already present on the ticket.
///
/// Input order is preserved. A key appearing twice in one call collapses
/// onto its first occurrence, so repeated dispatches (and sloppy repeated
/// entries) never produce duplicate rows.
pub fn plan_dispatch(targets: Vec<ResolvedTarget>, existing_keys: &HashSet<String>) -> DispatchPlan {
    let mut seen: HashSet<String> = HashSet::new();
    let mut to_create = Vec::new();
    let mut to_reuse = Vec::new();
    let mut primary_is_new = false;

    for (index, target) in targets.into_iter().enumerate() {
        let key = identity_key(&target);
        if !seen.insert(key.clone()) {
            continue;
        }
        if existing_keys.contains(&key) {
            to_reuse.push(PlannedTarget { target, key });
        } else {
            if index == 0 {
                primary_is_new = true;
            }
            to_create.push(PlannedTarget { target, key });
        }
    }

    DispatchPlan {
        to_create,
        to_reuse,
        primary_is_new,
    }
}
