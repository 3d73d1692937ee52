//! Vote eligibility
//!
//! Decides whether a membership carries vote power in its group. The second
//! half of eligibility, administrator privilege, needs a round trip to
//! Telegram and lives in the coordinator.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Group, Membership};

/// How a member's vote is treated by the report state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoterStanding {
    /// Group administrator: accepts a report outright
    Privileged,
    /// Regular member whose vote counts toward the threshold
    VotePower,
    /// Member whose vote is acknowledged but has no effect
    NoVotePower,
}

impl VoterStanding {
    pub fn resolve(privileged: bool, membership: &Membership, group: &Group, now: DateTime<Utc>) -> Self {
        if privileged {
            VoterStanding::Privileged
        } else if has_vote_power(membership, group, now) {
            VoterStanding::VotePower
        } else {
            VoterStanding::NoVotePower
        }
    }
}

/// Whether `membership` may cast a counted vote at `now`.
///
/// Requires the member not to be banned, to have written at least the
/// group's minimum number of messages, and to have written the first of
/// them at least the group's cooldown ago. Groups with no message minimum
/// skip the cooldown. A cooldown too long to represent never elapses.
pub fn has_vote_power(membership: &Membership, group: &Group, now: DateTime<Utc>) -> bool {
    if membership.banned {
        return false;
    }
    if membership.message_count < group.min_messages_for_vote_power {
        return false;
    }
    if group.min_messages_for_vote_power == 0 {
        return true;
    }
    match membership.first_message_at {
        Some(first) => Duration::try_minutes(group.cooldown_minutes)
            .and_then(|cooldown| first.checked_add_signed(cooldown))
            .is_some_and(|eligible_at| now >= eligible_at),
        None => false,
    }
}
