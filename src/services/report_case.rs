//! Report case state machine
//!
//! A case starts `Open`, collects toggled votes and moves to `Accepted` once
//! the vote total reaches the group threshold or an administrator acts.
//! Terminal cases ignore every further vote. All functions here are pure;
//! persisting the resulting changes is the entity store's job.

use crate::models::{ReportCase, ReportStatus, Vote, DEFAULT_VOTE_WEIGHT};
use crate::services::eligibility::VoterStanding;

/// Change to a case's vote set caused by a toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteChange {
    Added(Vote),
    Removed(Vote),
}

/// Why a vote left the case untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoVotePower,
    Closed(ReportStatus),
}

/// Result of casting a vote on a case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was toggled and the case stays open
    Counted { change: VoteChange, total: i64 },
    /// This vote moved the case from `Open` to `Accepted`
    Accepted {
        change: Option<VoteChange>,
        total: i64,
        by_privilege: bool,
    },
    Ignored(IgnoreReason),
}

/// Status a freshly created case starts in
pub fn initial_status(initiator_privileged: bool) -> ReportStatus {
    if initiator_privileged {
        ReportStatus::Accepted
    } else {
        ReportStatus::Open
    }
}

impl ReportCase {
    /// Sum of the weights of all present votes
    pub fn vote_total(&self) -> i64 {
        self.votes.iter().map(|v| v.weight).sum()
    }

    pub fn has_voted(&self, voter_id: i64) -> bool {
        self.votes.iter().any(|v| v.voter_id == voter_id)
    }

    /// Add the voter's vote if absent, remove it if present
    pub fn toggle_vote(&mut self, vote: Vote) -> VoteChange {
        if let Some(pos) = self.votes.iter().position(|v| v.voter_id == vote.voter_id) {
            VoteChange::Removed(self.votes.remove(pos))
        } else {
            self.votes.push(vote.clone());
            VoteChange::Added(vote)
        }
    }

    /// Move an open case to `Accepted`.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn accept(&mut self) -> bool {
        if self.status == ReportStatus::Open {
            self.status = ReportStatus::Accepted;
            true
        } else {
            false
        }
    }

    /// Apply one vote interaction from a voter with the given standing
    pub fn cast_vote(&mut self, voter_id: i64, standing: VoterStanding, threshold: i64) -> VoteOutcome {
        if self.status.is_terminal() {
            return VoteOutcome::Ignored(IgnoreReason::Closed(self.status));
        }

        match standing {
            VoterStanding::Privileged => {
                self.accept();
                VoteOutcome::Accepted {
                    change: None,
                    total: self.vote_total(),
                    by_privilege: true,
                }
            }
            VoterStanding::VotePower => {
                let change = self.toggle_vote(Vote {
                    voter_id,
                    weight: DEFAULT_VOTE_WEIGHT,
                });
                let total = self.vote_total();
                if total >= threshold {
                    self.accept();
                    VoteOutcome::Accepted {
                        change: Some(change),
                        total,
                        by_privilege: false,
                    }
                } else {
                    VoteOutcome::Counted { change, total }
                }
            }
            VoterStanding::NoVotePower => VoteOutcome::Ignored(IgnoreReason::NoVotePower),
        }
    }
}
