//! Database service layer
//!
//! Every public operation runs inside one SQLite transaction and covers both
//! the fetch and the mutation of the entities it touches. The entity store
//! calls these one at a time.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::database::repositories::{group, member, membership, report};
use crate::database::DatabasePool;
use crate::models::{Group, GroupSetting, Member, Membership, ReportCase, ReportStatus};
use crate::services::eligibility::VoterStanding;
use crate::services::report_case::{initial_status, VoteChange, VoteOutcome};
use crate::utils::errors::ReportBotError;

/// A report case with the group and the offender's membership it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct CaseContext {
    pub case: ReportCase,
    pub group: Group,
    pub offender: Membership,
}

/// Request to open a report on a message
#[derive(Debug, Clone)]
pub struct OpenReport {
    pub chat_id: i64,
    pub initiator_id: i64,
    pub initiator_message_id: i64,
    pub offender_id: i64,
    pub reported_message_id: i64,
    pub initiator_privileged: bool,
    pub at: DateTime<Utc>,
}

/// What happened when a report was requested
#[derive(Debug, Clone, PartialEq)]
pub enum OpenReportOutcome {
    /// The case is open and has no vote prompt yet, either because it is
    /// new or because sending its prompt failed before
    Opened(CaseContext),
    /// The case went straight to `Accepted`; the caller must punish
    Accepted(CaseContext),
    /// The message already has an open case
    AlreadyOpen(CaseContext),
    /// The message already has a finished case
    AlreadyClosed(CaseContext),
}

/// Request to apply a vote interaction on a prompt
#[derive(Debug, Clone)]
pub struct CastVote {
    pub chat_id: i64,
    pub voter_id: i64,
    pub prompt_message_id: i64,
    pub voter_privileged: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CastVoteOutcome {
    /// No case has this prompt in this chat
    UnknownCase,
    Applied {
        context: CaseContext,
        outcome: VoteOutcome,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn member(&self, member_id: i64) -> Result<Member, ReportBotError> {
        let mut tx = self.pool.begin().await?;
        let member = member::find_or_create(&mut tx, member_id).await?;
        tx.commit().await?;
        Ok(member)
    }

    pub async fn group(&self, group_id: i64) -> Result<Group, ReportBotError> {
        let mut tx = self.pool.begin().await?;
        let group = group::find_or_create(&mut tx, group_id).await?;
        tx.commit().await?;
        Ok(group)
    }

    /// Find or create the membership, along with its member and group
    pub async fn membership(&self, group_id: i64, member_id: i64) -> Result<Membership, ReportBotError> {
        let mut tx = self.pool.begin().await?;
        group::find_or_create(&mut tx, group_id).await?;
        member::find_or_create(&mut tx, member_id).await?;
        let membership = membership::find_or_create(&mut tx, group_id, member_id).await?;
        tx.commit().await?;
        Ok(membership)
    }

    /// Find or create the open case on a reported message
    pub async fn report_case(
        &self,
        group_id: i64,
        member_id: i64,
        reported_message_id: i64,
        initiator_message_id: i64,
        at: DateTime<Utc>,
    ) -> Result<(ReportCase, bool), ReportBotError> {
        let mut tx = self.pool.begin().await?;
        group::find_or_create(&mut tx, group_id).await?;
        member::find_or_create(&mut tx, member_id).await?;
        let offender = membership::find_or_create(&mut tx, group_id, member_id).await?;
        let result = report::find_or_create(
            &mut tx,
            offender.id,
            reported_message_id,
            initiator_message_id,
            at,
            ReportStatus::Open,
        )
        .await?;
        tx.commit().await?;
        Ok(result)
    }

    pub async fn find_case(&self, case_id: i64) -> Result<Option<ReportCase>, ReportBotError> {
        let mut conn = self.pool.acquire().await?;
        report::find_by_id(&mut conn, case_id).await
    }

    /// Count a plain group message from `member_id`
    pub async fn record_message(
        &self,
        group_id: i64,
        member_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Membership, ReportBotError> {
        let mut tx = self.pool.begin().await?;
        group::find_or_create(&mut tx, group_id).await?;
        member::find_or_create(&mut tx, member_id).await?;
        let existing = membership::find_or_create(&mut tx, group_id, member_id).await?;

        member::increment_messages(&mut tx, member_id).await?;
        membership::record_message(&mut tx, existing.id, at).await?;

        let updated = membership::find_by_id(&mut tx, existing.id)
            .await?
            .unwrap_or(existing);
        tx.commit().await?;

        debug!(
            chat_id = group_id,
            user_id = member_id,
            messages = updated.message_count,
            "Message recorded"
        );
        Ok(updated)
    }

    /// Create the case for a reported message, or report on the existing one
    pub async fn open_report(&self, request: OpenReport) -> Result<OpenReportOutcome, ReportBotError> {
        let mut tx = self.pool.begin().await?;

        let group = group::find_or_create(&mut tx, request.chat_id).await?;
        member::find_or_create(&mut tx, request.initiator_id).await?;
        membership::find_or_create(&mut tx, request.chat_id, request.initiator_id).await?;
        member::find_or_create(&mut tx, request.offender_id).await?;
        let offender = membership::find_or_create(&mut tx, request.chat_id, request.offender_id).await?;

        let (mut case, created) = report::find_or_create(
            &mut tx,
            offender.id,
            request.reported_message_id,
            request.initiator_message_id,
            request.at,
            initial_status(request.initiator_privileged),
        )
        .await?;

        let outcome = if created {
            info!(
                chat_id = request.chat_id,
                case_id = case.id,
                offender_id = request.offender_id,
                status = ?case.status,
                "Report case created"
            );
            let context = CaseContext { case, group, offender };
            if context.case.status == ReportStatus::Accepted {
                OpenReportOutcome::Accepted(context)
            } else {
                OpenReportOutcome::Opened(context)
            }
        } else if case.status == ReportStatus::Open && request.initiator_privileged {
            if report::mark_accepted(&mut tx, case.id).await? {
                case.accept();
                OpenReportOutcome::Accepted(CaseContext { case, group, offender })
            } else {
                OpenReportOutcome::AlreadyClosed(CaseContext { case, group, offender })
            }
        } else if case.status == ReportStatus::Open && case.prompt_message_id.is_none() {
            debug!(chat_id = request.chat_id, case_id = case.id, "Open case has no prompt yet");
            OpenReportOutcome::Opened(CaseContext { case, group, offender })
        } else if case.status == ReportStatus::Open {
            OpenReportOutcome::AlreadyOpen(CaseContext { case, group, offender })
        } else {
            OpenReportOutcome::AlreadyClosed(CaseContext { case, group, offender })
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Record the vote prompt message of a case.
    ///
    /// Returns `false` when the case already has a prompt or is no longer
    /// open; the caller then owns a stray prompt.
    pub async fn attach_prompt(&self, case_id: i64, prompt_message_id: i64) -> Result<bool, ReportBotError> {
        let mut tx = self.pool.begin().await?;
        let attached = report::set_prompt(&mut tx, case_id, prompt_message_id).await?;
        tx.commit().await?;
        Ok(attached)
    }

    /// Apply one vote interaction and persist whatever it changed
    pub async fn cast_vote(&self, request: CastVote) -> Result<CastVoteOutcome, ReportBotError> {
        let mut tx = self.pool.begin().await?;

        let Some(mut case) = report::find_by_prompt(&mut tx, request.chat_id, request.prompt_message_id).await? else {
            return Ok(CastVoteOutcome::UnknownCase);
        };

        let group = group::find_or_create(&mut tx, request.chat_id).await?;
        member::find_or_create(&mut tx, request.voter_id).await?;
        let voter = membership::find_or_create(&mut tx, request.chat_id, request.voter_id).await?;
        let offender = membership::find_by_id(&mut tx, case.membership_id)
            .await?
            .ok_or(ReportBotError::ReportNotFound { case_id: case.id })?;

        let standing = VoterStanding::resolve(request.voter_privileged, &voter, &group, request.at);
        let outcome = case.cast_vote(request.voter_id, standing, group.vote_threshold);

        let change = match &outcome {
            VoteOutcome::Counted { change, .. } => Some(change),
            VoteOutcome::Accepted { change, .. } => change.as_ref(),
            VoteOutcome::Ignored(_) => None,
        };
        match change {
            Some(VoteChange::Added(vote)) => {
                report::insert_vote(&mut tx, case.id, vote, request.at).await?
            }
            Some(VoteChange::Removed(vote)) => {
                report::delete_vote(&mut tx, case.id, vote.voter_id).await?
            }
            None => {}
        }

        if let VoteOutcome::Accepted { .. } = outcome {
            if !report::mark_accepted(&mut tx, case.id).await? {
                tx.rollback().await?;
                return Err(ReportBotError::ReportNotFound { case_id: case.id });
            }
        }

        tx.commit().await?;
        Ok(CastVoteOutcome::Applied {
            context: CaseContext { case, group, offender },
            outcome,
        })
    }

    /// Record a confirmed removal of the offender of an accepted case
    pub async fn confirm_removal(&self, membership_id: i64, member_id: i64) -> Result<Member, ReportBotError> {
        let mut tx = self.pool.begin().await?;
        membership::set_banned(&mut tx, membership_id, true).await?;
        member::increment_accepted_reports(&mut tx, member_id).await?;
        let member = member::find_or_create(&mut tx, member_id).await?;
        tx.commit().await?;
        Ok(member)
    }

    /// Apply an admin configuration command to a group
    pub async fn update_group_setting(&self, group_id: i64, setting: GroupSetting) -> Result<Group, ReportBotError> {
        let mut tx = self.pool.begin().await?;
        group::find_or_create(&mut tx, group_id).await?;
        let group = group::update_setting(&mut tx, group_id, setting).await?;
        tx.commit().await?;
        Ok(group)
    }
}
