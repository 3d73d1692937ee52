//! Moderation coordinator
//!
//! Turns inbound chat events into entity store requests and outbound chat
//! actions. Privilege checks and every chat API call happen here, outside the
//! store worker; the store only ever sees the already resolved privilege flag.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::ModerationConfig;
use crate::database::{CaseContext, CastVote, CastVoteOutcome, OpenReport, OpenReportOutcome};
use crate::models::Group;
use crate::services::actions::{ChatActions, PromptButton};
use crate::services::deferred::DeferredDeletes;
use crate::services::events::{GroupMessage, ReportCommand, SettingCommand, VoteInteraction};
use crate::services::report_case::{IgnoreReason, VoteOutcome};
use crate::services::store::EntityStore;
use crate::services::texts;
use crate::utils::errors::{ReportBotError, Result};
use crate::utils::helpers::{ban_until, parse_non_negative};
use crate::utils::logging::{log_admin_action, log_report_event, log_vote};

/// What the voter sees after pressing the vote button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAck {
    Silent,
    NoVotePower,
}

impl VoteAck {
    pub fn text(&self) -> Option<&'static str> {
        match self {
            VoteAck::Silent => None,
            VoteAck::NoVotePower => Some(texts::NO_VOTE_POWER),
        }
    }
}

pub struct Moderator<A: ChatActions + ?Sized> {
    actions: Arc<A>,
    store: EntityStore,
    config: ModerationConfig,
    deferred: DeferredDeletes,
}

impl<A: ChatActions + ?Sized> Clone for Moderator<A> {
    fn clone(&self) -> Self {
        Self {
            actions: Arc::clone(&self.actions),
            store: self.store.clone(),
            config: self.config.clone(),
            deferred: self.deferred.clone(),
        }
    }
}

impl<A: ChatActions + ?Sized + 'static> Moderator<A> {
    pub fn new(actions: Arc<A>, store: EntityStore, config: ModerationConfig) -> Self {
        Self {
            actions,
            store,
            config,
            deferred: DeferredDeletes::new(),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn deferred(&self) -> &DeferredDeletes {
        &self.deferred
    }

    /// Count a plain group message toward the author's vote power
    pub async fn handle_message(&self, event: GroupMessage) -> Result<()> {
        self.store
            .record_message(event.chat_id, event.author_id, Utc::now())
            .await?;
        Ok(())
    }

    /// Handle `/report` sent in reply to the offending message
    pub async fn handle_report(&self, event: ReportCommand) -> Result<()> {
        let chat_id = event.chat_id;

        let Some(reported) = event.reported else {
            debug!(chat_id = chat_id, user_id = event.initiator_id, "Report without a reply target");
            return self
                .send_notice(chat_id, event.initiator_message_id, texts::REPLY_REQUIRED)
                .await;
        };
        let Some(offender_id) = reported.author_id else {
            debug!(chat_id = chat_id, message_id = reported.message_id, "Reported message has no author");
            return Ok(());
        };

        if self.is_privileged(chat_id, offender_id).await {
            info!(chat_id = chat_id, user_id = offender_id, "Refusing to report an administrator");
            return self
                .send_notice(chat_id, event.initiator_message_id, texts::ADMIN_NOT_REPORTABLE)
                .await;
        }

        let initiator_privileged = self.is_privileged(chat_id, event.initiator_id).await;
        let outcome = self
            .store
            .open_report(OpenReport {
                chat_id,
                initiator_id: event.initiator_id,
                initiator_message_id: event.initiator_message_id,
                offender_id,
                reported_message_id: reported.message_id,
                initiator_privileged,
                at: Utc::now(),
            })
            .await?;

        match outcome {
            OpenReportOutcome::Opened(context) => self.send_prompt(&context).await,
            OpenReportOutcome::Accepted(context) => {
                log_report_event(chat_id, context.case.id, "accepted", Some("initiator is an administrator"));
                self.punish(&context).await
            }
            OpenReportOutcome::AlreadyOpen(_) => {
                self.send_notice(chat_id, event.initiator_message_id, texts::ALREADY_VOTING)
                    .await
            }
            OpenReportOutcome::AlreadyClosed(context) => {
                debug!(chat_id = chat_id, case_id = context.case.id, status = ?context.case.status, "Report on a closed case ignored");
                Ok(())
            }
        }
    }

    /// Handle a press of the vote button under a prompt
    pub async fn handle_vote(&self, event: VoteInteraction) -> Result<VoteAck> {
        let privileged = self.is_privileged(event.chat_id, event.voter_id).await;
        let result = self
            .store
            .cast_vote(CastVote {
                chat_id: event.chat_id,
                voter_id: event.voter_id,
                prompt_message_id: event.prompt_message_id,
                voter_privileged: privileged,
                at: Utc::now(),
            })
            .await?;

        let (context, outcome) = match result {
            CastVoteOutcome::UnknownCase => {
                warn!(
                    chat_id = event.chat_id,
                    message_id = event.prompt_message_id,
                    user_id = event.voter_id,
                    "Vote on a message that is not a report prompt"
                );
                return Ok(VoteAck::Silent);
            }
            CastVoteOutcome::Applied { context, outcome } => (context, outcome),
        };

        match outcome {
            VoteOutcome::Counted { total, .. } => {
                let threshold = context.group.vote_threshold;
                log_vote(event.chat_id, context.case.id, event.voter_id, total, threshold);
                self.update_prompt(&context, PromptButton::Progress { votes: total, threshold })
                    .await;
                Ok(VoteAck::Silent)
            }
            VoteOutcome::Accepted { total, by_privilege, .. } => {
                let details = if by_privilege {
                    "administrator vote".to_string()
                } else {
                    format!("{total}/{} votes", context.group.vote_threshold)
                };
                log_report_event(event.chat_id, context.case.id, "accepted", Some(&details));
                self.update_prompt(&context, PromptButton::Accepted).await;
                self.punish(&context).await?;
                Ok(VoteAck::Silent)
            }
            VoteOutcome::Ignored(IgnoreReason::NoVotePower) => {
                debug!(chat_id = event.chat_id, user_id = event.voter_id, "Vote without vote power");
                Ok(VoteAck::NoVotePower)
            }
            VoteOutcome::Ignored(IgnoreReason::Closed(status)) => {
                debug!(chat_id = event.chat_id, case_id = context.case.id, status = ?status, "Vote on a closed case ignored");
                Ok(VoteAck::Silent)
            }
        }
    }

    /// Handle one of the admin configuration commands
    pub async fn handle_setting(&self, event: SettingCommand) -> Result<()> {
        if !self.is_privileged(event.chat_id, event.author_id).await {
            return self
                .send_notice(event.chat_id, event.message_id, texts::ADMIN_ONLY)
                .await;
        }

        let setting = parse_non_negative(&event.argument).and_then(|value| event.setting.with_value(value));
        let Some(setting) = setting else {
            return self
                .send_notice(event.chat_id, event.message_id, &texts::usage(event.setting))
                .await;
        };
        let value = setting.value();

        self.store.update_group_setting(event.chat_id, setting).await?;
        log_admin_action(event.author_id, event.chat_id, setting.name(), value);

        self.actions
            .send_text(event.chat_id, &texts::setting_updated(setting), Some(event.message_id), None)
            .await?;
        Ok(())
    }

    /// Reply with the group's current settings
    pub async fn show_settings(&self, chat_id: i64, message_id: i64) -> Result<Group> {
        let group = self.store.group(chat_id).await?;
        self.actions
            .send_text(chat_id, &texts::group_settings(&group), Some(message_id), None)
            .await?;
        Ok(group)
    }

    /// Whether `user_id` administers `chat_id`.
    ///
    /// Any failure or a reply slower than the configured timeout counts as
    /// not privileged.
    pub async fn is_privileged(&self, chat_id: i64, user_id: i64) -> bool {
        let limit = Duration::from_secs(self.config.privilege_check_timeout_secs);
        match tokio::time::timeout(limit, self.actions.is_administrator(chat_id, user_id)).await {
            Ok(Ok(privileged)) => privileged,
            Ok(Err(e)) => {
                warn!(chat_id = chat_id, user_id = user_id, error = %e, "Administrator check failed");
                false
            }
            Err(_) => {
                let e = ReportBotError::Timeout(format!("administrator check after {}s", limit.as_secs()));
                warn!(chat_id = chat_id, user_id = user_id, error = %e, "Administrator check failed");
                false
            }
        }
    }

    async fn send_prompt(&self, context: &CaseContext) -> Result<()> {
        let chat_id = context.group.id;
        let button = PromptButton::Progress {
            votes: context.case.vote_total(),
            threshold: context.group.vote_threshold,
        };

        let prompt_id = match self
            .actions
            .send_text(chat_id, texts::VOTE_PROMPT, Some(context.case.reported_message_id), Some(button))
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(chat_id = chat_id, case_id = context.case.id, error = %e, "Failed to send vote prompt");
                return Err(e);
            }
        };

        if !self.store.attach_prompt(context.case.id, prompt_id).await? {
            debug!(chat_id = chat_id, case_id = context.case.id, message_id = prompt_id, "Case already has a prompt");
            if let Err(e) = self.actions.delete_message(chat_id, prompt_id).await {
                warn!(chat_id = chat_id, message_id = prompt_id, error = %e, "Failed to delete duplicate prompt");
            }
            return Ok(());
        }
        log_report_event(chat_id, context.case.id, "opened", None);
        Ok(())
    }

    async fn update_prompt(&self, context: &CaseContext, button: PromptButton) {
        let Some(prompt_id) = context.case.prompt_message_id else {
            return;
        };
        if let Err(e) = self.actions.edit_button(context.group.id, prompt_id, button).await {
            warn!(chat_id = context.group.id, case_id = context.case.id, error = %e, "Failed to update vote prompt");
        }
    }

    /// Remove the offender of a freshly accepted case.
    ///
    /// Must only be called by whoever performed the transition to accepted.
    async fn punish(&self, context: &CaseContext) -> Result<()> {
        let chat_id = context.group.id;
        let case = &context.case;
        let offender_id = context.offender.member_id;

        for message_id in [case.reported_message_id, case.initiator_message_id] {
            if let Err(e) = self.actions.delete_message(chat_id, message_id).await {
                warn!(chat_id = chat_id, message_id = message_id, error = %e, "Failed to delete reported message");
            }
        }

        if let Some(prompt_id) = case.prompt_message_id {
            self.deferred.schedule(
                Arc::clone(&self.actions),
                chat_id,
                prompt_id,
                Duration::from_secs(self.config.prompt_grace_secs),
            );
        }

        let until = ban_until(Utc::now(), self.config.ban_duration_days);
        if let Err(e) = self.actions.remove_member(chat_id, offender_id, until).await {
            warn!(chat_id = chat_id, user_id = offender_id, case_id = case.id, error = %e, "Failed to remove offender");
            return Ok(());
        }

        let member = self
            .store
            .confirm_removal(context.offender.id, offender_id)
            .await?;
        info!(
            chat_id = chat_id,
            user_id = offender_id,
            case_id = case.id,
            until = %until,
            accepted_reports = member.accepted_reports,
            "Offender removed"
        );
        Ok(())
    }

    async fn send_notice(&self, chat_id: i64, reply_to: i64, text: &str) -> Result<()> {
        let notice_id = self.actions.send_text(chat_id, text, Some(reply_to), None).await?;
        self.deferred.schedule(
            Arc::clone(&self.actions),
            chat_id,
            notice_id,
            Duration::from_secs(self.config.notice_ttl_secs),
        );
        Ok(())
    }
}
