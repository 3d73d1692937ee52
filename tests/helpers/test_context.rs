//! Test context for unified test setup
//!
//! Wires an in-memory database, the entity store and a moderator driven by
//! the recording fake.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;

use ReportBot::config::{DatabaseConfig, ModerationConfig};
use ReportBot::database::{create_pool, run_migrations, DatabasePool, DatabaseService};
use ReportBot::models::GroupSetting;
use ReportBot::services::{
    EntityStore, GroupMessage, Moderator, ReportCommand, ReportedMessage, VoteAck, VoteInteraction,
};

use super::recording_actions::RecordingActions;

pub const CHAT: i64 = -1001234567890;

/// Moderation settings with no waiting, so deferred deletes run at once
pub fn test_moderation_config() -> ModerationConfig {
    ModerationConfig {
        ban_duration_days: 730,
        prompt_grace_secs: 0,
        notice_ttl_secs: 0,
        privilege_check_timeout_secs: 1,
    }
}

pub struct TestContext {
    pub pool: DatabasePool,
    pub store: EntityStore,
    pub actions: Arc<RecordingActions>,
    pub moderator: Moderator<RecordingActions>,
    pub worker: JoinHandle<()>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(test_moderation_config()).await
    }

    pub async fn with_config(config: ModerationConfig) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let pool = create_pool(&DatabaseConfig {
            path: String::new(),
            in_memory: true,
        })
        .await
        .expect("Failed to create in-memory database");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let (store, worker) = EntityStore::spawn(DatabaseService::new(pool.clone()));
        let actions = Arc::new(RecordingActions::default());
        let moderator = Moderator::new(Arc::clone(&actions), store.clone(), config);

        Self {
            pool,
            store,
            actions,
            moderator,
            worker,
        }
    }

    /// Make every member with at least one message eligible to vote
    pub async fn open_voting(&self, chat_id: i64, threshold: i64) {
        for setting in [
            GroupSetting::VoteThreshold(threshold),
            GroupSetting::CooldownMinutes(0),
            GroupSetting::MinMessagesForVotePower(1),
        ] {
            self.store.update_group_setting(chat_id, setting).await.unwrap();
        }
    }

    pub async fn say(&self, chat_id: i64, author_id: i64, message_id: i64) {
        self.moderator
            .handle_message(GroupMessage {
                chat_id,
                author_id,
                message_id,
            })
            .await
            .unwrap();
    }

    /// `initiator_id` sends `/report` as message `command_id`, replying to
    /// `target_id` written by `offender_id`
    pub async fn report(&self, chat_id: i64, initiator_id: i64, command_id: i64, offender_id: i64, target_id: i64) {
        self.moderator
            .handle_report(ReportCommand {
                chat_id,
                initiator_id,
                initiator_message_id: command_id,
                reported: Some(ReportedMessage {
                    message_id: target_id,
                    author_id: Some(offender_id),
                }),
            })
            .await
            .unwrap();
    }

    pub async fn vote(&self, chat_id: i64, voter_id: i64, prompt_message_id: i64) -> VoteAck {
        self.moderator
            .handle_vote(VoteInteraction {
                chat_id,
                voter_id,
                prompt_message_id,
            })
            .await
            .unwrap()
    }

    /// Wait for every scheduled delete to finish
    pub async fn settle(&self) {
        self.moderator.deferred().drain().await;
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn case_status(&self, target_id: i64) -> Option<String> {
        sqlx::query_scalar("SELECT status FROM report_cases WHERE reported_message_id = ?")
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap()
    }
}

/// Whole days from now until `moment`
pub fn days_from_now(moment: chrono::DateTime<Utc>) -> i64 {
    (moment - Utc::now() + chrono::Duration::hours(1)).num_days()
}
