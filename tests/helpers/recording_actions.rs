//! Recording fake of the chat platform
//!
//! Every outbound action is appended to a log the tests inspect afterwards.
//! Administrator lists, failures and slow replies are configurable.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ReportBot::services::{ChatActions, PromptButton};
use ReportBot::{ReportBotError, Result};

/// First message id handed out by the fake
pub const FIRST_BOT_MESSAGE_ID: i64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Sent {
        chat_id: i64,
        message_id: i64,
        text: String,
        reply_to: Option<i64>,
        button: Option<PromptButton>,
    },
    Edited {
        chat_id: i64,
        message_id: i64,
        button: PromptButton,
    },
    Deleted {
        chat_id: i64,
        message_id: i64,
    },
    Removed {
        chat_id: i64,
        user_id: i64,
        until: DateTime<Utc>,
    },
}

pub struct RecordingActions {
    admins: Mutex<HashSet<(i64, i64)>>,
    admin_delay: Mutex<Option<Duration>>,
    fail_admin_query: AtomicBool,
    fail_remove: AtomicBool,
    fail_next_send: AtomicBool,
    next_message_id: AtomicI64,
    log: Mutex<Vec<Action>>,
}

impl Default for RecordingActions {
    fn default() -> Self {
        Self {
            admins: Mutex::new(HashSet::new()),
            admin_delay: Mutex::new(None),
            fail_admin_query: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            fail_next_send: AtomicBool::new(false),
            next_message_id: AtomicI64::new(FIRST_BOT_MESSAGE_ID),
            log: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingActions {
    pub fn add_admin(&self, chat_id: i64, user_id: i64) {
        self.admins.lock().unwrap().insert((chat_id, user_id));
    }

    pub fn set_admin_delay(&self, delay: Duration) {
        *self.admin_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_admin_queries(&self) {
        self.fail_admin_query.store(true, Ordering::SeqCst);
    }

    pub fn fail_removals(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }

    /// Make the next `send_text` fail; later sends succeed again
    pub fn fail_next_send(&self) {
        self.fail_next_send.store(true, Ordering::SeqCst);
    }

    pub fn actions(&self) -> Vec<Action> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Texts of all sent messages, in order
    pub fn sent_texts(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Sent { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Id of the most recent message sent with a vote button
    pub fn last_prompt(&self) -> Option<i64> {
        self.actions().into_iter().rev().find_map(|a| match a {
            Action::Sent {
                message_id,
                button: Some(_),
                ..
            } => Some(message_id),
            _ => None,
        })
    }

    /// Id of the most recent message sent without a button
    pub fn last_notice(&self) -> Option<i64> {
        self.actions().into_iter().rev().find_map(|a| match a {
            Action::Sent {
                message_id,
                button: None,
                ..
            } => Some(message_id),
            _ => None,
        })
    }

    pub fn edits(&self) -> Vec<PromptButton> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Edited { button, .. } => Some(button),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Deleted { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self) -> Vec<(i64, DateTime<Utc>)> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Removed { user_id, until, .. } => Some((user_id, until)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: Action) {
        self.log.lock().unwrap().push(action);
    }
}

#[async_trait]
impl ChatActions for RecordingActions {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
        button: Option<PromptButton>,
    ) -> Result<i64> {
        if self.fail_next_send.swap(false, Ordering::SeqCst) {
            return Err(ReportBotError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "sendMessage timed out",
            )));
        }
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.record(Action::Sent {
            chat_id,
            message_id,
            text: text.to_string(),
            reply_to,
            button,
        });
        Ok(message_id)
    }

    async fn edit_button(&self, chat_id: i64, message_id: i64, button: PromptButton) -> Result<()> {
        self.record(Action::Edited {
            chat_id,
            message_id,
            button,
        });
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()> {
        self.record(Action::Deleted { chat_id, message_id });
        Ok(())
    }

    async fn remove_member(&self, chat_id: i64, user_id: i64, until: DateTime<Utc>) -> Result<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(ReportBotError::InvalidInput("not enough rights to ban".to_string()));
        }
        self.record(Action::Removed {
            chat_id,
            user_id,
            until,
        });
        Ok(())
    }

    async fn is_administrator(&self, chat_id: i64, user_id: i64) -> Result<bool> {
        let delay = *self.admin_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_admin_query.load(Ordering::SeqCst) {
            return Err(ReportBotError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )));
        }
        Ok(self.admins.lock().unwrap().contains(&(chat_id, user_id)))
    }
}
