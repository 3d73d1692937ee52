//! Callback query handlers module
//!
//! The only inline button the bot sends is the vote button under a report
//! prompt.

use teloxide::{prelude::*, types::CallbackQuery, Bot};
use tracing::{debug, warn};

use crate::services::{TelegramModerator, VoteInteraction, VOTE_CALLBACK_DATA};
use crate::utils::errors::Result;

/// Apply a vote button press and answer the query.
///
/// The query is answered whatever the outcome, so the client stops showing
/// its loading state.
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, moderator: TelegramModerator) -> Result<()> {
    let voter_id = query.from.id.0 as i64;
    debug!(user_id = voter_id, callback_data = ?query.data, "Callback query received");

    let result = match (&query.data, &query.message) {
        (Some(data), Some(prompt)) if data == VOTE_CALLBACK_DATA => {
            let event = VoteInteraction {
                chat_id: prompt.chat().id.0,
                voter_id,
                prompt_message_id: i64::from(prompt.id().0),
            };
            moderator.handle_vote(event).await.map(Some)
        }
        _ => {
            warn!(user_id = voter_id, callback_data = ?query.data, "Unexpected callback query");
            Ok(None)
        }
    };

    let mut answer = bot.answer_callback_query(query.id.clone());
    if let Ok(Some(ack)) = &result {
        if let Some(text) = ack.text() {
            answer = answer.text(text);
        }
    }
    if let Err(e) = answer.await {
        warn!(user_id = voter_id, error = %e, "Failed to answer callback query");
    }

    result.map(|_| ())
}
