//! Telegram implementation of [`ChatActions`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ReplyParameters, UserId};
use tracing::{debug, info};
use url::Url;

use crate::config::{BotConfig, ProxyConfig};
use crate::services::actions::{ChatActions, PromptButton, VOTE_CALLBACK_DATA};
use crate::utils::errors::{ReportBotError, Result};

/// Build the bot client, routed through the configured SOCKS5 proxy if any
pub fn build_bot(config: &BotConfig) -> Result<Bot> {
    let Some(proxy) = &config.proxy else {
        return Ok(Bot::new(&config.token));
    };

    let proxy_url = proxy_url(proxy)?;
    info!(proxy = %proxy.address, "Routing Bot API requests through SOCKS5 proxy");

    let client = teloxide::net::default_reqwest_settings()
        .proxy(reqwest::Proxy::all(proxy_url.as_str())?)
        .build()?;
    Ok(Bot::with_client(&config.token, client))
}

/// `socks5://[user:pass@]host:port`
fn proxy_url(proxy: &ProxyConfig) -> Result<Url> {
    let mut url = Url::parse(&format!("socks5://{}", proxy.address))?;
    if let (Some(username), Some(password)) = (&proxy.username, &proxy.password) {
        url.set_username(username)
            .map_err(|_| ReportBotError::Config(format!("Cannot use proxy username '{username}'")))?;
        url.set_password(Some(password))
            .map_err(|_| ReportBotError::Config("Cannot use proxy password".to_string()))?;
    }
    Ok(url)
}

fn keyboard(button: PromptButton) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        button.label(),
        VOTE_CALLBACK_DATA,
    )]])
}

fn to_message_id(id: i64) -> Result<MessageId> {
    i32::try_from(id)
        .map(MessageId)
        .map_err(|_| ReportBotError::InvalidInput(format!("Message id out of range: {id}")))
}

fn to_user_id(id: i64) -> Result<UserId> {
    u64::try_from(id)
        .map(UserId)
        .map_err(|_| ReportBotError::InvalidInput(format!("User id out of range: {id}")))
}

#[derive(Clone)]
pub struct TelegramActions {
    bot: Bot,
}

impl TelegramActions {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatActions for TelegramActions {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
        button: Option<PromptButton>,
    ) -> Result<i64> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(reply_to) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(to_message_id(reply_to)?));
        }
        if let Some(button) = button {
            request = request.reply_markup(keyboard(button));
        }

        let sent = request.await?;
        debug!(chat_id = chat_id, message_id = sent.id.0, "Message sent");
        Ok(i64::from(sent.id.0))
    }

    async fn edit_button(&self, chat_id: i64, message_id: i64, button: PromptButton) -> Result<()> {
        self.bot
            .edit_message_reply_markup(ChatId(chat_id), to_message_id(message_id)?)
            .reply_markup(keyboard(button))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()> {
        self.bot.delete_message(ChatId(chat_id), to_message_id(message_id)?).await?;
        Ok(())
    }

    async fn remove_member(&self, chat_id: i64, user_id: i64, until: DateTime<Utc>) -> Result<()> {
        self.bot
            .ban_chat_member(ChatId(chat_id), to_user_id(user_id)?)
            .until_date(until)
            .await?;
        Ok(())
    }

    async fn is_administrator(&self, chat_id: i64, user_id: i64) -> Result<bool> {
        let target = to_user_id(user_id)?;
        let administrators = self.bot.get_chat_administrators(ChatId(chat_id)).await?;
        Ok(administrators.iter().any(|member| member.user.id == target))
    }
}
