//! ReportBot Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use teloxide::{prelude::*, types::Update};
use tracing::{info, warn};

use ReportBot::{
    config::{Cli, Settings},
    database::{create_pool, run_migrations, DatabaseService},
    handlers::{self, commands::Command, log_handler_error},
    services::{build_bot, EntityStore, Moderator, TelegramActions, TelegramModerator},
    utils::logging,
};

const STORE_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load(&cli).context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ReportBot::info());

    // Initialize database connection
    info!(in_memory = settings.database.in_memory, "Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;
    run_migrations(&db_pool).await?;

    let (store, store_worker) = EntityStore::spawn(DatabaseService::new(db_pool.clone()));

    // Initialize bot
    let bot = build_bot(&settings.bot)?;
    let actions = Arc::new(TelegramActions::new(bot.clone()));
    let moderator: TelegramModerator = Moderator::new(actions, store, settings.moderation.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register the command list");
    }

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![moderator.clone()])
        .default_handler(|upd| async move {
            tracing::debug!(update_id = upd.id.0, "Unhandled update");
        })
        .enable_ctrlc_handler()
        .build();

    info!("ReportBot is ready, starting polling...");
    dispatcher.dispatch().await;

    // The store worker stops once the last moderator clone is gone
    drop(dispatcher);
    moderator.deferred().shutdown().await;
    drop(moderator);
    match tokio::time::timeout(STORE_SHUTDOWN_TIMEOUT, store_worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Entity store worker did not stop cleanly"),
        Err(_) => warn!("Entity store worker still busy at shutdown"),
    }
    db_pool.close().await;

    info!("ReportBot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Count regular messages
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(
            // Handle vote button presses
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
}

/// Handle bot commands
async fn handle_commands(bot: Bot, msg: Message, cmd: Command, moderator: TelegramModerator) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    if let Err(e) = handlers::handle_command(bot, msg, cmd, moderator).await {
        log_handler_error("command", chat_id, &e);
    }
    Ok(())
}

/// Handle regular messages
async fn handle_messages(msg: Message, moderator: TelegramModerator) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    if let Err(e) = handlers::handle_message(msg, moderator).await {
        log_handler_error("message", chat_id, &e);
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(bot: Bot, query: CallbackQuery, moderator: TelegramModerator) -> HandlerResult {
    let chat_id = query.message.as_ref().map(|m| m.chat().id.0).unwrap_or_default();
    if let Err(e) = handlers::handle_callback_query(bot, query, moderator).await {
        log_handler_error("callback query", chat_id, &e);
    }
    Ok(())
}
