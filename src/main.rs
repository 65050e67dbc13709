use std::env;
use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::{info, warn};

use cafebot::bot::{message_handler, AppContext};
use cafebot::config::{load_config, DEFAULT_CONFIG_PATH};
use cafebot::dialogue::OrderDialogueState;
use cafebot::localization::init_localization;
use cafebot::notifier::TelegramNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting cafe order bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Get bot token from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");

    let config_path =
        env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    init_localization()?;

    let config = load_config(&config_path);
    if config.admin_chat_id == 0 {
        warn!("admin_chat_id is not configured; order notifications will not be delivered");
    }
    info!(
        cafe = %config.name,
        items = config.menu.len(),
        admin_chat_id = config.admin_chat_id,
        "serving menu"
    );

    let bot = Bot::new(bot_token);

    let notifier = Arc::new(TelegramNotifier::new(bot.clone(), &config));
    let ctx = Arc::new(AppContext::new(config, notifier));

    info!("Bot initialized, starting dispatcher");

    let handler = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<OrderDialogueState>, OrderDialogueState>()
        .endpoint(message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<OrderDialogueState>::new(),
            ctx
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
