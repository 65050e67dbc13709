//! Message Handler module for processing incoming Telegram messages
//!
//! Adapts the platform message to the narrow shape the dialogue engine
//! understands (sender, chat, text), applies the engine, then renders the
//! semantic reply back into localized text and keyboards.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Timelike};
use teloxide::prelude::*;
use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::command::{parse_command, UserCommand};
use crate::config::CafeConfig;
use crate::dialogue::OrderDialogue;
use crate::localization::{t_args_lang, t_lang};
use crate::notifier::{AdminNotification, BookingNotification, Notify};
use crate::order_engine::{apply_command, OrderLimits, Reply};

use super::ui_builder;

/// Application context constructed once at startup and injected into every
/// handler invocation. Replaces module-level singletons.
pub struct AppContext {
    pub config: CafeConfig,
    pub notifier: Arc<dyn Notify>,
    pub limits: OrderLimits,
}

impl AppContext {
    pub fn new(config: CafeConfig, notifier: Arc<dyn Notify>) -> Self {
        let limits = OrderLimits {
            max_quantity: config.max_quantity,
            max_party_size: config.max_party_size,
        };
        Self {
            config,
            notifier,
            limits,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.config.menu
    }
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: OrderDialogue,
    ctx: Arc<AppContext>,
) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    let Some(text) = msg.text() else {
        // Photos, stickers and the like have no place in the order flow.
        debug!(user_id = %msg.chat.id, "received non-text message");
        bot.send_message(msg.chat.id, t_lang("fallback-menu", language_code))
            .reply_markup(ui_builder::main_menu_keyboard(ctx.catalog(), language_code))
            .await?;
        return Ok(());
    };

    debug!(user_id = %msg.chat.id, message_length = text.len(), "received text message");

    let command = parse_command(text, ctx.catalog());

    // The work-hours gate applies only when entering a dialogue; steps of a
    // dialogue already in flight stay available.
    if matches!(
        command,
        UserCommand::SelectItem(_) | UserCommand::StartBooking
    ) {
        if let Some(hours) = ctx.config.work_hours {
            let hour = Local::now().hour() as u8;
            if !hours.contains(hour) {
                bot.send_message(
                    msg.chat.id,
                    ui_builder::closed_text(hours.open(), hours.close(), language_code),
                )
                .reply_markup(ui_builder::main_menu_keyboard(ctx.catalog(), language_code))
                .await?;
                return Ok(());
            }
        }
    }

    let state = dialogue.get().await?.unwrap_or_default();
    let transition = apply_command(
        state,
        command,
        ctx.catalog(),
        &ctx.limits,
        Local::now().naive_local(),
    );

    // The new state is stored before any sends; a failed reply must not
    // leave a confirmed order replayable.
    dialogue.update(transition.next).await?;

    send_reply(&bot, &msg, transition.reply, &ctx, language_code).await
}

async fn send_reply(
    bot: &Bot,
    msg: &Message,
    reply: Reply,
    ctx: &AppContext,
    language_code: Option<&str>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    match reply {
        Reply::Welcome => {
            bot.send_message(chat_id, ui_builder::welcome_text(&ctx.config, language_code))
                .reply_markup(ui_builder::main_menu_keyboard(ctx.catalog(), language_code))
                .await?;
        }
        Reply::Help => {
            bot.send_message(chat_id, ui_builder::help_text(&ctx.config, language_code))
                .await?;
        }
        Reply::MenuFallback => {
            bot.send_message(chat_id, t_lang("fallback-menu", language_code))
                .reply_markup(ui_builder::main_menu_keyboard(ctx.catalog(), language_code))
                .await?;
        }
        Reply::QuantityPrompt { item, price } => {
            bot.send_message(
                chat_id,
                ui_builder::quantity_prompt_text(&item, price, language_code),
            )
            .reply_markup(ui_builder::quantity_keyboard(
                ctx.limits.max_quantity,
                language_code,
            ))
            .await?;
        }
        Reply::InvalidQuantity { max } => {
            bot.send_message(
                chat_id,
                t_args_lang("quantity-invalid", &[("max", &max.to_string())], language_code),
            )
            .await?;
        }
        Reply::OrderSummary {
            item,
            quantity,
            total,
        } => {
            bot.send_message(
                chat_id,
                ui_builder::order_summary_text(&item, quantity, total, language_code),
            )
            .reply_markup(ui_builder::confirm_keyboard(language_code))
            .await?;
        }
        Reply::ConfirmReprompt => {
            bot.send_message(chat_id, t_lang("confirm-unknown", language_code))
                .reply_markup(ui_builder::confirm_keyboard(language_code))
                .await?;
        }
        Reply::Cancelled => {
            bot.send_message(chat_id, t_lang("cancelled", language_code))
                .reply_markup(ui_builder::main_menu_keyboard(ctx.catalog(), language_code))
                .await?;
        }
        Reply::OrderAccepted(order) => {
            let (customer_name, customer_id, customer_handle) = customer_identity(msg);
            let note = AdminNotification::from_order(
                &order,
                customer_name,
                customer_id,
                customer_handle,
                Local::now().naive_local(),
            );
            // Best-effort: the customer still gets a confirmation when the
            // admin chat is unreachable.
            if let Err(e) = ctx.notifier.notify_admin(&note).await {
                error!(order_ref = %note.order_ref, error = %e, "admin notification failed");
            }
            info!(user_id = %chat_id, item = %order.item, total = order.total, "order confirmed");

            ctx.notifier
                .notify_customer(
                    chat_id,
                    ui_builder::order_accepted_text(&ctx.config, language_code),
                    Some(ui_builder::main_menu_keyboard(ctx.catalog(), language_code)),
                )
                .await?;
        }
        Reply::BookingDatePrompt => {
            bot.send_message(chat_id, t_lang("booking-date-prompt", language_code))
                .reply_markup(ui_builder::cancel_keyboard(language_code))
                .await?;
        }
        Reply::InvalidBookingDate => {
            bot.send_message(chat_id, t_lang("booking-date-invalid", language_code))
                .await?;
        }
        Reply::BookingPartyPrompt => {
            bot.send_message(chat_id, t_lang("booking-party-prompt", language_code))
                .reply_markup(ui_builder::cancel_keyboard(language_code))
                .await?;
        }
        Reply::InvalidBookingParty { max } => {
            bot.send_message(
                chat_id,
                t_args_lang(
                    "booking-party-invalid",
                    &[("max", &max.to_string())],
                    language_code,
                ),
            )
            .await?;
        }
        Reply::BookingAccepted(booking) => {
            let (customer_name, customer_id, customer_handle) = customer_identity(msg);
            let note = BookingNotification::from_booking(
                &booking,
                customer_name,
                customer_id,
                customer_handle,
                Local::now().naive_local(),
            );
            if let Err(e) = ctx.notifier.notify_booking(&note).await {
                error!(booking_ref = %note.booking_ref, error = %e, "booking notification failed");
            }
            info!(user_id = %chat_id, party_size = booking.party_size, "booking confirmed");

            ctx.notifier
                .notify_customer(
                    chat_id,
                    ui_builder::booking_accepted_text(&booking, &ctx.config, language_code),
                    Some(ui_builder::main_menu_keyboard(ctx.catalog(), language_code)),
                )
                .await?;
        }
    }

    Ok(())
}

fn customer_identity(msg: &Message) -> (String, i64, Option<String>) {
    match msg.from.as_ref() {
        Some(user) => (user.full_name(), user.id.0 as i64, user.username.clone()),
        None => (msg.chat.id.to_string(), msg.chat.id.0, None),
    }
}
