//! # Notifier Module
//!
//! Outbound delivery of order and booking notifications. The admin path is
//! best-effort: a failed delivery is reported to the caller, who logs it and
//! finishes the customer-facing flow anyway. The customer path is awaited.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use teloxide::prelude::*;
use teloxide::types::KeyboardMarkup;
use tracing::{info, warn};

use crate::config::CafeConfig;
use crate::localization::t_args_lang;
use crate::order_engine::{CompletedBooking, CompletedOrder};

/// Everything the admin needs to see about a confirmed order. Sent once,
/// not persisted beyond delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNotification {
    /// Derived from timestamp and user id; not globally persisted.
    pub order_ref: String,
    pub customer_name: String,
    pub customer_id: i64,
    pub customer_handle: Option<String>,
    pub item: String,
    pub quantity: u32,
    pub total: u32,
}

impl AdminNotification {
    pub fn from_order(
        order: &CompletedOrder,
        customer_name: String,
        customer_id: i64,
        customer_handle: Option<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            order_ref: format!("{}-{}", timestamp.format("%Y%m%d%H%M%S"), customer_id),
            customer_name,
            customer_id,
            customer_handle,
            item: order.item.clone(),
            quantity: order.quantity,
            total: order.total,
        }
    }
}

/// Admin-side view of a confirmed table booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingNotification {
    pub booking_ref: String,
    pub customer_name: String,
    pub customer_id: i64,
    pub customer_handle: Option<String>,
    pub date: NaiveDateTime,
    pub party_size: u32,
}

impl BookingNotification {
    pub fn from_booking(
        booking: &CompletedBooking,
        customer_name: String,
        customer_id: i64,
        customer_handle: Option<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            booking_ref: format!("{}-{}", timestamp.format("%Y%m%d%H%M%S"), customer_id),
            customer_name,
            customer_id,
            customer_handle,
            date: booking.date,
            party_size: booking.party_size,
        }
    }
}

/// Custom error type for outbound delivery
#[derive(Debug, Clone)]
pub enum DeliveryError {
    /// The recipient is unreachable or rejected the message
    Send(String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Send(msg) => write!(f, "Delivery error: {msg}"),
        }
    }
}

impl std::error::Error for DeliveryError {}

impl From<teloxide::RequestError> for DeliveryError {
    fn from(err: teloxide::RequestError) -> Self {
        DeliveryError::Send(err.to_string())
    }
}

/// Outbound delivery seam. Production uses [`TelegramNotifier`]; tests
/// substitute a recording fake.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify_admin(&self, note: &AdminNotification) -> Result<(), DeliveryError>;

    async fn notify_booking(&self, note: &BookingNotification) -> Result<(), DeliveryError>;

    async fn notify_customer(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<KeyboardMarkup>,
    ) -> Result<(), DeliveryError>;
}

/// Sends notifications through the Telegram Bot API to a fixed admin chat.
pub struct TelegramNotifier {
    bot: Bot,
    admin_chat_id: ChatId,
    cafe_name: String,
    phone: String,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, config: &CafeConfig) -> Self {
        Self {
            bot,
            admin_chat_id: ChatId(config.admin_chat_id),
            cafe_name: config.name.clone(),
            phone: config.phone.clone(),
        }
    }
}

#[async_trait]
impl Notify for TelegramNotifier {
    async fn notify_admin(&self, note: &AdminNotification) -> Result<(), DeliveryError> {
        let text = format_admin_order(note, &self.cafe_name, &self.phone);
        self.bot.send_message(self.admin_chat_id, text).await?;
        info!(order_ref = %note.order_ref, "admin notified of new order");
        Ok(())
    }

    async fn notify_booking(&self, note: &BookingNotification) -> Result<(), DeliveryError> {
        let text = format_admin_booking(note, &self.cafe_name);
        self.bot.send_message(self.admin_chat_id, text).await?;
        info!(booking_ref = %note.booking_ref, "admin notified of new booking");
        Ok(())
    }

    async fn notify_customer(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<KeyboardMarkup>,
    ) -> Result<(), DeliveryError> {
        match keyboard {
            Some(keyboard) => {
                match self
                    .bot
                    .send_message(chat_id, text.clone())
                    .reply_markup(keyboard)
                    .await
                {
                    Ok(_) => Ok(()),
                    Err(e) => {
                        // The confirmation must reach the customer; retry
                        // once without the keyboard before giving up.
                        warn!(user_id = %chat_id, error = %e, "customer reply failed, retrying as plain text");
                        self.bot.send_message(chat_id, text).await?;
                        Ok(())
                    }
                }
            }
            None => {
                self.bot.send_message(chat_id, text).await?;
                Ok(())
            }
        }
    }
}

/// Format the admin order message. Always rendered in the default locale;
/// the admin chat is the café owner's.
pub fn format_admin_order(note: &AdminNotification, cafe_name: &str, phone: &str) -> String {
    t_args_lang(
        "admin-order",
        &[
            ("cafe", cafe_name),
            ("ref", &note.order_ref),
            ("item", &note.item),
            ("quantity", &note.quantity.to_string()),
            ("total", &note.total.to_string()),
            ("customer", &customer_line(&note.customer_name, &note.customer_handle)),
            ("id", &note.customer_id.to_string()),
            ("phone", phone),
        ],
        None,
    )
}

/// Format the admin booking message.
pub fn format_admin_booking(note: &BookingNotification, cafe_name: &str) -> String {
    t_args_lang(
        "admin-booking",
        &[
            ("cafe", cafe_name),
            ("ref", &note.booking_ref),
            ("date", &note.date.format("%d.%m.%Y %H:%M").to_string()),
            ("party", &note.party_size.to_string()),
            ("customer", &customer_line(&note.customer_name, &note.customer_handle)),
            ("id", &note.customer_id.to_string()),
        ],
        None,
    )
}

fn customer_line(name: &str, handle: &Option<String>) -> String {
    match handle {
        Some(handle) => format!("{name} (@{handle})"),
        None => name.to_string(),
    }
}
