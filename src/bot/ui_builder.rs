//! UI Builder module for creating keyboards and formatting messages

use rand::seq::SliceRandom;
use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::catalog::Catalog;
use crate::config::CafeConfig;
use crate::localization::{t_args_lang, t_lang};
use crate::order_engine::CompletedBooking;

const COMPLIMENT_KEYS: &[&str] = &["compliment-choice", "compliment-taste"];

/// Persistent main menu: one row per catalog item, then booking and help.
pub fn main_menu_keyboard(catalog: &Catalog, language_code: Option<&str>) -> KeyboardMarkup {
    let mut keyboard = KeyboardMarkup::default();
    for entry in catalog.items() {
        keyboard = keyboard.append_row(vec![KeyboardButton::new(entry.label())]);
    }
    keyboard
        .append_row(vec![KeyboardButton::new(t_lang(
            "menu-button-booking",
            language_code,
        ))])
        .append_row(vec![KeyboardButton::new(t_lang(
            "menu-button-help",
            language_code,
        ))])
        .resize_keyboard()
}

/// Numeric quantity choices plus a cancel row.
pub fn quantity_keyboard(max: u32, language_code: Option<&str>) -> KeyboardMarkup {
    let buttons: Vec<KeyboardButton> = (1..=max)
        .map(|n| KeyboardButton::new(n.to_string()))
        .collect();

    let mut keyboard = KeyboardMarkup::default();
    for row in buttons.chunks(5) {
        keyboard = keyboard.append_row(row.to_vec());
    }
    keyboard
        .append_row(vec![KeyboardButton::new(t_lang("button-cancel", language_code))])
        .resize_keyboard()
        .one_time_keyboard()
}

pub fn confirm_keyboard(language_code: Option<&str>) -> KeyboardMarkup {
    KeyboardMarkup::default()
        .append_row(vec![
            KeyboardButton::new(t_lang("button-confirm", language_code)),
            KeyboardButton::new(t_lang("button-cancel", language_code)),
        ])
        .resize_keyboard()
        .one_time_keyboard()
}

/// Single cancel button, used during the booking steps.
pub fn cancel_keyboard(language_code: Option<&str>) -> KeyboardMarkup {
    KeyboardMarkup::default()
        .append_row(vec![KeyboardButton::new(t_lang("button-cancel", language_code))])
        .resize_keyboard()
        .one_time_keyboard()
}

pub fn welcome_text(config: &CafeConfig, language_code: Option<&str>) -> String {
    format!(
        "{}\n\n{}",
        t_args_lang("welcome", &[("cafe", &config.name)], language_code),
        t_lang("welcome-hint", language_code)
    )
}

/// Item line, a small compliment and the quantity question.
pub fn quantity_prompt_text(item: &str, price: u32, language_code: Option<&str>) -> String {
    let compliment = COMPLIMENT_KEYS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(COMPLIMENT_KEYS[0]);

    format!(
        "{}\n\n{}\n\n{}",
        t_args_lang(
            "item-selected",
            &[("item", item), ("price", &price.to_string())],
            language_code
        ),
        t_lang(compliment, language_code),
        t_lang("quantity-question", language_code)
    )
}

pub fn order_summary_text(
    item: &str,
    quantity: u32,
    total: u32,
    language_code: Option<&str>,
) -> String {
    format!(
        "{}\n\n{}",
        t_args_lang(
            "order-summary",
            &[
                ("item", item),
                ("quantity", &quantity.to_string()),
                ("total", &total.to_string()),
            ],
            language_code
        ),
        t_lang("confirm-question", language_code)
    )
}

pub fn order_accepted_text(config: &CafeConfig, language_code: Option<&str>) -> String {
    t_args_lang("order-accepted", &[("phone", &config.phone)], language_code)
}

pub fn booking_accepted_text(
    booking: &CompletedBooking,
    config: &CafeConfig,
    language_code: Option<&str>,
) -> String {
    t_args_lang(
        "booking-accepted",
        &[
            ("date", &booking.date.format("%d.%m.%Y %H:%M").to_string()),
            ("party", &booking.party_size.to_string()),
            ("phone", &config.phone),
        ],
        language_code,
    )
}

pub fn help_text(config: &CafeConfig, language_code: Option<&str>) -> String {
    let mut text = t_args_lang(
        "help",
        &[("cafe", &config.name), ("phone", &config.phone)],
        language_code,
    );
    if let Some(hours) = config.work_hours {
        text.push('\n');
        text.push_str(&t_args_lang(
            "help-hours",
            &[
                ("open", &hours.open().to_string()),
                ("close", &hours.close().to_string()),
            ],
            language_code,
        ));
    }
    text
}

pub fn closed_text(open: u8, close: u8, language_code: Option<&str>) -> String {
    t_args_lang(
        "closed",
        &[("open", &open.to_string()), ("close", &close.to_string())],
        language_code,
    )
}
