//! Tagged command vocabulary parsed from raw message text.
//!
//! The dialogue engine never compares presentation strings itself; every
//! inbound text is mapped to a [`UserCommand`] here, including the localized
//! keyboard labels, so emoji and wording changes stay out of control flow.

use crate::catalog::Catalog;

/// What the customer asked for, independent of how it was phrased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserCommand {
    Start,
    Help,
    SelectItem(String),
    StartBooking,
    Confirm,
    Cancel,
    /// Free text: a quantity, a booking date, or something unrecognized.
    /// Interpretation depends on the dialogue state.
    Text(String),
}

// Both locales' keyboard labels plus the bare words, lowercased.
const CANCEL_TOKENS: &[&str] = &[
    "/cancel",
    "отмена",
    "❌ отмена",
    "cancel",
    "❌ cancel",
    "назад",
    "back",
];
const CONFIRM_TOKENS: &[&str] = &[
    "/confirm",
    "подтвердить",
    "✅ подтвердить",
    "confirm",
    "✅ confirm",
    "да",
    "yes",
];
const BOOKING_TOKENS: &[&str] = &[
    "/book",
    "бронь столика",
    "📋 бронь столика",
    "book a table",
    "📋 book a table",
];
const HELP_TOKENS: &[&str] = &["/help", "помощь", "❓ помощь", "help", "❓ help"];

/// Map raw message text to a command. Menu items are matched against both
/// the full keyboard label and the bare item name, case-insensitively.
pub fn parse_command(text: &str, catalog: &Catalog) -> UserCommand {
    let trimmed = text.trim();
    let normalized = trimmed.to_lowercase();

    if normalized == "/start" {
        return UserCommand::Start;
    }
    if HELP_TOKENS.contains(&normalized.as_str()) {
        return UserCommand::Help;
    }
    if CANCEL_TOKENS.contains(&normalized.as_str()) {
        return UserCommand::Cancel;
    }
    if CONFIRM_TOKENS.contains(&normalized.as_str()) {
        return UserCommand::Confirm;
    }
    if BOOKING_TOKENS.contains(&normalized.as_str()) {
        return UserCommand::StartBooking;
    }

    for entry in catalog.items() {
        if normalized == entry.label().to_lowercase() || normalized == entry.name.to_lowercase() {
            return UserCommand::SelectItem(entry.name.clone());
        }
    }

    UserCommand::Text(trimmed.to_string())
}
