//! # Order Dialogue Engine
//!
//! Deterministic per-user state machine governing order capture:
//! `Idle` → `AwaitingQuantity` → `AwaitingConfirmation` → `Idle`, plus the
//! two-step table booking dialogue. The engine is a pure function over the
//! current state and a parsed [`UserCommand`]; it performs no I/O, reads no
//! clock and knows nothing about the chat platform. The adapter in
//! `bot::message_handler` renders the resulting [`Reply`] and delivers
//! notifications.

use chrono::NaiveDateTime;

use crate::booking::{parse_booking_datetime, parse_party_size};
use crate::catalog::Catalog;
use crate::command::UserCommand;
use crate::config::{DEFAULT_MAX_PARTY_SIZE, DEFAULT_MAX_QUANTITY};
use crate::dialogue::{validate_quantity, OrderDialogueState, OrderDraft};

/// Configured bounds for a single dialogue.
#[derive(Debug, Clone, Copy)]
pub struct OrderLimits {
    pub max_quantity: u32,
    pub max_party_size: u32,
}

impl Default for OrderLimits {
    fn default() -> Self {
        Self {
            max_quantity: DEFAULT_MAX_QUANTITY,
            max_party_size: DEFAULT_MAX_PARTY_SIZE,
        }
    }
}

/// A confirmed order, ready to be forwarded to the admin chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedOrder {
    pub item: String,
    pub unit_price: u32,
    pub quantity: u32,
    pub total: u32,
}

impl OrderDraft {
    /// A draft can only complete once a quantity has been supplied.
    pub fn into_completed(self) -> Option<CompletedOrder> {
        Some(CompletedOrder {
            item: self.item,
            unit_price: self.unit_price,
            quantity: self.quantity?,
            total: self.total?,
        })
    }
}

/// A confirmed table booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedBooking {
    pub date: NaiveDateTime,
    pub party_size: u32,
}

/// Semantic reply produced by a transition. The adapter turns these into
/// localized text and keyboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    Help,
    /// Generic "please use the menu" answer.
    MenuFallback,
    QuantityPrompt { item: String, price: u32 },
    InvalidQuantity { max: u32 },
    OrderSummary { item: String, quantity: u32, total: u32 },
    /// Unrecognized input at the confirmation step.
    ConfirmReprompt,
    Cancelled,
    OrderAccepted(CompletedOrder),
    BookingDatePrompt,
    InvalidBookingDate,
    BookingPartyPrompt,
    InvalidBookingParty { max: u32 },
    BookingAccepted(CompletedBooking),
}

/// Result of applying one command to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: OrderDialogueState,
    pub reply: Reply,
}

impl Transition {
    fn to(next: OrderDialogueState, reply: Reply) -> Self {
        Self { next, reply }
    }
}

/// Apply a command to the current dialogue state.
///
/// Policy notes (recorded in DESIGN.md): explicit menu actions (selecting
/// an item, pressing the booking button) always act, discarding any
/// unconfirmed draft. Everything else mid-dialogue re-prompts in place; an
/// in-progress order is never silently reset.
pub fn apply_command(
    state: OrderDialogueState,
    command: UserCommand,
    catalog: &Catalog,
    limits: &OrderLimits,
    now: NaiveDateTime,
) -> Transition {
    match command {
        UserCommand::SelectItem(name) => return select_item(state, &name, catalog),
        UserCommand::StartBooking => {
            return Transition::to(OrderDialogueState::AwaitingBookingDate, Reply::BookingDatePrompt)
        }
        _ => {}
    }

    match state {
        OrderDialogueState::Idle => match command {
            UserCommand::Start => Transition::to(OrderDialogueState::Idle, Reply::Welcome),
            UserCommand::Help => Transition::to(OrderDialogueState::Idle, Reply::Help),
            // Confirm, Cancel and free text have nothing to act on here.
            _ => Transition::to(OrderDialogueState::Idle, Reply::MenuFallback),
        },

        OrderDialogueState::AwaitingQuantity { draft } => match command {
            UserCommand::Cancel => Transition::to(OrderDialogueState::Idle, Reply::Cancelled),
            UserCommand::Help => {
                Transition::to(OrderDialogueState::AwaitingQuantity { draft }, Reply::Help)
            }
            UserCommand::Text(input) => match validate_quantity(&input, limits.max_quantity) {
                Ok(quantity) => {
                    let reply = Reply::OrderSummary {
                        item: draft.item.clone(),
                        quantity,
                        total: draft.unit_price * quantity,
                    };
                    Transition::to(
                        OrderDialogueState::AwaitingConfirmation {
                            draft: draft.with_quantity(quantity),
                        },
                        reply,
                    )
                }
                Err(_) => Transition::to(
                    OrderDialogueState::AwaitingQuantity { draft },
                    Reply::InvalidQuantity {
                        max: limits.max_quantity,
                    },
                ),
            },
            _ => Transition::to(
                OrderDialogueState::AwaitingQuantity { draft },
                Reply::InvalidQuantity {
                    max: limits.max_quantity,
                },
            ),
        },

        OrderDialogueState::AwaitingConfirmation { draft } => match command {
            UserCommand::Confirm => match draft.into_completed() {
                Some(order) => Transition::to(OrderDialogueState::Idle, Reply::OrderAccepted(order)),
                // A draft without a quantity cannot reach this state; if it
                // somehow does, drop it instead of notifying with bad data.
                None => Transition::to(OrderDialogueState::Idle, Reply::MenuFallback),
            },
            UserCommand::Cancel => Transition::to(OrderDialogueState::Idle, Reply::Cancelled),
            UserCommand::Help => Transition::to(
                OrderDialogueState::AwaitingConfirmation { draft },
                Reply::Help,
            ),
            _ => Transition::to(
                OrderDialogueState::AwaitingConfirmation { draft },
                Reply::ConfirmReprompt,
            ),
        },

        OrderDialogueState::AwaitingBookingDate => match command {
            UserCommand::Cancel => Transition::to(OrderDialogueState::Idle, Reply::Cancelled),
            UserCommand::Help => {
                Transition::to(OrderDialogueState::AwaitingBookingDate, Reply::Help)
            }
            UserCommand::Text(input) => match parse_booking_datetime(&input, now) {
                Ok(date) => Transition::to(
                    OrderDialogueState::AwaitingBookingPartySize { date },
                    Reply::BookingPartyPrompt,
                ),
                Err(_) => Transition::to(
                    OrderDialogueState::AwaitingBookingDate,
                    Reply::InvalidBookingDate,
                ),
            },
            _ => Transition::to(
                OrderDialogueState::AwaitingBookingDate,
                Reply::InvalidBookingDate,
            ),
        },

        OrderDialogueState::AwaitingBookingPartySize { date } => match command {
            UserCommand::Cancel => Transition::to(OrderDialogueState::Idle, Reply::Cancelled),
            UserCommand::Help => Transition::to(
                OrderDialogueState::AwaitingBookingPartySize { date },
                Reply::Help,
            ),
            UserCommand::Text(input) => match parse_party_size(&input, limits.max_party_size) {
                Ok(party_size) => Transition::to(
                    OrderDialogueState::Idle,
                    Reply::BookingAccepted(CompletedBooking { date, party_size }),
                ),
                Err(_) => Transition::to(
                    OrderDialogueState::AwaitingBookingPartySize { date },
                    Reply::InvalidBookingParty {
                        max: limits.max_party_size,
                    },
                ),
            },
            _ => Transition::to(
                OrderDialogueState::AwaitingBookingPartySize { date },
                Reply::InvalidBookingParty {
                    max: limits.max_party_size,
                },
            ),
        },
    }
}

/// Start (or restart) an order for a catalog item. Any draft the session
/// was carrying is overwritten, never merged.
fn select_item(state: OrderDialogueState, name: &str, catalog: &Catalog) -> Transition {
    match catalog.price_of(name) {
        Ok(price) => Transition::to(
            OrderDialogueState::AwaitingQuantity {
                draft: OrderDraft::new(name, price),
            },
            Reply::QuantityPrompt {
                item: name.to_string(),
                price,
            },
        ),
        // Unknown items behave like any other unrecognized input: the
        // current state is left alone.
        Err(_) => Transition::to(state, Reply::MenuFallback),
    }
}
