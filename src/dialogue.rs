//! Order dialogue module for handling conversation state with users.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Represents the conversation state for the order dialogue
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum OrderDialogueState {
    #[default]
    Idle,
    AwaitingQuantity {
        draft: OrderDraft,
    },
    AwaitingConfirmation {
        draft: OrderDraft,
    },
    AwaitingBookingDate,
    AwaitingBookingPartySize {
        date: NaiveDateTime,
    },
}

/// Type alias for our order dialogue
pub type OrderDialogue = Dialogue<OrderDialogueState, InMemStorage<OrderDialogueState>>;

/// In-progress, unconfirmed order attached to a session. Quantity and total
/// stay unset until the customer supplies a quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub item: String,
    pub unit_price: u32,
    pub quantity: Option<u32>,
    pub total: Option<u32>,
}

impl OrderDraft {
    pub fn new(item: impl Into<String>, unit_price: u32) -> Self {
        Self {
            item: item.into(),
            unit_price,
            quantity: None,
            total: None,
        }
    }

    /// Fix the quantity and compute the total.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.total = Some(self.unit_price * quantity);
        self.quantity = Some(quantity);
        self
    }
}

/// Validates a quantity input against the configured bound
pub fn validate_quantity(input: &str, max: u32) -> Result<u32, &'static str> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    let quantity: u32 = trimmed.parse().map_err(|_| "not_a_number")?;

    if quantity < 1 || quantity > max {
        return Err("out_of_range");
    }

    Ok(quantity)
}
