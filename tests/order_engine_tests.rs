//! # Order Engine Tests
//!
//! Exercises the dialogue state machine end to end: item selection,
//! quantity validation, confirmation, cancellation and table bookings.

use chrono::{NaiveDate, NaiveDateTime};

use cafebot::catalog::{Catalog, CatalogEntry};
use cafebot::command::UserCommand;
use cafebot::dialogue::{OrderDialogueState, OrderDraft};
use cafebot::order_engine::{apply_command, OrderLimits, Reply, Transition};

fn catalog() -> Catalog {
    Catalog::from_entries(vec![
        CatalogEntry::new("Coffee", 200),
        CatalogEntry::new("Tea", 120),
    ])
}

fn limits() -> OrderLimits {
    OrderLimits {
        max_quantity: 5,
        max_party_size: 12,
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn apply(state: OrderDialogueState, command: UserCommand) -> Transition {
    apply_command(state, command, &catalog(), &limits(), now())
}

#[test]
fn test_item_selection_starts_quantity_dialogue() {
    let transition = apply(
        OrderDialogueState::Idle,
        UserCommand::SelectItem("Coffee".to_string()),
    );

    match &transition.next {
        OrderDialogueState::AwaitingQuantity { draft } => {
            assert_eq!(draft.item, "Coffee");
            assert_eq!(draft.unit_price, 200);
            assert_eq!(draft.quantity, None);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(
        transition.reply,
        Reply::QuantityPrompt {
            item: "Coffee".to_string(),
            price: 200
        }
    );
}

#[test]
fn test_every_valid_quantity_computes_total() {
    for quantity in 1..=5u32 {
        let state = OrderDialogueState::AwaitingQuantity {
            draft: OrderDraft::new("Coffee", 200),
        };
        let transition = apply(state, UserCommand::Text(quantity.to_string()));

        match &transition.next {
            OrderDialogueState::AwaitingConfirmation { draft } => {
                assert_eq!(draft.quantity, Some(quantity));
                assert_eq!(draft.total, Some(200 * quantity));
            }
            other => panic!("unexpected state for quantity {quantity}: {other:?}"),
        }
    }
}

#[test]
fn test_invalid_quantity_keeps_state_and_draft() {
    for input in ["0", "6", "7", "abc", "", "2.5", "-1"] {
        let state = OrderDialogueState::AwaitingQuantity {
            draft: OrderDraft::new("Coffee", 200),
        };
        let transition = apply(state.clone(), UserCommand::Text(input.to_string()));

        assert_eq!(transition.next, state, "state changed for input {input:?}");
        assert_eq!(transition.reply, Reply::InvalidQuantity { max: 5 });
    }
}

#[test]
fn test_confirmation_produces_exactly_one_order() {
    let state = OrderDialogueState::AwaitingConfirmation {
        draft: OrderDraft::new("Coffee", 200).with_quantity(2),
    };
    let transition = apply(state, UserCommand::Confirm);

    assert_eq!(transition.next, OrderDialogueState::Idle);
    match transition.reply {
        Reply::OrderAccepted(order) => {
            assert_eq!(order.item, "Coffee");
            assert_eq!(order.quantity, 2);
            assert_eq!(order.total, 400);
        }
        other => panic!("unexpected reply: {other:?}"),
    }

    // A second confirm lands in Idle and must not produce another order.
    let again = apply(OrderDialogueState::Idle, UserCommand::Confirm);
    assert_eq!(again.next, OrderDialogueState::Idle);
    assert_eq!(again.reply, Reply::MenuFallback);
}

#[test]
fn test_cancel_resets_without_notifying() {
    let states = [
        OrderDialogueState::AwaitingQuantity {
            draft: OrderDraft::new("Coffee", 200),
        },
        OrderDialogueState::AwaitingConfirmation {
            draft: OrderDraft::new("Coffee", 200).with_quantity(3),
        },
        OrderDialogueState::AwaitingBookingDate,
        OrderDialogueState::AwaitingBookingPartySize { date: now() },
    ];

    for state in states {
        let transition = apply(state, UserCommand::Cancel);
        assert_eq!(transition.next, OrderDialogueState::Idle);
        assert_eq!(transition.reply, Reply::Cancelled);
    }
}

#[test]
fn test_reselect_after_cancel_leaves_no_residue() {
    let transition = apply(
        OrderDialogueState::Idle,
        UserCommand::SelectItem("Coffee".to_string()),
    );
    let transition = apply(transition.next, UserCommand::Cancel);
    let transition = apply(transition.next, UserCommand::SelectItem("Tea".to_string()));

    match &transition.next {
        OrderDialogueState::AwaitingQuantity { draft } => {
            assert_eq!(draft.item, "Tea");
            assert_eq!(draft.unit_price, 120);
            assert_eq!(draft.quantity, None);
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn test_new_item_mid_dialogue_restarts_draft() {
    let mid_quantity = OrderDialogueState::AwaitingQuantity {
        draft: OrderDraft::new("Coffee", 200),
    };
    let transition = apply(mid_quantity, UserCommand::SelectItem("Tea".to_string()));
    match &transition.next {
        OrderDialogueState::AwaitingQuantity { draft } => {
            assert_eq!(draft.item, "Tea");
            assert_eq!(draft.unit_price, 120);
        }
        other => panic!("unexpected state: {other:?}"),
    }

    let mid_confirmation = OrderDialogueState::AwaitingConfirmation {
        draft: OrderDraft::new("Coffee", 200).with_quantity(2),
    };
    let transition = apply(mid_confirmation, UserCommand::SelectItem("Tea".to_string()));
    match &transition.next {
        OrderDialogueState::AwaitingQuantity { draft } => {
            assert_eq!(draft.item, "Tea");
            assert_eq!(draft.quantity, None);
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn test_unknown_confirmation_input_reprompts() {
    let state = OrderDialogueState::AwaitingConfirmation {
        draft: OrderDraft::new("Coffee", 200).with_quantity(2),
    };
    let transition = apply(state.clone(), UserCommand::Text("maybe".to_string()));

    assert_eq!(transition.next, state);
    assert_eq!(transition.reply, Reply::ConfirmReprompt);
}

#[test]
fn test_unrelated_input_in_idle_falls_back_to_menu() {
    for command in [
        UserCommand::Text("hello".to_string()),
        UserCommand::Confirm,
        UserCommand::Cancel,
    ] {
        let transition = apply(OrderDialogueState::Idle, command);
        assert_eq!(transition.next, OrderDialogueState::Idle);
        assert_eq!(transition.reply, Reply::MenuFallback);
    }
}

#[test]
fn test_unknown_item_leaves_state_alone() {
    let state = OrderDialogueState::AwaitingQuantity {
        draft: OrderDraft::new("Coffee", 200),
    };
    let transition = apply(state.clone(), UserCommand::SelectItem("Borscht".to_string()));

    assert_eq!(transition.next, state);
    assert_eq!(transition.reply, Reply::MenuFallback);
}

#[test]
fn test_help_mid_dialogue_keeps_state() {
    let state = OrderDialogueState::AwaitingQuantity {
        draft: OrderDraft::new("Coffee", 200),
    };
    let transition = apply(state.clone(), UserCommand::Help);

    assert_eq!(transition.next, state);
    assert_eq!(transition.reply, Reply::Help);
}

/// The full scenario from the menu to the admin notification payload:
/// "Coffee" → "2" → confirm.
#[test]
fn test_full_order_scenario() {
    let transition = apply(
        OrderDialogueState::Idle,
        UserCommand::SelectItem("Coffee".to_string()),
    );
    assert_eq!(
        transition.reply,
        Reply::QuantityPrompt {
            item: "Coffee".to_string(),
            price: 200
        }
    );

    let transition = apply(transition.next, UserCommand::Text("2".to_string()));
    assert_eq!(
        transition.reply,
        Reply::OrderSummary {
            item: "Coffee".to_string(),
            quantity: 2,
            total: 400
        }
    );

    let transition = apply(transition.next, UserCommand::Confirm);
    assert_eq!(transition.next, OrderDialogueState::Idle);
    match transition.reply {
        Reply::OrderAccepted(order) => {
            assert_eq!(order.item, "Coffee");
            assert_eq!(order.quantity, 2);
            assert_eq!(order.total, 400);
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

/// Out-of-range quantity: "7" when the bound is 5.
#[test]
fn test_out_of_range_quantity_reprompts() {
    let state = OrderDialogueState::AwaitingQuantity {
        draft: OrderDraft::new("Coffee", 200),
    };
    let transition = apply(state, UserCommand::Text("7".to_string()));

    match &transition.next {
        OrderDialogueState::AwaitingQuantity { draft } => {
            assert_eq!(draft.quantity, None);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(transition.reply, Reply::InvalidQuantity { max: 5 });
}

#[test]
fn test_booking_happy_path() {
    let transition = apply(OrderDialogueState::Idle, UserCommand::StartBooking);
    assert_eq!(transition.next, OrderDialogueState::AwaitingBookingDate);
    assert_eq!(transition.reply, Reply::BookingDatePrompt);

    let transition = apply(transition.next, UserCommand::Text("14.08 19:30".to_string()));
    assert_eq!(transition.reply, Reply::BookingPartyPrompt);
    let expected_date = NaiveDate::from_ymd_opt(2026, 8, 14)
        .unwrap()
        .and_hms_opt(19, 30, 0)
        .unwrap();
    assert_eq!(
        transition.next,
        OrderDialogueState::AwaitingBookingPartySize {
            date: expected_date
        }
    );

    let transition = apply(transition.next, UserCommand::Text("4".to_string()));
    assert_eq!(transition.next, OrderDialogueState::Idle);
    match transition.reply {
        Reply::BookingAccepted(booking) => {
            assert_eq!(booking.date, expected_date);
            assert_eq!(booking.party_size, 4);
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[test]
fn test_booking_invalid_inputs_reprompt() {
    let transition = apply(
        OrderDialogueState::AwaitingBookingDate,
        UserCommand::Text("yesterday".to_string()),
    );
    assert_eq!(transition.next, OrderDialogueState::AwaitingBookingDate);
    assert_eq!(transition.reply, Reply::InvalidBookingDate);

    // Earlier the same day is already in the past.
    let transition = apply(
        OrderDialogueState::AwaitingBookingDate,
        UserCommand::Text("10.03 11:00".to_string()),
    );
    assert_eq!(transition.next, OrderDialogueState::AwaitingBookingDate);

    let state = OrderDialogueState::AwaitingBookingPartySize { date: now() };
    for input in ["0", "13", "many"] {
        let transition = apply(state.clone(), UserCommand::Text(input.to_string()));
        assert_eq!(transition.next, state);
        assert_eq!(transition.reply, Reply::InvalidBookingParty { max: 12 });
    }
}

#[test]
fn test_booking_button_discards_order_draft() {
    let state = OrderDialogueState::AwaitingConfirmation {
        draft: OrderDraft::new("Coffee", 200).with_quantity(2),
    };
    let transition = apply(state, UserCommand::StartBooking);

    assert_eq!(transition.next, OrderDialogueState::AwaitingBookingDate);
    assert_eq!(transition.reply, Reply::BookingDatePrompt);
}
