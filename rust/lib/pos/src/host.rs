//! Outbound side of the cart: intents for the host to act on.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::Notice;
use crate::model::{CustomerField, LineKey, NumpadField};

/// Receiver of user intents.
///
/// The cart never changes the order itself. It tells the host what the
/// user asked for and waits for the next snapshot.
pub trait CartHost {
    /// Set `field` of the selected line to `value`.
    fn field_edit(&mut self, field: NumpadField, value: f64);

    /// Delete the selected line.
    fn remove_line(&mut self);

    /// The numpad was closed with Done.
    fn mode_closed(&mut self);

    /// Show a transient, non-blocking message.
    fn warning(&mut self, notice: &Notice);

    fn checkout(&mut self) {}

    fn edit_cart(&mut self) {}

    /// A cart row was clicked; the host opens its item details.
    fn item_selected(&mut self, _key: &LineKey) {}

    fn customer_cleared(&mut self) {}

    fn customer_field_changed(&mut self, _field: CustomerField, _value: &str) {}
}

/// One recorded host call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    FieldEdit { field: NumpadField, value: f64 },
    RemoveLine,
    ModeClosed,
    Warning(Notice),
    Checkout,
    EditCart,
    ItemSelected(LineKey),
    CustomerCleared,
    CustomerFieldChanged { field: CustomerField, value: String },
}

/// A host that queues every call, for callers that handle intents
/// outside the cart's call stack.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<CartEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pop(&mut self) -> Option<CartEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> Vec<CartEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartEvent> {
        self.events.iter()
    }
}

impl CartHost for EventQueue {
    fn field_edit(&mut self, field: NumpadField, value: f64) {
        self.events.push_back(CartEvent::FieldEdit { field, value });
    }

    fn remove_line(&mut self) {
        self.events.push_back(CartEvent::RemoveLine);
    }

    fn mode_closed(&mut self) {
        self.events.push_back(CartEvent::ModeClosed);
    }

    fn warning(&mut self, notice: &Notice) {
        self.events.push_back(CartEvent::Warning(notice.clone()));
    }

    fn checkout(&mut self) {
        self.events.push_back(CartEvent::Checkout);
    }

    fn edit_cart(&mut self) {
        self.events.push_back(CartEvent::EditCart);
    }

    fn item_selected(&mut self, key: &LineKey) {
        self.events.push_back(CartEvent::ItemSelected(key.clone()));
    }

    fn customer_cleared(&mut self) {
        self.events.push_back(CartEvent::CustomerCleared);
    }

    fn customer_field_changed(&mut self, field: CustomerField, value: &str) {
        self.events.push_back(CartEvent::CustomerFieldChanged {
            field,
            value: value.to_string(),
        });
    }
}
