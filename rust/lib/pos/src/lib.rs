//! POS item cart — numpad-driven cart interaction engine.
//!
//! The cart mirrors order snapshots pushed by the host, turns numpad key
//! presses into edit intents, and publishes its display state by path so
//! any renderer can draw it. The host owns the order: it applies intents,
//! recomputes totals and pushes the next snapshot.
//!
//! # Inbound
//!
//! - `refresh(lines, totals)` — mirror a new snapshot; never touches an
//!   open edit session
//! - `key_press(key)` — drive the numpad state machine
//!
//! # Outbound
//!
//! `CartHost`: `field_edit`, `remove_line`, `mode_closed`, `warning`, plus
//! checkout, item selection and customer intents.
//!
//! # Display
//!
//! Views live in a `ViewStore` at fixed paths (`cart/items`, `cart/totals`,
//! `numpad/state`, ...) and can be watched with MQTT-style patterns:
//! `cart/+`, `customer/#`, `#`.
//!
//! # Example
//!
//! ```ignore
//! use openerp_pos::{EventQueue, ItemCart, ManualScheduler, NumpadField, NumpadKey, PosConfig};
//!
//! let mut cart = ItemCart::new(PosConfig::default(), EventQueue::new(), ManualScheduler::new());
//! cart.store_mut().subscribe("numpad/state", |path, _| println!("redraw {}", path));
//!
//! cart.key_press(NumpadKey::Field(NumpadField::Quantity));
//! cart.key_press(NumpadKey::Digit(3));
//! cart.key_press(NumpadKey::Done);
//!
//! for event in cart.host_mut().drain() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod config;
pub mod customer;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod host;
pub mod lines;
pub mod model;
pub mod numpad;
pub mod totals;
pub mod view;

pub use config::PosConfig;
pub use engine::ItemCart;
pub use error::{ErrorKind, Indicator, Notice, PosError};
pub use highlight::{FlashScheduler, FlashToken, ManualScheduler, TokioFlashScheduler};
pub use host::{CartEvent, CartHost, EventQueue};
pub use model::{
    CartLine, CustomerField, CustomerInfo, InvoiceSnapshot, InvoiceSummary, LineKey, NumpadField,
    NumpadKey, TaxLine, TotalsSnapshot,
};
pub use numpad::{NumpadIntent, NumpadState};
pub use view::{View, ViewStore, ViewValue};
