//! Display state published by the cart.
//!
//! Each view type lives at a fixed path. Renderers subscribe to paths (or
//! patterns such as `cart/+`) on the `ViewStore` and redraw from the value;
//! non-Rust renderers go through the JSON bridge in `json`.

pub mod json;
pub mod store;
pub mod trie;

use serde::Serialize;

use crate::customer::{CustomerView, TransactionsView};
use crate::lines::{CartMode, LineView};
use crate::model::{NumpadField, NumpadKey};
use crate::totals::TotalsView;

pub use store::{SubscriptionId, ViewStore, ViewValue};
pub use trie::PatternTrie;

/// A value published at a well-known path.
pub trait View: Serialize + PartialEq + Send + Sync + 'static {
    const PATH: &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItemsView {
    /// False while the customer details form covers the cart.
    pub visible: bool,
    pub mode: CartMode,
    pub lines: Vec<LineView>,
}

impl View for CartItemsView {
    const PATH: &'static str = "cart/items";
}

impl View for TotalsView {
    const PATH: &'static str = "cart/totals";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutAction {
    Checkout,
    EditCart,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutView {
    pub action: CheckoutAction,
    /// Checkout is highlighted once the cart has lines.
    pub highlighted: bool,
}

impl View for CheckoutView {
    const PATH: &'static str = "cart/checkout";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelView {
    /// False once the component is disabled.
    pub visible: bool,
    /// Numpad panel shown in place of the totals panel.
    pub numpad: bool,
}

impl View for PanelView {
    const PATH: &'static str = "cart/panel";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumpadView {
    pub field: Option<NumpadField>,
    pub buffer: String,
    pub lit: Vec<NumpadKey>,
}

impl View for NumpadView {
    const PATH: &'static str = "numpad/state";
}

impl View for CustomerView {
    const PATH: &'static str = "customer/section";
}

impl View for TransactionsView {
    const PATH: &'static str = "customer/transactions";
}

/// Every path the cart publishes to.
pub const PATHS: [&str; 7] = [
    CartItemsView::PATH,
    TotalsView::PATH,
    CheckoutView::PATH,
    PanelView::PATH,
    NumpadView::PATH,
    CustomerView::PATH,
    TransactionsView::PATH,
];
