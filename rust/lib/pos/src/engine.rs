//! The item cart component.
//!
//! `ItemCart` ties the numpad machine, the mirrored lines and totals, the
//! checkout toggle and the customer section together. Inputs come in as
//! method calls; intents go out through the `CartHost`; display state goes
//! to the `ViewStore` after every call.

use tracing::{debug, info, warn};

use crate::config::PosConfig;
use crate::customer::{CONTACT_UPDATED, CustomerSection, RemoveOutcome};
use crate::error::{ErrorKind, Indicator, Notice, PosError};
use crate::highlight::{FlashScheduler, FlashToken, Highlight};
use crate::host::CartHost;
use crate::lines::{CartLines, LineChanges, LineView};
use crate::model::{
    CartLine, CustomerField, CustomerInfo, InvoiceSnapshot, InvoiceSummary, LineKey, NumpadField,
    NumpadKey, TotalsSnapshot,
};
use crate::numpad::{EditSession, Numpad, NumpadIntent, NumpadState};
use crate::totals::TotalsView;
use crate::view::{
    CartItemsView, CheckoutAction, CheckoutView, NumpadView, PanelView, View, ViewStore,
};

pub struct ItemCart<H: CartHost, S: FlashScheduler> {
    config: PosConfig,
    host: H,
    scheduler: S,
    numpad: Numpad,
    highlight: Highlight,
    lines: CartLines,
    totals: TotalsSnapshot,
    customer: CustomerSection,
    checkout: CheckoutAction,
    numpad_shown: bool,
    disabled: bool,
    store: ViewStore,
}

impl<H: CartHost, S: FlashScheduler> ItemCart<H, S> {
    pub fn new(config: PosConfig, host: H, scheduler: S) -> Self {
        let mut cart = Self {
            numpad: Numpad::new(config.discount_limit),
            config,
            host,
            scheduler,
            highlight: Highlight::new(),
            lines: CartLines::new(),
            totals: TotalsSnapshot::default(),
            customer: CustomerSection::new(),
            checkout: CheckoutAction::Checkout,
            numpad_shown: false,
            disabled: false,
            store: ViewStore::new(),
        };
        cart.publish_all();
        cart
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn config(&self) -> &PosConfig {
        &self.config
    }

    pub fn state(&self) -> NumpadState {
        self.numpad.state()
    }

    pub fn session(&self) -> &EditSession {
        self.numpad.session()
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn lines(&self) -> &CartLines {
        &self.lines
    }

    pub fn totals(&self) -> &TotalsSnapshot {
        &self.totals
    }

    pub fn customer(&self) -> &CustomerSection {
        &self.customer
    }

    pub fn checkout_action(&self) -> CheckoutAction {
        self.checkout
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn store(&self) -> &ViewStore {
        &self.store
    }

    /// Mutable access for subscribing renderers.
    pub fn store_mut(&mut self) -> &mut ViewStore {
        &mut self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ── Host snapshots ──────────────────────────────────────────────

    /// Mirror a new snapshot of the order. The edit session is untouched.
    pub fn refresh(&mut self, lines: Vec<CartLine>, totals: TotalsSnapshot) -> LineChanges {
        let changes = self.lines.replace(lines);
        self.totals = totals;
        debug!(
            lines = self.lines.len(),
            added = changes.added.len(),
            updated = changes.updated.len(),
            removed = changes.removed.len(),
            "cart: refreshed"
        );
        self.publish_items();
        self.publish_totals();
        self.publish_checkout();
        changes
    }

    pub fn upsert_line(&mut self, line: CartLine) -> LineChanges {
        let changes = self.lines.upsert(line);
        if !changes.is_empty() {
            self.publish_items();
            self.publish_checkout();
        }
        changes
    }

    pub fn drop_line(&mut self, key: &LineKey) -> Result<CartLine, PosError> {
        let line = self.lines.remove(key)?;
        debug!(%key, "cart: line dropped");
        self.publish_items();
        self.publish_checkout();
        Ok(line)
    }

    pub fn assign_batch(&mut self, key: &LineKey, batch_no: &str) -> Result<LineKey, PosError> {
        let new_key = self.lines.assign_batch(key, batch_no)?;
        debug!(old = %key, new = %new_key, "cart: batch assigned");
        self.publish_items();
        Ok(new_key)
    }

    pub fn update_totals(&mut self, totals: TotalsSnapshot) {
        self.totals = totals;
        self.publish_totals();
    }

    /// Reload everything from an invoice. A submitted invoice can no longer
    /// be checked out or edited, so both actions are hidden.
    pub fn load_invoice(&mut self, invoice: InvoiceSnapshot) {
        self.lines.replace(invoice.lines);
        self.totals = invoice.totals;
        self.customer.set_customer(invoice.customer);
        self.checkout = if invoice.submitted {
            CheckoutAction::Hidden
        } else {
            CheckoutAction::Checkout
        };
        info!(
            lines = self.lines.len(),
            submitted = invoice.submitted,
            "cart: invoice loaded"
        );
        self.publish_all();
    }

    /// Hide the whole component.
    pub fn disable(&mut self) {
        self.disabled = true;
        self.publish_panel();
    }

    // ── Numpad ──────────────────────────────────────────────────────

    /// Feed one numpad key through the machine and act on the outcome.
    pub fn key_press(&mut self, key: NumpadKey) {
        match self.numpad.press(key) {
            Ok(Some(intent)) => self.dispatch(intent),
            Ok(None) => {}
            Err(e) => self.reject(e),
        }
        self.highlight.sync_selected(self.numpad.session().field());
        if key.flashes() {
            self.flash(key);
        }
        self.publish_numpad();
    }

    /// Press a key by its button value (`"qty"`, `"7"`, `"delete"`, ...).
    pub fn press_button(&mut self, value: &str) -> Result<(), PosError> {
        let key: NumpadKey = value.parse()?;
        self.key_press(key);
        Ok(())
    }

    /// Same as pressing the field's key.
    pub fn select_field(&mut self, field: NumpadField) {
        self.key_press(NumpadKey::Field(field));
    }

    /// Report that a flash scheduled earlier has run its course.
    pub fn flash_elapsed(&mut self, token: FlashToken) -> bool {
        let changed = self.highlight.expire(token);
        if changed {
            self.publish_numpad();
        }
        changed
    }

    /// Swap the totals panel for the numpad panel, or back.
    pub fn show_numpad(&mut self, show: bool) {
        self.numpad_shown = show;
        self.publish_panel();
    }

    fn dispatch(&mut self, intent: NumpadIntent) {
        debug!(?intent, "cart: numpad intent");
        match intent {
            NumpadIntent::FieldEdit { field, value } => self.host.field_edit(field, value),
            NumpadIntent::RemoveLine => self.host.remove_line(),
            NumpadIntent::CloseMode => self.host.mode_closed(),
        }
    }

    fn reject(&mut self, err: PosError) {
        match err.kind() {
            ErrorKind::UserInputRejected => {
                warn!(code = err.error_code(), "cart: {}", err);
                if let Some(notice) = err.notice() {
                    self.host.warning(&notice);
                }
            }
            ErrorKind::InvalidTransition => {
                debug!(code = err.error_code(), "cart: ignored: {}", err);
            }
            ErrorKind::Setup => {
                warn!(code = err.error_code(), "cart: unexpected error: {}", err);
            }
        }
    }

    fn flash(&mut self, key: NumpadKey) {
        let (token, replaced) = self.highlight.flash(key);
        if let Some(old) = replaced {
            self.scheduler.cancel(old);
        }
        self.scheduler.schedule(token, self.config.flash_delay());
    }

    // ── Cart actions ────────────────────────────────────────────────

    /// A cart row was clicked. While the payment section is open this
    /// first goes back to editing the cart.
    pub fn item_clicked(&mut self, key: &LineKey) -> Result<(), PosError> {
        if self.lines.get(key).is_none() {
            return Err(PosError::LineNotFound(key.clone()));
        }
        if self.checkout == CheckoutAction::EditCart {
            self.edit_cart_clicked();
        }
        self.host.item_selected(key);
        Ok(())
    }

    /// Returns whether checkout was requested. Ignored on an empty cart.
    pub fn checkout_clicked(&mut self) -> bool {
        if self.checkout != CheckoutAction::Checkout || self.lines.is_empty() {
            debug!(action = ?self.checkout, lines = self.lines.len(), "cart: checkout ignored");
            return false;
        }
        self.host.checkout();
        self.checkout = CheckoutAction::EditCart;
        self.publish_checkout();
        true
    }

    pub fn edit_cart_clicked(&mut self) -> bool {
        if self.checkout != CheckoutAction::EditCart {
            return false;
        }
        self.host.edit_cart();
        self.checkout = CheckoutAction::Checkout;
        self.publish_checkout();
        true
    }

    /// Follow the host's payment section without emitting anything.
    pub fn set_payment_open(&mut self, open: bool) {
        if self.checkout == CheckoutAction::Hidden {
            debug!(open, "cart: payment toggle ignored on submitted invoice");
            return;
        }
        self.checkout = if open {
            CheckoutAction::EditCart
        } else {
            CheckoutAction::Checkout
        };
        self.publish_checkout();
    }

    // ── Customer ────────────────────────────────────────────────────

    pub fn set_customer(&mut self, info: Option<CustomerInfo>) {
        self.customer.set_customer(info);
        self.publish_customer();
        self.publish_items();
    }

    pub fn customer_header_clicked(&mut self) {
        let open = self.customer.toggle_details();
        debug!(open, "cart: customer details toggled");
        self.publish_customer();
        self.publish_items();
    }

    pub fn customer_remove_clicked(&mut self) {
        if self.customer.remove_pressed() == RemoveOutcome::Cleared {
            self.host.customer_cleared();
        }
        self.publish_customer();
        self.publish_items();
    }

    /// The user finished editing a contact field in the details form.
    pub fn customer_field_changed(&mut self, field: CustomerField, value: &str) {
        match self.customer.edit_field(field, value) {
            Ok(Some(value)) => self.host.customer_field_changed(field, &value),
            Ok(None) => {}
            Err(e) => self.reject(e),
        }
    }

    /// The host saved a contact field.
    pub fn customer_field_saved(&mut self, field: CustomerField, value: &str) {
        self.customer.field_saved(field, value);
        self.host
            .warning(&Notice::new(CONTACT_UPDATED, Indicator::Green));
        self.publish_customer();
    }

    pub fn set_transactions(&mut self, transactions: Vec<InvoiceSummary>) {
        self.customer.set_transactions(transactions);
        self.publish_transactions();
    }

    // ── Views ───────────────────────────────────────────────────────

    fn publish<V: View>(&mut self, view: V) {
        self.store.publish(V::PATH, view);
    }

    fn publish_all(&mut self) {
        self.publish_items();
        self.publish_totals();
        self.publish_checkout();
        self.publish_panel();
        self.publish_numpad();
        self.publish_customer();
    }

    fn publish_items(&mut self) {
        let currency = self.totals.currency.clone();
        let view = CartItemsView {
            visible: self.customer.cart_visible(),
            mode: self.lines.mode(),
            lines: self
                .lines
                .iter()
                .map(|l| {
                    LineView::build(
                        l,
                        &currency,
                        self.config.precision,
                        self.config.description_limit,
                    )
                })
                .collect(),
        };
        self.publish(view);
    }

    fn publish_totals(&mut self) {
        let view = TotalsView::build(&self.totals, self.config.precision);
        self.publish(view);
    }

    fn publish_checkout(&mut self) {
        let view = CheckoutView {
            action: self.checkout,
            highlighted: !self.lines.is_empty(),
        };
        self.publish(view);
    }

    fn publish_panel(&mut self) {
        let view = PanelView {
            visible: !self.disabled,
            numpad: self.numpad_shown,
        };
        self.publish(view);
    }

    fn publish_numpad(&mut self) {
        let session = self.numpad.session();
        let view = NumpadView {
            field: session.field(),
            buffer: session.buffer().to_string(),
            lit: self.highlight.lit_keys(),
        };
        self.publish(view);
    }

    fn publish_customer(&mut self) {
        let view = self.customer.view();
        self.publish(view);
        self.publish_transactions();
    }

    fn publish_transactions(&mut self) {
        let view = self.customer.transactions_view(self.config.precision);
        self.publish(view);
    }
}
