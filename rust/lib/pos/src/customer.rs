//! Customer section of the cart.
//!
//! Three display modes: a selector when no customer is set, a one-line
//! summary, and an expanded details form that hides the cart while open.

use serde::Serialize;
use tracing::debug;

use crate::error::{Indicator, PosError};
use crate::model::{CustomerField, CustomerInfo, InvoiceSummary};
use crate::totals::format_amount;

pub const CONTACT_PLACEHOLDER: &str = "Click to add email / phone";
pub const NO_TRANSACTIONS: &str = "No recent transactions found";
pub const CONTACT_UPDATED: &str = "Customer contact updated successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMode {
    Selector,
    Summary,
    Details,
}

/// Result of pressing the add/remove control next to the customer name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The details form was open and is now closed.
    Collapsed,
    /// The customer was unset; the host must clear it on the document.
    Cleared,
    /// Nothing to do.
    Ignored,
}

#[derive(Debug, Default)]
pub struct CustomerSection {
    info: Option<CustomerInfo>,
    expanded: bool,
    transactions: Vec<InvoiceSummary>,
}

impl CustomerSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> Option<&CustomerInfo> {
        self.info.as_ref()
    }

    pub fn mode(&self) -> SectionMode {
        match (&self.info, self.expanded) {
            (None, _) => SectionMode::Selector,
            (Some(_), false) => SectionMode::Summary,
            (Some(_), true) => SectionMode::Details,
        }
    }

    /// Whether the cart list is visible (it is hidden behind the details form).
    pub fn cart_visible(&self) -> bool {
        self.mode() != SectionMode::Details
    }

    /// Set or unset the customer. A different customer collapses the form
    /// and drops the previous customer's transactions.
    pub fn set_customer(&mut self, info: Option<CustomerInfo>) {
        let same = match (&self.info, &info) {
            (Some(a), Some(b)) => a.customer == b.customer,
            _ => false,
        };
        if !same {
            self.expanded = false;
            self.transactions.clear();
        }
        self.info = info;
    }

    /// Toggle the details form. Returns whether it is now open.
    pub fn toggle_details(&mut self) -> bool {
        if self.info.is_none() {
            return false;
        }
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn remove_pressed(&mut self) -> RemoveOutcome {
        match self.mode() {
            SectionMode::Details => {
                self.expanded = false;
                RemoveOutcome::Collapsed
            }
            SectionMode::Summary => {
                self.set_customer(None);
                RemoveOutcome::Cleared
            }
            SectionMode::Selector => RemoveOutcome::Ignored,
        }
    }

    /// Validate an edit of a contact field. Returns the value to send to
    /// the host, or `None` when there is nothing to save.
    pub fn edit_field(
        &self,
        field: CustomerField,
        value: &str,
    ) -> Result<Option<String>, PosError> {
        if field.is_read_only() {
            return Err(PosError::ReadOnlyField(field.as_str()));
        }
        let Some(info) = &self.info else {
            return Ok(None);
        };
        let value = value.trim();
        if value.is_empty() || current_value(info, field).as_deref() == Some(value) {
            return Ok(None);
        }
        Ok(Some(value.to_string()))
    }

    /// Record a contact field the host has saved.
    pub fn field_saved(&mut self, field: CustomerField, value: &str) {
        let Some(info) = self.info.as_mut() else {
            debug!(field = field.as_str(), "customer: save confirmed with no customer set");
            return;
        };
        let value = Some(value.to_string());
        match field {
            CustomerField::EmailId => info.email_id = value,
            CustomerField::MobileNo => info.mobile_no = value,
            CustomerField::LoyaltyProgram => info.loyalty_program = value,
            CustomerField::LoyaltyPoints => {
                info.loyalty_points = value.and_then(|v| v.parse().ok())
            }
        }
    }

    pub fn set_transactions(&mut self, transactions: Vec<InvoiceSummary>) {
        self.transactions = transactions;
    }

    pub fn view(&self) -> CustomerView {
        let Some(info) = &self.info else {
            return CustomerView {
                mode: SectionMode::Selector,
                name: None,
                contact: None,
                avatar: None,
                details: None,
            };
        };
        let mode = self.mode();
        CustomerView {
            mode,
            name: Some(info.customer.clone()),
            contact: Some(contact_line(info)),
            avatar: Some(match &info.image {
                Some(url) if !url.is_empty() => Avatar::Image(url.clone()),
                _ => Avatar::Initials(abbreviate(&info.customer)),
            }),
            details: (mode == SectionMode::Details).then(|| CustomerDetails {
                email_id: info.email_id.clone().unwrap_or_default(),
                mobile_no: info.mobile_no.clone().unwrap_or_default(),
                loyalty_program: info.loyalty_program.clone().unwrap_or_default(),
                loyalty_points: info.loyalty_points.unwrap_or(0),
            }),
        }
    }

    pub fn transactions_view(&self, precision: usize) -> TransactionsView {
        if self.transactions.is_empty() {
            return TransactionsView {
                last_transacted: None,
                rows: Vec::new(),
                empty_message: Some(NO_TRANSACTIONS.to_string()),
            };
        }
        TransactionsView {
            last_transacted: self.transactions.first().map(posted_at),
            rows: self
                .transactions
                .iter()
                .map(|inv| TransactionRow {
                    name: inv.name.clone(),
                    posted_at: posted_at(inv),
                    grand_total: format_amount(inv.grand_total, &inv.currency, precision),
                    status: inv.status.to_uppercase(),
                    indicator: status_indicator(&inv.status),
                })
                .collect(),
            empty_message: None,
        }
    }
}

fn current_value(info: &CustomerInfo, field: CustomerField) -> Option<String> {
    match field {
        CustomerField::EmailId => info.email_id.clone(),
        CustomerField::MobileNo => info.mobile_no.clone(),
        CustomerField::LoyaltyProgram => info.loyalty_program.clone(),
        CustomerField::LoyaltyPoints => info.loyalty_points.map(|p| p.to_string()),
    }
}

fn posted_at(inv: &InvoiceSummary) -> String {
    format!("{} {}", inv.posting_date, inv.posting_time)
        .trim()
        .to_string()
}

/// Second line under the customer name.
pub fn contact_line(info: &CustomerInfo) -> String {
    let email = info.email_id.as_deref().filter(|s| !s.is_empty());
    let mobile = info.mobile_no.as_deref().filter(|s| !s.is_empty());
    match (email, mobile) {
        (Some(e), Some(m)) => format!("{} | {}", e, m),
        (Some(e), None) => e.to_string(),
        (None, Some(m)) => m.to_string(),
        (None, None) => CONTACT_PLACEHOLDER.to_string(),
    }
}

/// Initials of the first two words, uppercased.
pub fn abbreviate(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-')
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn status_indicator(status: &str) -> Option<Indicator> {
    match status {
        "Paid" | "Consolidated" => Some(Indicator::Green),
        "Draft" => Some(Indicator::Red),
        "Return" => Some(Indicator::Grey),
        _ => None,
    }
}

// ── Views ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Avatar {
    Image(String),
    Initials(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDetails {
    pub email_id: String,
    pub mobile_no: String,
    pub loyalty_program: String,
    pub loyalty_points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerView {
    pub mode: SectionMode,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub avatar: Option<Avatar>,
    pub details: Option<CustomerDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub name: String,
    pub posted_at: String,
    pub grand_total: String,
    pub status: String,
    pub indicator: Option<Indicator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionsView {
    pub last_transacted: Option<String>,
    pub rows: Vec<TransactionRow>,
    pub empty_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> CustomerInfo {
        CustomerInfo {
            email_id: Some("alice@example.com".into()),
            ..CustomerInfo::new("Alice Liddell")
        }
    }

    fn invoice(name: &str, status: &str) -> InvoiceSummary {
        InvoiceSummary {
            name: name.into(),
            grand_total: 42.0,
            status: status.into(),
            posting_date: "2026-10-01".into(),
            posting_time: "09:30:00".into(),
            currency: "USD".into(),
        }
    }

    // ========================================================================
    // Modes
    // ========================================================================

    #[test]
    fn selector_without_customer() {
        let s = CustomerSection::new();
        assert_eq!(s.mode(), SectionMode::Selector);
        assert!(s.cart_visible());
        assert_eq!(s.view().mode, SectionMode::Selector);
    }

    #[test]
    fn toggle_details_hides_cart() {
        let mut s = CustomerSection::new();
        s.set_customer(Some(alice()));
        assert_eq!(s.mode(), SectionMode::Summary);

        assert!(s.toggle_details());
        assert_eq!(s.mode(), SectionMode::Details);
        assert!(!s.cart_visible());

        assert!(!s.toggle_details());
        assert!(s.cart_visible());
    }

    #[test]
    fn toggle_without_customer_is_noop() {
        let mut s = CustomerSection::new();
        assert!(!s.toggle_details());
        assert_eq!(s.mode(), SectionMode::Selector);
    }

    #[test]
    fn remove_collapses_then_clears() {
        let mut s = CustomerSection::new();
        s.set_customer(Some(alice()));
        s.toggle_details();

        assert_eq!(s.remove_pressed(), RemoveOutcome::Collapsed);
        assert_eq!(s.mode(), SectionMode::Summary);
        assert_eq!(s.remove_pressed(), RemoveOutcome::Cleared);
        assert_eq!(s.mode(), SectionMode::Selector);
        assert_eq!(s.remove_pressed(), RemoveOutcome::Ignored);
    }

    #[test]
    fn new_customer_collapses_and_drops_transactions() {
        let mut s = CustomerSection::new();
        s.set_customer(Some(alice()));
        s.toggle_details();
        s.set_transactions(vec![invoice("SINV-1", "Paid")]);

        s.set_customer(Some(CustomerInfo::new("Bob")));
        assert_eq!(s.mode(), SectionMode::Summary);
        assert!(s.transactions_view(2).rows.is_empty());
    }

    // ========================================================================
    // Contact line / avatar
    // ========================================================================

    #[test]
    fn contact_line_variants() {
        let mut info = CustomerInfo::new("Alice");
        assert_eq!(contact_line(&info), CONTACT_PLACEHOLDER);

        info.email_id = Some("a@x.io".into());
        assert_eq!(contact_line(&info), "a@x.io");

        info.mobile_no = Some("555-0100".into());
        assert_eq!(contact_line(&info), "a@x.io | 555-0100");

        info.email_id = Some(String::new());
        assert_eq!(contact_line(&info), "555-0100");
    }

    #[test]
    fn abbreviation() {
        assert_eq!(abbreviate("Alice Liddell"), "AL");
        assert_eq!(abbreviate("walk-in customer"), "WC");
        assert_eq!(abbreviate("Zed"), "Z");
        assert_eq!(abbreviate("Grand Hotel Budapest"), "GH");
    }

    #[test]
    fn avatar_prefers_image() {
        let mut s = CustomerSection::new();
        let mut info = alice();
        info.image = Some("/files/alice.png".into());
        s.set_customer(Some(info));
        assert_eq!(s.view().avatar, Some(Avatar::Image("/files/alice.png".into())));

        s.set_customer(Some(CustomerInfo::new("Bob Stone")));
        assert_eq!(s.view().avatar, Some(Avatar::Initials("BS".into())));
    }

    #[test]
    fn details_only_when_expanded() {
        let mut s = CustomerSection::new();
        s.set_customer(Some(alice()));
        assert!(s.view().details.is_none());
        s.toggle_details();
        let d = s.view().details.unwrap();
        assert_eq!(d.email_id, "alice@example.com");
        assert_eq!(d.loyalty_points, 0);
    }

    // ========================================================================
    // Field edits
    // ========================================================================

    #[test]
    fn edit_field_filters_noops() {
        let mut s = CustomerSection::new();
        assert_eq!(s.edit_field(CustomerField::EmailId, "x@y.z").unwrap(), None);

        s.set_customer(Some(alice()));
        assert_eq!(s.edit_field(CustomerField::EmailId, "").unwrap(), None);
        assert_eq!(
            s.edit_field(CustomerField::EmailId, "alice@example.com").unwrap(),
            None
        );
        assert_eq!(
            s.edit_field(CustomerField::MobileNo, " 555-0100 ").unwrap(),
            Some("555-0100".to_string())
        );
    }

    #[test]
    fn loyalty_points_are_read_only() {
        let mut s = CustomerSection::new();
        s.set_customer(Some(alice()));
        assert_eq!(
            s.edit_field(CustomerField::LoyaltyPoints, "10").unwrap_err(),
            PosError::ReadOnlyField("loyalty_points")
        );
    }

    #[test]
    fn field_saved_updates_info() {
        let mut s = CustomerSection::new();
        s.set_customer(Some(alice()));
        s.field_saved(CustomerField::MobileNo, "555-0100");
        assert_eq!(s.info().unwrap().mobile_no.as_deref(), Some("555-0100"));
        assert_eq!(
            s.edit_field(CustomerField::MobileNo, "555-0100").unwrap(),
            None
        );
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    #[test]
    fn empty_transactions_message() {
        let s = CustomerSection::new();
        let v = s.transactions_view(2);
        assert_eq!(v.empty_message.as_deref(), Some(NO_TRANSACTIONS));
        assert!(v.last_transacted.is_none());
    }

    #[test]
    fn transactions_rows_and_indicators() {
        let mut s = CustomerSection::new();
        s.set_customer(Some(alice()));
        s.set_transactions(vec![
            invoice("SINV-3", "Paid"),
            invoice("SINV-2", "Draft"),
            invoice("SINV-1", "Return"),
            invoice("SINV-0", "Overdue"),
        ]);
        let v = s.transactions_view(0);
        assert_eq!(v.last_transacted.as_deref(), Some("2026-10-01 09:30:00"));
        assert_eq!(v.rows[0].grand_total, "USD 42");
        assert_eq!(v.rows[0].status, "PAID");
        assert_eq!(v.rows[0].indicator, Some(Indicator::Green));
        assert_eq!(v.rows[1].indicator, Some(Indicator::Red));
        assert_eq!(v.rows[2].indicator, Some(Indicator::Grey));
        assert_eq!(v.rows[3].indicator, None);
    }

    #[test]
    fn consolidated_is_green() {
        assert_eq!(status_indicator("Consolidated"), Some(Indicator::Green));
    }
}
