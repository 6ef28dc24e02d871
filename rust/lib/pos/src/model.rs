//! Snapshots pushed in by the host, and the numpad key vocabulary.
//!
//! None of these are owned by the cart: the host sends a fresh copy on
//! every refresh and the cart only mirrors them for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PosError;

// ── Cart lines ──────────────────────────────────────────────────────

/// Identity of a cart line: `(item_code, batch_no)`.
///
/// A line without a batch carries an empty `batch_no`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub item_code: String,
    pub batch_no: String,
}

impl LineKey {
    pub fn new(item_code: impl Into<String>, batch_no: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            batch_no: batch_no.into(),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.batch_no.is_empty() {
            write!(f, "{}", self.item_code)
        } else {
            write!(f, "{}@{}", self.item_code, self.batch_no)
        }
    }
}

/// One item entry of the order, as last reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_no: Option<String>,
    pub item_name: String,
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub price_list_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CartLine {
    pub fn new(item_code: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            batch_no: None,
            item_name: item_name.into(),
            qty: 0.0,
            rate: 0.0,
            price_list_rate: 0.0,
            discount_percentage: None,
            description: None,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(&self.item_code, self.batch_no.clone().unwrap_or_default())
    }
}

// ── Totals ──────────────────────────────────────────────────────────

/// One tax row: description and rate percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub description: String,
    pub rate: f64,
}

/// Order totals as computed by the host. Display only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsSnapshot {
    pub net_total: f64,
    pub grand_total: f64,
    #[serde(default)]
    pub total_taxes: f64,
    #[serde(default)]
    pub taxes: Vec<TaxLine>,
    #[serde(default)]
    pub currency: String,
}

// ── Customer ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub customer: String,
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub loyalty_program: Option<String>,
    #[serde(default)]
    pub loyalty_points: Option<i64>,
}

impl CustomerInfo {
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            ..Self::default()
        }
    }
}

/// Contact fields shown in the expanded customer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    EmailId,
    MobileNo,
    LoyaltyProgram,
    LoyaltyPoints,
}

impl CustomerField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerField::EmailId => "email_id",
            CustomerField::MobileNo => "mobile_no",
            CustomerField::LoyaltyProgram => "loyalty_program",
            CustomerField::LoyaltyPoints => "loyalty_points",
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, CustomerField::LoyaltyPoints)
    }
}

/// A past invoice of the current customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub name: String,
    pub grand_total: f64,
    pub status: String,
    pub posting_date: String,
    pub posting_time: String,
    #[serde(default)]
    pub currency: String,
}

/// Everything needed to (re)load the cart from an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    pub lines: Vec<CartLine>,
    pub totals: TotalsSnapshot,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    /// The invoice is submitted and can no longer be checked out or edited.
    #[serde(default)]
    pub submitted: bool,
}

// ── Numpad keys ─────────────────────────────────────────────────────

/// Line fields editable from the numpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumpadField {
    #[serde(rename = "qty")]
    Quantity,
    DiscountPercentage,
    Rate,
}

impl NumpadField {
    pub const ALL: [NumpadField; 3] = [
        NumpadField::Quantity,
        NumpadField::DiscountPercentage,
        NumpadField::Rate,
    ];

    /// Document field name this key edits.
    pub fn fieldname(&self) -> &'static str {
        match self {
            NumpadField::Quantity => "qty",
            NumpadField::DiscountPercentage => "discount_percentage",
            NumpadField::Rate => "rate",
        }
    }
}

impl fmt::Display for NumpadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fieldname())
    }
}

/// A single numpad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "key", content = "value")]
pub enum NumpadKey {
    Digit(u8),
    DecimalPoint,
    Delete,
    Field(NumpadField),
    Done,
    Remove,
}

impl NumpadKey {
    /// Keys that flash briefly when pressed instead of staying lit.
    pub fn flashes(&self) -> bool {
        !matches!(self, NumpadKey::Field(_))
    }

    /// Wire name of the button, as carried by `data-button-value`.
    pub fn button_value(&self) -> String {
        match self {
            NumpadKey::Digit(d) => d.to_string(),
            NumpadKey::DecimalPoint => ".".to_string(),
            NumpadKey::Delete => "delete".to_string(),
            NumpadKey::Field(f) => f.fieldname().to_string(),
            NumpadKey::Done => "done".to_string(),
            NumpadKey::Remove => "remove".to_string(),
        }
    }
}

impl FromStr for NumpadKey {
    type Err = PosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "." => NumpadKey::DecimalPoint,
            "delete" => NumpadKey::Delete,
            "done" => NumpadKey::Done,
            "remove" => NumpadKey::Remove,
            "qty" | "quantity" => NumpadKey::Field(NumpadField::Quantity),
            "discount_percentage" | "discount" => {
                NumpadKey::Field(NumpadField::DiscountPercentage)
            }
            "rate" => NumpadKey::Field(NumpadField::Rate),
            other => match other.as_bytes() {
                [b @ b'0'..=b'9'] => NumpadKey::Digit(b - b'0'),
                _ => return Err(PosError::UnknownKey(s.to_string())),
            },
        };
        Ok(key)
    }
}
