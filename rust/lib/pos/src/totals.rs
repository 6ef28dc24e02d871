//! Totals panel display.

use serde::Serialize;

use crate::model::TotalsSnapshot;

/// Format an amount with a fixed number of decimals, prefixed by the
/// currency code when there is one.
pub fn format_amount(value: f64, currency: &str, precision: usize) -> String {
    if currency.is_empty() {
        format!("{:.*}", precision, value)
    } else {
        format!("{} {:.*}", currency, precision, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxesView {
    /// One chip per tax row: `"{description} @{rate}%"`.
    pub chips: Vec<String>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsView {
    pub net_total: String,
    pub grand_total: String,
    /// `None` when the order carries no taxes; the tax row is hidden.
    pub taxes: Option<TaxesView>,
}

impl TotalsView {
    pub fn build(totals: &TotalsSnapshot, precision: usize) -> Self {
        let currency = totals.currency.as_str();
        let taxes = if totals.taxes.is_empty() {
            None
        } else {
            Some(TaxesView {
                chips: totals
                    .taxes
                    .iter()
                    .map(|t| format!("{} @{}%", t.description, t.rate))
                    .collect(),
                total: format_amount(totals.total_taxes, currency, precision),
            })
        };
        Self {
            net_total: format_amount(totals.net_total, currency, precision),
            grand_total: format_amount(totals.grand_total, currency, precision),
            taxes,
        }
    }
}

impl Default for TotalsView {
    fn default() -> Self {
        Self::build(&TotalsSnapshot::default(), 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaxLine;

    #[test]
    fn format_with_and_without_currency() {
        assert_eq!(format_amount(12.5, "", 2), "12.50");
        assert_eq!(format_amount(12.5, "EUR", 2), "EUR 12.50");
        assert_eq!(format_amount(3.14159, "", 3), "3.142");
        assert_eq!(format_amount(7.0, "JPY", 0), "JPY 7");
    }

    #[test]
    fn zero_totals_by_default() {
        let v = TotalsView::default();
        assert_eq!(v.net_total, "0.00");
        assert_eq!(v.grand_total, "0.00");
        assert!(v.taxes.is_none());
    }

    #[test]
    fn taxes_rendered_as_chips() {
        let totals = TotalsSnapshot {
            net_total: 100.0,
            grand_total: 118.0,
            total_taxes: 18.0,
            taxes: vec![
                TaxLine { description: "CGST".into(), rate: 9.0 },
                TaxLine { description: "SGST".into(), rate: 9.0 },
            ],
            currency: "INR".into(),
        };
        let v = TotalsView::build(&totals, 2);
        assert_eq!(v.net_total, "INR 100.00");
        assert_eq!(v.grand_total, "INR 118.00");
        let taxes = v.taxes.unwrap();
        assert_eq!(taxes.chips, vec!["CGST @9%", "SGST @9%"]);
        assert_eq!(taxes.total, "INR 18.00");
    }

    #[test]
    fn fractional_tax_rate() {
        let totals = TotalsSnapshot {
            taxes: vec![TaxLine { description: "VAT".into(), rate: 7.5 }],
            ..TotalsSnapshot::default()
        };
        assert_eq!(TotalsView::build(&totals, 2).taxes.unwrap().chips, vec!["VAT @7.5%"]);
    }
}
