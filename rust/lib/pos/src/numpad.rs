//! Numpad edit-mode state machine.
//!
//! ```text
//!            Field(K)                     Field(K) again
//!   Idle ──────────────▶ Editing(K) ─────────────────────▶ Idle
//!    ▲                    │  ▲   │
//!    │  Done / Remove     │  │   │ Field(K'), K' != K  → Editing(K'), buffer reset
//!    └────────────────────┘  │   │ Digit / "." / Delete → buffer edited, FieldEdit
//!                            └───┘
//! ```
//!
//! The machine only decides intents. Applying a value to the selected cart
//! line and recomputing totals is the host's job.

use tracing::debug;

use crate::error::PosError;
use crate::model::{NumpadField, NumpadKey};

/// Coarse state of the numpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumpadState {
    Idle,
    Editing(NumpadField),
}

/// The in-progress entry: selected field and the characters typed so far.
///
/// A field is selected iff the session is editing; the buffer is only
/// non-empty while a field is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    field: Option<NumpadField>,
    buffer: String,
}

impl EditSession {
    pub fn field(&self) -> Option<NumpadField> {
        self.field
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The buffer as a number. Empty or unparseable text counts as zero.
    pub fn value(&self) -> f64 {
        coerce(&self.buffer)
    }

    fn reset(&mut self) {
        self.field = None;
        self.buffer.clear();
    }

    fn select(&mut self, field: NumpadField) {
        self.field = Some(field);
        self.buffer.clear();
    }
}

/// What the host should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumpadIntent {
    /// Apply `value` to `field` of the selected cart line.
    FieldEdit { field: NumpadField, value: f64 },
    /// Delete the selected cart line.
    RemoveLine,
    /// Close the numpad subview.
    CloseMode,
}

pub struct Numpad {
    session: EditSession,
    discount_limit: f64,
}

impl Numpad {
    pub fn new(discount_limit: f64) -> Self {
        Self {
            session: EditSession::default(),
            discount_limit,
        }
    }

    pub fn state(&self) -> NumpadState {
        match self.session.field {
            Some(field) => NumpadState::Editing(field),
            None => NumpadState::Idle,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Feed one key press through the machine.
    ///
    /// On `Err` the session is unchanged, except that a discount over the
    /// limit empties the buffer so entry starts over.
    pub fn press(&mut self, key: NumpadKey) -> Result<Option<NumpadIntent>, PosError> {
        match key {
            NumpadKey::Field(field) => {
                if self.session.field == Some(field) {
                    debug!(%field, "numpad: field toggled off");
                    self.session.reset();
                } else {
                    debug!(%field, previous = ?self.session.field, "numpad: field selected");
                    self.session.select(field);
                }
                Ok(None)
            }
            NumpadKey::Done => {
                self.session.reset();
                Ok(Some(NumpadIntent::CloseMode))
            }
            NumpadKey::Remove => {
                self.session.reset();
                Ok(Some(NumpadIntent::RemoveLine))
            }
            NumpadKey::Digit(d) => {
                let c = char::from_digit(u32::from(d), 10)
                    .ok_or_else(|| PosError::UnknownKey(d.to_string()))?;
                self.edit(Edit::Append(c))
            }
            NumpadKey::DecimalPoint => self.edit(Edit::Append('.')),
            NumpadKey::Delete => self.edit(Edit::Delete),
        }
    }

    fn edit(&mut self, edit: Edit) -> Result<Option<NumpadIntent>, PosError> {
        let field = self.session.field.ok_or(PosError::FieldNotSelected)?;

        match edit {
            Edit::Append('.') if self.session.buffer.contains('.') => {
                return Err(PosError::DuplicateDecimalPoint { field });
            }
            Edit::Append(c) => self.session.buffer.push(c),
            Edit::Delete => {
                if self.session.buffer.pop().is_none() {
                    return Ok(None);
                }
            }
        }

        let value = self.session.value();
        if field == NumpadField::DiscountPercentage && value > self.discount_limit {
            // Entry restarts from an empty buffer; the field stays selected.
            self.session.buffer.clear();
            return Err(PosError::DiscountExceeded {
                value,
                max: self.discount_limit,
            });
        }

        Ok(Some(NumpadIntent::FieldEdit { field, value }))
    }
}

/// A change to the edit buffer.
#[derive(Debug, Clone, Copy)]
enum Edit {
    Append(char),
    Delete,
}

fn coerce(buffer: &str) -> f64 {
    buffer.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QTY: NumpadKey = NumpadKey::Field(NumpadField::Quantity);
    const DISCOUNT: NumpadKey = NumpadKey::Field(NumpadField::DiscountPercentage);
    const RATE: NumpadKey = NumpadKey::Field(NumpadField::Rate);

    fn numpad() -> Numpad {
        Numpad::new(100.0)
    }

    fn type_digits(np: &mut Numpad, digits: &str) {
        for c in digits.chars() {
            let key = if c == '.' {
                NumpadKey::DecimalPoint
            } else {
                NumpadKey::Digit(c.to_digit(10).unwrap() as u8)
            };
            np.press(key).unwrap();
        }
    }

    // ========================================================================
    // Field selection
    // ========================================================================

    #[test]
    fn starts_idle() {
        let np = numpad();
        assert_eq!(np.state(), NumpadState::Idle);
        assert_eq!(np.session().buffer(), "");
    }

    #[test]
    fn select_field_from_idle() {
        let mut np = numpad();
        assert_eq!(np.press(QTY).unwrap(), None);
        assert_eq!(np.state(), NumpadState::Editing(NumpadField::Quantity));
    }

    #[test]
    fn same_field_twice_toggles_off() {
        let mut np = numpad();
        assert_eq!(np.press(RATE).unwrap(), None);
        type_digits(&mut np, "12");
        assert_eq!(np.press(RATE).unwrap(), None);
        assert_eq!(np.state(), NumpadState::Idle);
        assert_eq!(np.session().buffer(), "");
    }

    #[test]
    fn switching_field_discards_partial_value() {
        let mut np = numpad();
        np.press(QTY).unwrap();
        type_digits(&mut np, "42");
        assert_eq!(np.press(RATE).unwrap(), None);
        assert_eq!(np.state(), NumpadState::Editing(NumpadField::Rate));
        assert_eq!(np.session().buffer(), "");
    }

    #[test]
    fn at_most_one_field_selected() {
        let mut np = numpad();
        for key in [QTY, RATE, DISCOUNT, DISCOUNT, QTY, RATE, RATE, QTY] {
            np.press(key).unwrap();
            let selected = NumpadField::ALL
                .iter()
                .filter(|f| np.session().field() == Some(**f))
                .count();
            assert!(selected <= 1);
            match np.state() {
                NumpadState::Idle => assert_eq!(selected, 0),
                NumpadState::Editing(_) => assert_eq!(selected, 1),
            }
        }
    }

    // ========================================================================
    // Buffer editing
    // ========================================================================

    #[test]
    fn digits_emit_field_edit() {
        let mut np = numpad();
        np.press(QTY).unwrap();
        assert_eq!(
            np.press(NumpadKey::Digit(3)).unwrap(),
            Some(NumpadIntent::FieldEdit { field: NumpadField::Quantity, value: 3.0 })
        );
        assert_eq!(
            np.press(NumpadKey::Digit(5)).unwrap(),
            Some(NumpadIntent::FieldEdit { field: NumpadField::Quantity, value: 35.0 })
        );
    }

    #[test]
    fn decimal_point_builds_fraction() {
        let mut np = numpad();
        np.press(RATE).unwrap();
        assert_eq!(
            np.press(NumpadKey::DecimalPoint).unwrap(),
            Some(NumpadIntent::FieldEdit { field: NumpadField::Rate, value: 0.0 })
        );
        assert_eq!(
            np.press(NumpadKey::Digit(5)).unwrap(),
            Some(NumpadIntent::FieldEdit { field: NumpadField::Rate, value: 0.5 })
        );
        assert_eq!(np.session().buffer(), ".5");
    }

    #[test]
    fn second_decimal_point_is_rejected() {
        let mut np = numpad();
        np.press(RATE).unwrap();
        type_digits(&mut np, "1.2");
        let err = np.press(NumpadKey::DecimalPoint).unwrap_err();
        assert_eq!(err, PosError::DuplicateDecimalPoint { field: NumpadField::Rate });
        assert_eq!(np.session().buffer(), "1.2");
    }

    #[test]
    fn delete_removes_last_char() {
        let mut np = numpad();
        np.press(QTY).unwrap();
        type_digits(&mut np, "12");
        assert_eq!(
            np.press(NumpadKey::Delete).unwrap(),
            Some(NumpadIntent::FieldEdit { field: NumpadField::Quantity, value: 1.0 })
        );
        assert_eq!(
            np.press(NumpadKey::Delete).unwrap(),
            Some(NumpadIntent::FieldEdit { field: NumpadField::Quantity, value: 0.0 })
        );
        assert_eq!(np.session().buffer(), "");
    }

    #[test]
    fn delete_on_empty_buffer_is_noop() {
        let mut np = numpad();
        np.press(QTY).unwrap();
        assert_eq!(np.press(NumpadKey::Delete).unwrap(), None);
        assert_eq!(np.state(), NumpadState::Editing(NumpadField::Quantity));
    }

    // ========================================================================
    // Rejected input
    // ========================================================================

    #[test]
    fn digit_while_idle_is_rejected() {
        let mut np = numpad();
        assert_eq!(np.press(NumpadKey::Digit(5)).unwrap_err(), PosError::FieldNotSelected);
        assert_eq!(np.state(), NumpadState::Idle);
        assert_eq!(np.session().buffer(), "");
    }

    #[test]
    fn delete_while_idle_is_rejected() {
        let mut np = numpad();
        assert_eq!(np.press(NumpadKey::Delete).unwrap_err(), PosError::FieldNotSelected);
    }

    #[test]
    fn discount_over_limit_restarts_entry() {
        let mut np = numpad();
        np.press(DISCOUNT).unwrap();
        type_digits(&mut np, "99");

        let err = np.press(NumpadKey::Digit(9)).unwrap_err();
        assert_eq!(err, PosError::DiscountExceeded { value: 999.0, max: 100.0 });
        assert_eq!(np.session().buffer(), "");
        assert_eq!(np.state(), NumpadState::Editing(NumpadField::DiscountPercentage));

        assert_eq!(
            np.press(NumpadKey::Digit(5)).unwrap(),
            Some(NumpadIntent::FieldEdit {
                field: NumpadField::DiscountPercentage,
                value: 5.0
            })
        );
        assert_eq!(np.session().buffer(), "5");
    }

    #[test]
    fn discount_at_limit_is_accepted() {
        let mut np = numpad();
        np.press(DISCOUNT).unwrap();
        type_digits(&mut np, "10");
        assert_eq!(
            np.press(NumpadKey::Digit(0)).unwrap(),
            Some(NumpadIntent::FieldEdit {
                field: NumpadField::DiscountPercentage,
                value: 100.0
            })
        );
    }

    #[test]
    fn quantity_has_no_upper_bound() {
        let mut np = numpad();
        np.press(QTY).unwrap();
        type_digits(&mut np, "99");
        assert_eq!(
            np.press(NumpadKey::Digit(9)).unwrap(),
            Some(NumpadIntent::FieldEdit { field: NumpadField::Quantity, value: 999.0 })
        );
    }

    #[test]
    fn custom_discount_limit() {
        let mut np = Numpad::new(50.0);
        np.press(DISCOUNT).unwrap();
        type_digits(&mut np, "5");
        assert!(matches!(
            np.press(NumpadKey::Digit(1)),
            Err(PosError::DiscountExceeded { max, .. }) if max == 50.0
        ));
        assert_eq!(np.session().buffer(), "");
        type_digits(&mut np, "45");
        assert_eq!(np.session().value(), 45.0);
    }

    // ========================================================================
    // Done / Remove
    // ========================================================================

    #[test]
    fn done_closes_and_resets() {
        let mut np = numpad();
        np.press(QTY).unwrap();
        type_digits(&mut np, "3");
        assert_eq!(np.press(NumpadKey::Done).unwrap(), Some(NumpadIntent::CloseMode));
        assert_eq!(np.state(), NumpadState::Idle);
        assert_eq!(np.session().buffer(), "");
    }

    #[test]
    fn done_from_idle_still_closes() {
        let mut np = numpad();
        assert_eq!(np.press(NumpadKey::Done).unwrap(), Some(NumpadIntent::CloseMode));
    }

    #[test]
    fn remove_resets_and_requests_removal() {
        let mut np = numpad();
        np.press(DISCOUNT).unwrap();
        type_digits(&mut np, "1");
        assert_eq!(np.press(NumpadKey::Remove).unwrap(), Some(NumpadIntent::RemoveLine));
        assert_eq!(np.state(), NumpadState::Idle);
    }

    // ========================================================================
    // Coercion
    // ========================================================================

    #[test]
    fn coerce_rules() {
        assert_eq!(coerce(""), 0.0);
        assert_eq!(coerce("."), 0.0);
        assert_eq!(coerce("3."), 3.0);
        assert_eq!(coerce("007"), 7.0);
        assert_eq!(coerce("12.50"), 12.5);
    }
}
