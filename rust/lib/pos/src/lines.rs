//! Mirrored cart lines.
//!
//! Lines are kept in host order and looked up by `LineKey`. Every refresh
//! is diffed against the previous snapshot so renderers can patch rows
//! instead of rebuilding the list.

use serde::Serialize;
use tracing::debug;

use crate::error::PosError;
use crate::model::{CartLine, LineKey};
use crate::totals::format_amount;

/// Whether the cart shows the empty placeholder or the list of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartMode {
    Empty,
    List,
}

impl CartMode {
    pub fn for_count(count: usize) -> Self {
        if count == 0 { CartMode::Empty } else { CartMode::List }
    }
}

/// Keys touched by a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineChanges {
    pub added: Vec<LineKey>,
    pub updated: Vec<LineKey>,
    pub removed: Vec<LineKey>,
}

impl LineChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct CartLines {
    lines: Vec<CartLine>,
}

impl CartLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn mode(&self) -> CartMode {
        CartMode::for_count(self.lines.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.position(key).map(|i| &self.lines[i])
    }

    /// Replace the mirror with a new host snapshot.
    ///
    /// A key appearing twice in the snapshot keeps its last occurrence.
    pub fn replace(&mut self, snapshot: Vec<CartLine>) -> LineChanges {
        let mut next: Vec<CartLine> = Vec::with_capacity(snapshot.len());
        for line in snapshot {
            let key = line.key();
            match next.iter().position(|l| l.key() == key) {
                Some(i) => {
                    debug!(%key, "cart: duplicate line in snapshot, keeping last");
                    next[i] = line;
                }
                None => next.push(line),
            }
        }

        let mut changes = LineChanges::default();
        for line in &next {
            let key = line.key();
            match self.get(&key) {
                None => changes.added.push(key),
                Some(old) if old != line => changes.updated.push(key),
                Some(_) => {}
            }
        }
        for old in &self.lines {
            let key = old.key();
            if !next.iter().any(|l| l.key() == key) {
                changes.removed.push(key);
            }
        }

        self.lines = next;
        changes
    }

    /// Insert a new line at the end, or update the existing line in place.
    pub fn upsert(&mut self, line: CartLine) -> LineChanges {
        let key = line.key();
        let mut changes = LineChanges::default();
        match self.position(&key) {
            Some(i) => {
                if self.lines[i] != line {
                    self.lines[i] = line;
                    changes.updated.push(key);
                }
            }
            None => {
                self.lines.push(line);
                changes.added.push(key);
            }
        }
        changes
    }

    pub fn remove(&mut self, key: &LineKey) -> Result<CartLine, PosError> {
        let i = self
            .position(key)
            .ok_or_else(|| PosError::LineNotFound(key.clone()))?;
        Ok(self.lines.remove(i))
    }

    /// Re-key a line after the host assigned it a batch.
    ///
    /// Fails with `DuplicateLine` when another line already holds the new
    /// key; keys stay unique across the cart.
    pub fn assign_batch(&mut self, key: &LineKey, batch_no: &str) -> Result<LineKey, PosError> {
        let i = self
            .position(key)
            .ok_or_else(|| PosError::LineNotFound(key.clone()))?;
        let target = LineKey::new(&key.item_code, batch_no);
        if target != *key && self.position(&target).is_some() {
            return Err(PosError::DuplicateLine(target));
        }
        let line = &mut self.lines[i];
        line.batch_no = if batch_no.is_empty() {
            None
        } else {
            Some(batch_no.to_string())
        };
        Ok(line.key())
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|l| l.key() == *key)
    }
}

// ── Display ─────────────────────────────────────────────────────────

/// Price column of a cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateDisplay {
    pub current: String,
    /// Price-list rate, shown struck through when the rate was changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struck: Option<String>,
}

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub key: LineKey,
    pub qty: f64,
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rate: RateDisplay,
}

impl LineView {
    pub fn build(line: &CartLine, currency: &str, precision: usize, description_limit: usize) -> Self {
        Self {
            key: line.key(),
            qty: line.qty,
            item_name: line.item_name.clone(),
            description: line
                .description
                .as_deref()
                .map(|d| ellipsis(&strip_markup(d), description_limit))
                .filter(|d| !d.is_empty()),
            rate: rate_display(line, currency, precision),
        }
    }
}

pub fn rate_display(line: &CartLine, currency: &str, precision: usize) -> RateDisplay {
    if line.rate != 0.0 && line.price_list_rate != 0.0 && line.rate != line.price_list_rate {
        RateDisplay {
            current: format_amount(line.rate, currency, precision),
            struck: Some(format_amount(line.price_list_rate, currency, precision)),
        }
    } else {
        let shown = if line.price_list_rate != 0.0 {
            line.price_list_rate
        } else {
            line.rate
        };
        RateDisplay {
            current: format_amount(shown, currency, precision),
            struck: None,
        }
    }
}

/// Truncate to `limit` characters, appending `...` when cut.
pub fn ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("...");
    out
}

/// Drop anything between `<` and `>` and collapse whitespace.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
