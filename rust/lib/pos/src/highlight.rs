//! Numpad key highlighting.
//!
//! The selected field key stays lit for as long as the field is being
//! edited. Every other key flashes: it lights up on press and goes dark
//! when its scheduled expiry comes back. A newer flash cancels the pending
//! one, so at most one key is flashing and a stale expiry never dims the
//! wrong key.

use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::PosError;
use crate::model::{NumpadField, NumpadKey};

/// Identifies one scheduled flash expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FlashToken(u64);

/// Something that can call back after a delay.
///
/// Expiry is reported out of band: the scheduler hands the token back to
/// whoever owns the cart, who then calls `ItemCart::flash_elapsed`.
pub trait FlashScheduler {
    fn schedule(&mut self, token: FlashToken, after: Duration);
    fn cancel(&mut self, token: FlashToken);
}

// ── Highlight state ─────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Highlight {
    selected: Option<NumpadField>,
    flash: Option<(NumpadKey, FlashToken)>,
    next_token: u64,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the lit field key in step with the edit session.
    pub fn sync_selected(&mut self, field: Option<NumpadField>) {
        self.selected = field;
    }

    /// Light `key` and return its expiry token, plus the token of the flash
    /// it replaced (which must be cancelled).
    pub fn flash(&mut self, key: NumpadKey) -> (FlashToken, Option<FlashToken>) {
        self.next_token += 1;
        let token = FlashToken(self.next_token);
        let replaced = self.flash.replace((key, token)).map(|(_, t)| t);
        (token, replaced)
    }

    /// Dim the flashing key if `token` is still current. Returns whether
    /// anything changed.
    pub fn expire(&mut self, token: FlashToken) -> bool {
        match self.flash {
            Some((_, current)) if current == token => {
                self.flash = None;
                true
            }
            _ => {
                debug!(?token, "highlight: stale flash expiry ignored");
                false
            }
        }
    }

    pub fn selected(&self) -> Option<NumpadField> {
        self.selected
    }

    pub fn flashing(&self) -> Option<NumpadKey> {
        self.flash.map(|(key, _)| key)
    }

    pub fn is_lit(&self, key: NumpadKey) -> bool {
        match key {
            NumpadKey::Field(f) => self.selected == Some(f),
            other => self.flashing() == Some(other),
        }
    }

    /// All keys currently lit, field key first.
    pub fn lit_keys(&self) -> Vec<NumpadKey> {
        self.selected
            .map(NumpadKey::Field)
            .into_iter()
            .chain(self.flashing())
            .collect()
    }
}

// ── Schedulers ──────────────────────────────────────────────────────

/// Tokio-backed scheduler.
///
/// Each flash is a sleeping task that sends its token on a channel when it
/// wakes. Cancelling aborts the task, so a cancelled token is never sent.
pub struct TokioFlashScheduler {
    handle: Handle,
    tx: mpsc::UnboundedSender<FlashToken>,
    pending: Option<(FlashToken, JoinHandle<()>)>,
}

impl TokioFlashScheduler {
    /// Create a scheduler on the current runtime, returning the receiver
    /// that yields expired tokens.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<FlashToken>), PosError> {
        let handle = Handle::try_current().map_err(|e| PosError::NoRuntime(e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            Self {
                handle,
                tx,
                pending: None,
            },
            rx,
        ))
    }
}

impl FlashScheduler for TokioFlashScheduler {
    fn schedule(&mut self, token: FlashToken, after: Duration) {
        let tx = self.tx.clone();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(token);
        });
        if let Some((_, previous)) = self.pending.replace((token, task)) {
            previous.abort();
        }
    }

    fn cancel(&mut self, token: FlashToken) {
        if matches!(self.pending, Some((t, _)) if t == token) {
            if let Some((_, task)) = self.pending.take() {
                task.abort();
            }
        }
    }
}

impl Drop for TokioFlashScheduler {
    fn drop(&mut self) {
        if let Some((_, task)) = self.pending.take() {
            task.abort();
        }
    }
}

/// Scheduler for hosts that run their own clock.
///
/// Records requests; the host polls `pending()` and reports expiry itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    scheduled: Vec<(FlashToken, Duration)>,
    cancelled: Vec<FlashToken>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens scheduled and not cancelled, oldest first.
    pub fn pending(&self) -> Vec<FlashToken> {
        self.scheduled
            .iter()
            .map(|(t, _)| *t)
            .filter(|t| !self.cancelled.contains(t))
            .collect()
    }

    pub fn cancelled(&self) -> &[FlashToken] {
        &self.cancelled
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.scheduled.last().map(|(_, d)| *d)
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.scheduled.clear();
        self.cancelled.clear();
    }
}

impl FlashScheduler for ManualScheduler {
    fn schedule(&mut self, token: FlashToken, after: Duration) {
        self.scheduled.push((token, after));
    }

    fn cancel(&mut self, token: FlashToken) {
        self.cancelled.push(token);
    }
}
