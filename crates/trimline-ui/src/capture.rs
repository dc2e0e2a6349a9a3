//! Pointer capture for drag gestures.
//!
//! A drag owns the pointer from press to release: while a [`CaptureGuard`] is
//! alive, no other controller sharing the same [`PointerCapture`] can start a
//! drag. Dropping the guard releases the capture, so an abandoned gesture can
//! never leave the pointer stuck.

use std::cell::Cell;
use std::rc::Rc;

/// Shared capture slot. Clones refer to the same slot.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    owner: Rc<Cell<Option<u64>>>,
    next_token: Rc<Cell<u64>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether some gesture currently holds the capture.
    pub fn is_captured(&self) -> bool {
        self.owner.get().is_some()
    }

    /// Take the capture, or `None` if another gesture holds it.
    pub fn try_acquire(&self) -> Option<CaptureGuard> {
        if self.owner.get().is_some() {
            return None;
        }
        let token = self.next_token.get().wrapping_add(1);
        self.next_token.set(token);
        self.owner.set(Some(token));
        Some(CaptureGuard {
            owner: Rc::clone(&self.owner),
            token,
        })
    }
}

/// Proof of capture ownership. Releases on drop.
#[derive(Debug)]
pub struct CaptureGuard {
    owner: Rc<Cell<Option<u64>>>,
    token: u64,
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if self.owner.get() == Some(self.token) {
            self.owner.set(None);
        }
    }
}
