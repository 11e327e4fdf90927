//! Screen wake lock.
//!
//! At most one lock is held at a time. `acquire` and `release` are
//! idempotent and never fail toward the caller: errors are logged, and a
//! denied or unsupported capability is disabled for the rest of the session.

use std::sync::{Mutex, PoisonError};

use crate::error::HardwareError;

pub trait WakeLockBackend: Send + Sync {
    fn detect(&self) -> bool;

    fn request(&self) -> Result<(), HardwareError>;

    fn release(&self) -> Result<(), HardwareError>;
}

#[derive(Debug, Default)]
struct WakeLockState {
    initialized: bool,
    supported: bool,
    held: bool,
    /// Set by a successful acquire, cleared by any explicit release. Used to
    /// restore the lock dropped on hide.
    was_acquired: bool,
}

pub struct WakeLockService {
    backend: Box<dyn WakeLockBackend>,
    state: Mutex<WakeLockState>,
}

impl WakeLockService {
    pub fn new(backend: Box<dyn WakeLockBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(WakeLockState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, WakeLockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn init(&self) {
        let mut state = self.state();
        if state.initialized {
            return;
        }
        state.initialized = true;
        state.supported = self.backend.detect();
        if !state.supported {
            tracing::warn!("wake lock not supported");
        }
    }

    pub fn is_supported(&self) -> bool {
        self.state().supported
    }

    pub fn is_locked(&self) -> bool {
        self.state().held
    }

    /// Request the lock. No-op if unsupported or already held.
    pub fn acquire(&self) {
        let mut state = self.state();
        if !state.supported || state.held {
            return;
        }
        match self.backend.request() {
            Ok(()) => {
                state.held = true;
                state.was_acquired = true;
                tracing::debug!("wake lock acquired");
            }
            Err(e @ (HardwareError::Unsupported | HardwareError::Denied(_))) => {
                tracing::warn!(error = %e, "wake lock refused, disabling for this session");
                state.supported = false;
            }
            Err(e) => tracing::warn!(error = %e, "failed to acquire wake lock"),
        }
    }

    /// Release the lock. Safe to call when nothing is held.
    ///
    /// Also forgets any lock dropped on hide, so a later show does not
    /// bring it back.
    pub fn release(&self) {
        let mut state = self.state();
        state.was_acquired = false;
        if !state.supported || !state.held {
            return;
        }
        match self.backend.release() {
            Ok(()) => {
                state.held = false;
                tracing::debug!("wake lock released");
            }
            Err(e) => tracing::warn!(error = %e, "failed to release wake lock"),
        }
    }

    /// Host visibility changed. Hiding drops the lock; becoming visible
    /// again re-acquires it if it was held before.
    pub fn on_visibility_change(&self, visible: bool) {
        let reacquire = {
            let mut state = self.state();
            if !visible {
                if state.held {
                    if let Err(e) = self.backend.release() {
                        tracing::warn!(error = %e, "failed to drop wake lock on hide");
                    }
                    state.held = false;
                }
                false
            } else {
                state.supported && state.was_acquired && !state.held
            }
        };
        if reacquire {
            self.acquire();
        }
    }
}
