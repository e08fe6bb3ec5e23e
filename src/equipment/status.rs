//! Status register consulted by the equipment guards.
//!
//! Commands executed outside the state machine report their outcome here
//! before the corresponding trigger is fired. Guards read the register at
//! fire time, so the same trigger can lead to a success or a failure state.

use crate::core::Guard;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result codes reported by equipment commands. Zero is success.
pub mod error_code {
    pub const EC_OK: u32 = 0;
    pub const EC_SYSTEM_CONFIG_FAIL: u32 = 20_000_001;
    pub const EC_SYSTEM_ABORT_FAIL: u32 = 20_000_002;
    pub const EC_SYSTEM_RESET_FAIL: u32 = 20_000_003;
    pub const EC_SYSTEM_PURGE_FAIL: u32 = 20_000_004;
    pub const EC_SYSTEM_END_FAIL: u32 = 20_000_005;
    pub const EC_SYSTEM_RESUME_FAIL: u32 = 20_000_006;
    pub const EC_SYSTEM_PAUSE_FAIL: u32 = 20_000_007;
    pub const EC_SYSTEM_START_FAIL: u32 = 20_000_008;
    pub const EC_SYSTEM_INIT_FAIL: u32 = 20_000_009;
    pub const EC_SYSTEM_LOAD_FAIL: u32 = 20_000_010;
    pub const EC_EXCEPTION: u32 = 20_000_011;

    /// Symbolic name of a known code.
    pub fn describe(code: u32) -> Option<&'static str> {
        let name = match code {
            EC_OK => "EC_OK",
            EC_SYSTEM_CONFIG_FAIL => "EC_SYSTEM_CONFIG_FAIL",
            EC_SYSTEM_ABORT_FAIL => "EC_SYSTEM_ABORT_FAIL",
            EC_SYSTEM_RESET_FAIL => "EC_SYSTEM_RESET_FAIL",
            EC_SYSTEM_PURGE_FAIL => "EC_SYSTEM_PURGE_FAIL",
            EC_SYSTEM_END_FAIL => "EC_SYSTEM_END_FAIL",
            EC_SYSTEM_RESUME_FAIL => "EC_SYSTEM_RESUME_FAIL",
            EC_SYSTEM_PAUSE_FAIL => "EC_SYSTEM_PAUSE_FAIL",
            EC_SYSTEM_START_FAIL => "EC_SYSTEM_START_FAIL",
            EC_SYSTEM_INIT_FAIL => "EC_SYSTEM_INIT_FAIL",
            EC_SYSTEM_LOAD_FAIL => "EC_SYSTEM_LOAD_FAIL",
            EC_EXCEPTION => "EC_EXCEPTION",
            _ => return None,
        };
        Some(name)
    }
}

#[derive(Clone, Debug, Default)]
struct Status {
    code: u32,
    message: String,
}

/// Shared, cloneable status code plus an optional message.
///
/// Clones observe the same register. Code and message are updated together,
/// so a reader never pairs a new message with an old code.
#[derive(Clone, Debug, Default)]
pub struct StatusRegister {
    inner: Arc<Mutex<Status>>,
}

impl StatusRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of the last command.
    pub fn set(&self, code: u32, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(
            code,
            name = error_code::describe(code).unwrap_or("unknown"),
            %message,
            "status updated"
        );
        *self.lock() = Status { code, message };
    }

    pub fn set_ok(&self) {
        self.set(error_code::EC_OK, "");
    }

    pub fn code(&self) -> u32 {
        self.lock().code
    }

    pub fn message(&self) -> String {
        self.lock().message.clone()
    }

    /// Code and message as one consistent pair.
    pub fn snapshot(&self) -> (u32, String) {
        let status = self.lock();
        (status.code, status.message.clone())
    }

    pub fn is_ok(&self) -> bool {
        self.code() == error_code::EC_OK
    }

    /// Guard that holds while the register reports success.
    pub fn ok_guard(&self) -> Guard {
        let status = self.clone();
        Guard::described("status ok", move || status.is_ok())
    }

    /// Guard that holds while the register reports any failure.
    pub fn failed_guard(&self) -> Guard {
        let status = self.clone();
        Guard::described("status failed", move || !status.is_ok())
    }

    fn lock(&self) -> MutexGuard<'_, Status> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
