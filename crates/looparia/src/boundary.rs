//! Error boundary
//!
//! Every externally triggered entry point (lifecycle event, frame callback,
//! hook registration) runs through here. Failures are logged and counted,
//! never propagated into the host page.

use crate::AriaError;

/// Run `f`, turning an error into a warning. Returns `None` on failure.
pub fn guard<T>(origin: &'static str, f: impl FnOnce() -> Result<T, AriaError>) -> Option<T> {
    match f() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(origin, error = %err, "suppressed failure");
            None
        }
    }
}

/// `guard` with a running count of suppressed failures
#[derive(Debug, Default)]
pub struct Boundary {
    swallowed: u64,
}

impl Boundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<T>(&mut self, origin: &'static str, f: impl FnOnce() -> Result<T, AriaError>) -> Option<T> {
        let result = guard(origin, f);
        if result.is_none() {
            self.swallowed += 1;
        }
        result
    }

    /// Failures suppressed so far
    pub fn swallowed(&self) -> u64 {
        self.swallowed
    }
}
