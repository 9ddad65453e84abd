//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock vs simulated clock)
//! - The wasm-bindgen host surface (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" in milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub type SharedClock = Rc<dyn Clock>;

/// Manually advanced clock for tests and offline runs
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<u64>,
}

impl SimClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// `Date.now()`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// The wall clock for the current target
pub fn wall_clock() -> SharedClock {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserClock)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_clock_advances() {
        let clock = SimClock::new(1_000);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 1_250);
        clock.set(5);
        assert_eq!(clock.now_ms(), 5);
    }

    #[test]
    fn test_wall_clock_is_past_2020() {
        assert!(wall_clock().now_ms() > 1_577_836_800_000);
    }
}
