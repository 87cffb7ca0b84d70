//! Wall clock abstraction for the session timer.
//!
//! ## Features
//!
//! - **`SystemClock`**: local time of the host, used by the CLI
//! - **`ManualClock`**: a clock that only moves when set or advanced, for
//!   replaying events and for tests
//! - **Borrowed clocks**: `&C` is a clock too, so a tracker can share one
//!   `ManualClock` with the code driving it
//!
//! ## Usage
//!
//! ```rust
//! use arealog::libs::clock::{Clock, ManualClock};
//! use chrono::{Duration, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let clock = ManualClock::new(start);
//! clock.advance(Duration::minutes(30));
//! assert_eq!((&clock).now(), start + Duration::minutes(30));
//! ```

use chrono::{Duration, Local, NaiveDateTime};
use parking_lot::Mutex;

/// Source of "now" for the timer. Hosts pass one clock per session so that
/// every transition sees a single non-decreasing wall clock, and tests can
/// substitute a fixed one.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock of the host machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to. Used for replaying events and in tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn set(&self, at: NaiveDateTime) {
        *self.now.lock() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
