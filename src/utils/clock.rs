use chrono::{DateTime, Utc};

use lotledger_core::Clock;

/// Wall clock used when a command omits its timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
