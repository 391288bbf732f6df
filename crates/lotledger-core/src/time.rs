use chrono::{DateTime, NaiveDateTime, Utc};

use lotledger_domain::truncate_to_second;

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as a second-resolution ledger timestamp.
    fn ledger_timestamp(&self) -> NaiveDateTime {
        truncate_to_second(self.now().naive_utc())
    }
}
