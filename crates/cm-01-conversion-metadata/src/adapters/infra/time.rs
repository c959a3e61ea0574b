use chrono::{DateTime, Utc};

use crate::ports::outbound::TimeSource;

/// Default time source using the system clock.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
