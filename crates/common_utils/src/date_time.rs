//! Date and time utilities.

use time::{OffsetDateTime, PrimitiveDateTime};

/// Current UTC date and time.
pub fn now() -> PrimitiveDateTime {
    let utc = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(utc.date(), utc.time())
}
