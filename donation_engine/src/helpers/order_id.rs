use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::db_types::OrderId;

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Returns a microsecond timestamp that is strictly greater than any previously returned by this process, even if
/// the wall clock stalls or steps backwards.
fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_micros();
    let mut last = LAST_STAMP.load(Ordering::SeqCst);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Generates a fresh order id of the form `DONATION-{campaign_id}-{donor_id}-{micros}`.
pub fn new_order_id(campaign_id: i64, donor_id: i64) -> OrderId {
    OrderId(format!("DONATION-{campaign_id}-{donor_id}-{}", next_stamp()))
}
