//! Transaction reference synthesis: `BILL-<billId>-<unixMillis>`.

use crate::domain::TimeMs;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

const UNKNOWN_BILL: &str = "unknown";

/// Last millisecond stamp handed out in this process.
static LAST_STAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Next reference timestamp: wall-clock millis, bumped past the previous
/// stamp so two references issued in the same millisecond never collide.
fn next_stamp(now: TimeMs) -> i64 {
    let now = now.as_ms();
    let mut last = LAST_STAMP_MS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP_MS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Build a fresh transaction reference for a bill.
pub fn generate_transaction_ref(bill_id: Option<&str>) -> String {
    let bill_id = bill_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN_BILL);
    let reference = format!("BILL-{}-{}", bill_id, next_stamp(TimeMs::now()));
    debug!(transaction_ref = %reference, "Generated transaction reference");
    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reference_format() {
        let reference = generate_transaction_ref(Some("bill-42"));
        let stamp = reference
            .strip_prefix("BILL-bill-42-")
            .expect("prefix")
            .parse::<i64>()
            .expect("millis suffix");
        assert!(stamp >= TimeMs::now().as_ms() - 60_000);
    }

    #[test]
    fn test_missing_bill_id_uses_unknown() {
        assert!(generate_transaction_ref(None).starts_with("BILL-unknown-"));
        assert!(generate_transaction_ref(Some("  ")).starts_with("BILL-unknown-"));
    }

    #[test]
    fn test_tight_loop_never_collides() {
        let refs: HashSet<String> = (0..1000)
            .map(|_| generate_transaction_ref(Some("same")))
            .collect();
        assert_eq!(refs.len(), 1000);
    }

    #[test]
    fn test_stamp_is_monotonic_even_if_clock_goes_back() {
        let first = next_stamp(TimeMs::now());
        let second = next_stamp(TimeMs::new(1));
        assert!(second > first);
    }
}
