//! Bill lifecycle resolution and batched status updates.

use super::settlement::compute_settlement_summary;
use crate::domain::{Bill, BillStatus, Participant, PaymentStatus, PaymentStatusUpdate};
use chrono::Utc;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// Derive the bill status from its participants.
///
/// Deletion is sticky and checked before anything else. A bill without
/// participants keeps its current status since there is nothing to settle.
pub fn determine_bill_status(bill: &Bill) -> BillStatus {
    match bill.status {
        BillStatus::Deleted => BillStatus::Deleted,
        BillStatus::Active | BillStatus::Settled => match compute_settlement_summary(bill) {
            Ok(summary) if summary.is_fully_settled => BillStatus::Settled,
            Ok(_) => BillStatus::Active,
            Err(_) => bill.status,
        },
    }
}

/// Apply a batch of status updates and re-resolve the bill status.
///
/// An empty batch returns the input bill itself (`Cow::Borrowed`). Updates
/// naming a participant not on the bill are ignored. When the same participant
/// appears more than once, the last update wins.
pub fn update_bill_payment_statuses<'a>(
    bill: &'a Bill,
    updates: &[PaymentStatusUpdate],
) -> Cow<'a, Bill> {
    if updates.is_empty() {
        return Cow::Borrowed(bill);
    }

    let requested: HashMap<_, _> = updates
        .iter()
        .map(|u| (&u.participant_id, u.status))
        .collect();

    let participants: Vec<Participant> = bill
        .participants
        .iter()
        .map(|p| match requested.get(&p.id) {
            Some(&status) => Participant {
                status,
                ..p.clone()
            },
            None => p.clone(),
        })
        .collect();

    let mut updated = Bill {
        participants,
        updated_at: Utc::now(),
        ..bill.clone()
    };
    let status = determine_bill_status(&updated);
    if status != bill.status {
        debug!(
            bill_id = %bill.id,
            from = %bill.status,
            to = %status,
            "Bill status changed"
        );
    }
    updated.status = status;

    Cow::Owned(updated)
}

/// Mark every pending participant as paid.
pub fn mark_all_paid(bill: &Bill) -> Cow<'_, Bill> {
    let updates: Vec<PaymentStatusUpdate> = bill
        .participants
        .iter()
        .filter(|p| p.status == PaymentStatus::Pending)
        .map(|p| PaymentStatusUpdate::new(p.id.clone(), PaymentStatus::Paid))
        .collect();
    update_bill_payment_statuses(bill, &updates)
}
