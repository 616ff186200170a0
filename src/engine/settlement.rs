//! Aggregate paid/pending figures for a bill.

use super::SettlementError;
use crate::domain::{paise_to_rupees, Bill, Participant, PaymentStatus};
use rust_decimal::Decimal;
use serde::Serialize;

/// Derived settlement figures. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub total_amount_paise: i64,
    pub paid_amount_paise: i64,
    pub pending_amount_paise: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pending_percentage: Decimal,
    pub paid_count: usize,
    pub pending_count: usize,
    pub total_count: usize,
    pub is_fully_settled: bool,
    pub is_partially_settled: bool,
}

/// What is still owed on a bill, and by whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainderCalculation {
    pub remaining_amount_paise: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amount_rupees: Decimal,
    pub pending_participants: Vec<Participant>,
    pub pending_count: usize,
}

/// Compute the settlement summary for a bill.
///
/// The pending amount is `total - paid`, not a second sum over pending
/// participants, so a drift between the bill total and the shares shows up
/// as an outstanding balance instead of disappearing.
///
/// # Errors
/// Returns [`SettlementError::NoParticipants`] for a bill without participants.
pub fn compute_settlement_summary(bill: &Bill) -> Result<SettlementSummary, SettlementError> {
    if bill.participants.is_empty() {
        return Err(SettlementError::NoParticipants);
    }

    let total_count = bill.participants.len();
    let (paid_count, paid_amount_paise) = bill
        .participants
        .iter()
        .filter(|p| p.is_paid())
        .fold((0usize, 0i64), |(count, sum), p| {
            (count + 1, sum.saturating_add(p.amount_paise))
        });
    let pending_count = total_count - paid_count;
    let pending_amount_paise = bill.total_amount_paise.saturating_sub(paid_amount_paise);

    let paid_percentage = percentage_of(paid_amount_paise, bill.total_amount_paise);
    let pending_percentage = (Decimal::ONE_HUNDRED - paid_percentage).normalize();

    let is_fully_settled = paid_count == total_count && pending_amount_paise == 0;
    let is_partially_settled = paid_count > 0 && !is_fully_settled;

    Ok(SettlementSummary {
        total_amount_paise: bill.total_amount_paise,
        paid_amount_paise,
        pending_amount_paise,
        paid_percentage,
        pending_percentage,
        paid_count,
        pending_count,
        total_count,
        is_fully_settled,
        is_partially_settled,
    })
}

/// Fractional digits kept on a percentage. Leaves headroom in the 96-bit
/// mantissa so `100 - paid` is always exact.
const PERCENT_SCALE: u32 = 20;

/// `part / total * 100`; zero when the total is zero.
fn percentage_of(part: i64, total: i64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED)
        .checked_div(Decimal::from(total))
        .unwrap_or(Decimal::ZERO)
        .round_dp(PERCENT_SCALE)
        .normalize()
}

/// Outstanding balance and the participants who still owe.
///
/// # Errors
/// Returns [`SettlementError::NoParticipants`] for a bill without participants.
pub fn calculate_remainder(bill: &Bill) -> Result<RemainderCalculation, SettlementError> {
    let summary = compute_settlement_summary(bill)?;
    let pending_participants: Vec<Participant> = participants_by_status(bill, PaymentStatus::Pending)
        .into_iter()
        .cloned()
        .collect();

    Ok(RemainderCalculation {
        remaining_amount_paise: summary.pending_amount_paise,
        remaining_amount_rupees: paise_to_rupees(summary.pending_amount_paise),
        pending_count: pending_participants.len(),
        pending_participants,
    })
}

/// Participants in the given status, in bill order.
pub fn participants_by_status(bill: &Bill, status: PaymentStatus) -> Vec<&Participant> {
    bill.participants
        .iter()
        .filter(|p| p.status == status)
        .collect()
}

/// First participant whose name matches case-insensitively.
pub fn find_participant_by_name<'a>(bill: &'a Bill, name: &str) -> Option<&'a Participant> {
    bill.participants.iter().find(|p| p.name_matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillId, BillStatus, ParticipantId};
    use chrono::Utc;
    use std::str::FromStr;

    fn participant(id: &str, name: &str, amount_paise: i64, status: PaymentStatus) -> Participant {
        Participant {
            id: ParticipantId::new(id),
            name: name.to_string(),
            phone: None,
            amount_paise,
            status,
        }
    }

    fn bill(total: i64, participants: Vec<Participant>) -> Bill {
        let now = Utc::now();
        Bill {
            id: BillId::new("bill-1"),
            title: "Dinner".to_string(),
            total_amount_paise: total,
            created_at: now,
            updated_at: now,
            status: BillStatus::Active,
            participants,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_all_pending() {
        let b = bill(
            10000,
            vec![
                participant("p1", "Asha", 5000, PaymentStatus::Pending),
                participant("p2", "Ravi", 5000, PaymentStatus::Pending),
            ],
        );
        let summary = compute_settlement_summary(&b).unwrap();
        assert_eq!(summary.paid_amount_paise, 0);
        assert_eq!(summary.pending_amount_paise, 10000);
        assert_eq!(summary.paid_percentage, Decimal::ZERO);
        assert_eq!(summary.pending_percentage, Decimal::ONE_HUNDRED);
        assert_eq!(summary.pending_count, 2);
        assert!(!summary.is_fully_settled);
        assert!(!summary.is_partially_settled);
    }

    #[test]
    fn test_partial_payment() {
        let b = bill(
            9000,
            vec![
                participant("p1", "Asha", 3000, PaymentStatus::Paid),
                participant("p2", "Ravi", 3000, PaymentStatus::Pending),
                participant("p3", "Meera", 3000, PaymentStatus::Pending),
            ],
        );
        let summary = compute_settlement_summary(&b).unwrap();
        assert_eq!(summary.paid_amount_paise, 3000);
        assert_eq!(summary.pending_amount_paise, 6000);
        assert_eq!(summary.paid_count, 1);
        assert!(summary.is_partially_settled);
        assert!(!summary.is_fully_settled);
        assert_eq!(
            summary.paid_percentage + summary.pending_percentage,
            Decimal::ONE_HUNDRED
        );
        assert_eq!(summary.paid_percentage.round_dp(2), dec("33.33"));
    }

    #[test]
    fn test_zero_total_guards_division() {
        let b = bill(0, vec![participant("p1", "Asha", 0, PaymentStatus::Pending)]);
        let summary = compute_settlement_summary(&b).unwrap();
        assert_eq!(summary.paid_percentage, Decimal::ZERO);
        assert_eq!(summary.pending_percentage, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_pending_derived_from_total_not_shares() {
        // Shares add up to 9999 but the bill says 10000.
        let b = bill(
            10000,
            vec![
                participant("p1", "Asha", 3333, PaymentStatus::Paid),
                participant("p2", "Ravi", 3333, PaymentStatus::Paid),
                participant("p3", "Meera", 3333, PaymentStatus::Paid),
            ],
        );
        let summary = compute_settlement_summary(&b).unwrap();
        assert_eq!(summary.pending_amount_paise, 1);
        assert_eq!(summary.paid_count, summary.total_count);
        assert!(!summary.is_fully_settled);
        assert!(summary.is_partially_settled);
    }

    #[test]
    fn test_huge_paid_shares_saturate() {
        let b = bill(
            i64::MAX,
            vec![
                participant("p1", "Asha", i64::MAX, PaymentStatus::Paid),
                participant("p2", "Ravi", i64::MAX, PaymentStatus::Paid),
            ],
        );
        let summary = compute_settlement_summary(&b).unwrap();
        assert_eq!(summary.paid_amount_paise, i64::MAX);
        assert_eq!(summary.pending_amount_paise, 0);
        assert_eq!(summary.paid_percentage, Decimal::ONE_HUNDRED);
        assert!(summary.is_fully_settled);
    }

    #[test]
    fn test_no_participants_is_an_error() {
        let b = bill(1000, vec![]);
        assert_eq!(
            compute_settlement_summary(&b),
            Err(SettlementError::NoParticipants)
        );
        assert_eq!(
            compute_settlement_summary(&b).unwrap_err().to_string(),
            "Bill must have at least one participant"
        );
        assert!(calculate_remainder(&b).is_err());
    }

    #[test]
    fn test_remainder_lists_pending_participants() {
        let b = bill(
            10000,
            vec![
                participant("p1", "Asha", 2500, PaymentStatus::Paid),
                participant("p2", "Ravi", 7500, PaymentStatus::Pending),
            ],
        );
        let remainder = calculate_remainder(&b).unwrap();
        assert_eq!(remainder.remaining_amount_paise, 7500);
        assert_eq!(remainder.remaining_amount_rupees, dec("75.00"));
        assert_eq!(remainder.pending_count, 1);
        assert_eq!(remainder.pending_participants[0].id, ParticipantId::new("p2"));
    }

    #[test]
    fn test_find_participant_by_name() {
        let b = bill(
            200,
            vec![
                participant("p1", "Asha", 100, PaymentStatus::Pending),
                participant("p2", "Ravi Kumar", 100, PaymentStatus::Paid),
            ],
        );
        assert_eq!(
            find_participant_by_name(&b, "ravi kumar").map(|p| p.id.as_str()),
            Some("p2")
        );
        assert!(find_participant_by_name(&b, "Meera").is_none());
        assert_eq!(participants_by_status(&b, PaymentStatus::Paid).len(), 1);
    }

    #[test]
    fn test_summary_json_shape() {
        let b = bill(
            10000,
            vec![
                participant("p1", "Asha", 5000, PaymentStatus::Paid),
                participant("p2", "Ravi", 5000, PaymentStatus::Pending),
            ],
        );
        let json = serde_json::to_value(compute_settlement_summary(&b).unwrap()).unwrap();
        assert_eq!(json["paidPercentage"], 50.0);
        assert_eq!(json["pendingPercentage"], 50.0);
        assert_eq!(json["isPartiallySettled"], true);
    }
}
