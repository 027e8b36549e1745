use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::money::{amount_tolerance, round2};
use crate::domain::{Building, Milestone, Unit};

/// Magnitude and age of a unit's worst overdue milestone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverdueInfo {
    pub amount: Decimal,
    pub days: i64,
}

impl OverdueInfo {
    fn none() -> Self {
        Self {
            amount: Decimal::ZERO,
            days: 0,
        }
    }
}

/// A projected milestone payment that is not yet due.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingPayment {
    pub milestone: Milestone,
    pub amount_due: Decimal,
    pub due_date: NaiveDate,
}

/// Sum of the unit's whole ledger. Amounts are stored at 2 fraction digits;
/// the sum is rounded again on the way out. Zero for an empty ledger.
pub fn total_paid(unit: &Unit) -> Decimal {
    round2(unit.payments.iter().map(|payment| payment.amount).sum())
}

/// Contract price minus everything paid, at 2 fraction digits.
/// Not clamped at zero; clamping is a presentation concern.
pub fn remaining(unit: &Unit) -> Decimal {
    round2(unit.total_price - total_paid(unit))
}

/// Pre-insert guard: a new payment may not exceed the unpaid remainder.
pub fn validate_payment_amount(unit: &Unit, amount: Decimal) -> bool {
    amount <= remaining(unit)
}

/// Whether the unit is in arrears at its current stage.
///
/// The cumulative expected amount of the *active* milestones up to and
/// including the unit's current stage is compared against the whole ledger.
/// An overpayment at any stage therefore offsets a shortfall accounted
/// against an earlier one; this is the canonical rule. A unit whose stage
/// label is unrecognized, or whose plan has no active milestone in range,
/// is never overdue.
pub fn has_overdue_payments(unit: &Unit) -> bool {
    let Some(current) = unit.current_milestone() else {
        return false;
    };

    let expected_cumulative: Decimal = current
        .up_to()
        .iter()
        .filter(|milestone| unit.plan.is_active(**milestone))
        .map(|milestone| unit.plan.expected_amount(*milestone))
        .sum();
    if expected_cumulative.is_zero() {
        return false;
    }

    let shortfall = expected_cumulative - total_paid(unit);
    shortfall > amount_tolerance()
}

/// The worst overdue milestone as of `as_of`: the one overdue the most
/// days, ties resolved in favor of the earlier milestone. Unlike
/// [`has_overdue_payments`], milestones are measured individually here:
/// a milestone is overdue when its due date has passed and the payments
/// accounted against it fall short. `(0, 0)` when nothing qualifies.
pub fn overdue_info(unit: &Unit, as_of: NaiveDate) -> OverdueInfo {
    let mut worst = OverdueInfo::none();
    for milestone in Milestone::ALL {
        if !unit.plan.is_active(milestone) {
            continue;
        }
        let Some(due_date) = unit.plan.due_date(milestone) else {
            continue;
        };
        if due_date >= as_of {
            continue;
        }
        let stage_remaining = unit.plan.expected_amount(milestone) - paid_for_stage(unit, milestone);
        if stage_remaining <= amount_tolerance() {
            continue;
        }
        let days = (as_of - due_date).num_days();
        if days > worst.days {
            worst = OverdueInfo {
                amount: round2(stage_remaining),
                days,
            };
        }
    }
    worst
}

/// Milestones due strictly after `as_of` that are not yet fully covered by
/// payments accounted against them, in milestone order.
pub fn upcoming_due(unit: &Unit, as_of: NaiveDate) -> Vec<UpcomingPayment> {
    let mut upcoming = Vec::new();
    for milestone in Milestone::ALL {
        if !unit.plan.is_active(milestone) {
            continue;
        }
        let Some(due_date) = unit.plan.due_date(milestone) else {
            continue;
        };
        if due_date <= as_of {
            continue;
        }
        let expected = unit.plan.expected_amount(milestone);
        let paid = paid_for_stage(unit, milestone);
        if paid < expected {
            upcoming.push(UpcomingPayment {
                milestone,
                amount_due: round2(expected - paid),
                due_date,
            });
        }
    }
    upcoming
}

/// Upcoming milestone payments across every sold unit of a building,
/// sorted ascending by due date.
pub fn upcoming_due_for_building(building: &Building, as_of: NaiveDate) -> Vec<UpcomingPayment> {
    let mut upcoming: Vec<UpcomingPayment> = building
        .sold_units()
        .flat_map(|unit| upcoming_due(unit, as_of))
        .collect();
    upcoming.sort_by_key(|payment| payment.due_date);
    upcoming
}

/// Ledger total accounted against one milestone.
pub fn paid_for_stage(unit: &Unit, milestone: Milestone) -> Decimal {
    round2(
        unit.payments
            .iter()
            .filter(|payment| payment.stage == Some(milestone))
            .map(|payment| payment.amount)
            .sum(),
    )
}
