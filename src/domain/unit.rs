use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::milestone::Milestone;
use super::money::{amount_tolerance, round2};

/// The up-to-four billing milestones of a unit's sale contract, each with an
/// optional expected due date and amount. Embedded in the unit; not
/// independently identified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub preliminary_date: Option<NaiveDate>,
    pub act14_date: Option<NaiveDate>,
    pub act15_date: Option<NaiveDate>,
    pub act16_date: Option<NaiveDate>,
    pub preliminary_amount: Option<Decimal>,
    pub act14_amount: Option<Decimal>,
    pub act15_amount: Option<Decimal>,
    pub act16_amount: Option<Decimal>,
}

impl PaymentPlan {
    pub fn due_date(&self, milestone: Milestone) -> Option<NaiveDate> {
        match milestone {
            Milestone::Preliminary => self.preliminary_date,
            Milestone::Act14 => self.act14_date,
            Milestone::Act15 => self.act15_date,
            Milestone::Act16 => self.act16_date,
        }
    }

    /// Expected amount for a milestone; missing amounts read as zero.
    pub fn expected_amount(&self, milestone: Milestone) -> Decimal {
        let amount = match milestone {
            Milestone::Preliminary => self.preliminary_amount,
            Milestone::Act14 => self.act14_amount,
            Milestone::Act15 => self.act15_amount,
            Milestone::Act16 => self.act16_amount,
        };
        amount.unwrap_or(Decimal::ZERO)
    }

    /// A milestone is part of the contract only when its expected amount
    /// exceeds the tolerance; inactive milestones are excluded from all
    /// arrears arithmetic.
    pub fn is_active(&self, milestone: Milestone) -> bool {
        self.expected_amount(milestone) > amount_tolerance()
    }

    /// Sum of the four milestone amounts, missing treated as zero.
    pub fn total_planned(&self) -> Decimal {
        Milestone::ALL
            .iter()
            .map(|milestone| self.expected_amount(*milestone))
            .sum()
    }

    /// Fold a small rounding residue between the plan total and the
    /// contract price into the final milestone, so the plan sums to the
    /// price. Differences of 0.10 or more are left untouched.
    pub fn absorb_rounding_residue(&mut self, total_price: Decimal) {
        let difference = total_price - self.total_planned();
        if difference.is_zero() || difference.abs() >= Decimal::new(10, 2) {
            return;
        }
        let adjusted = round2(self.expected_amount(Milestone::Act16) + difference);
        self.act16_amount = Some(adjusted);
    }
}

/// A single received payment in a unit's ledger. Append-only from the
/// engine's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    /// Positive, held at exactly 2 fraction digits.
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub method: Option<String>,
    /// Milestone this payment is accounted against, chosen at entry time.
    /// `None` means the payment belongs to no milestone (deposits, legacy
    /// rows whose label could not be classified).
    pub stage: Option<Milestone>,
    pub is_deposit: bool,
    pub notes: Option<String>,
}

impl Payment {
    pub fn new(amount: Decimal, payment_date: NaiveDate, stage: Option<Milestone>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: round2(amount),
            payment_date,
            method: None,
            stage,
            is_deposit: false,
            notes: None,
        }
    }
}

/// A sellable unit (apartment) owned by a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Uuid,
    /// Unique within the owning building.
    pub number: String,
    pub area: Decimal,
    pub price_per_area: Option<Decimal>,
    /// Contract price, exactly 2 fraction digits. Fixed once the unit is
    /// sold; derived from area × price-per-area while it is not.
    pub total_price: Decimal,
    pub sold: bool,
    /// Free-form stage label from the closed (but unenforced) vocabulary.
    pub stage: Option<String>,
    pub plan: PaymentPlan,
    /// Ledger of received payments, owned exclusively by the unit.
    pub payments: Vec<Payment>,
    pub notes: Option<String>,
}

impl Unit {
    pub fn new(number: impl Into<String>, area: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            area,
            price_per_area: None,
            total_price: Decimal::ZERO,
            sold: false,
            stage: None,
            plan: PaymentPlan::default(),
            payments: Vec::new(),
            notes: None,
        }
    }

    /// Recompute the price of an unsold unit from area × price-per-area.
    /// A sold unit keeps its externally-set contract price unchanged.
    pub fn refresh_total_price(&mut self) {
        if self.sold {
            return;
        }
        if let Some(price_per_area) = self.price_per_area {
            self.total_price = round2(self.area * price_per_area);
        }
    }

    /// The unit's current billing milestone, resolved from its stage label.
    pub fn current_milestone(&self) -> Option<Milestone> {
        self.stage
            .as_deref()
            .and_then(Milestone::classify_unit_stage)
    }
}
