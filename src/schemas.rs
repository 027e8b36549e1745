use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::CoreConfig;
use crate::domain::money::round2;
use crate::domain::{Milestone, Payment, PaymentPlan, Unit};
use crate::error::CoreError;

pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(format!("Validation failed: {errors}")))
}

/// Create/update payload for a unit.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UnitInput {
    #[validate(length(min = 1, max = 50))]
    pub number: String,
    pub area: Decimal,
    pub price_per_area: Option<Decimal>,
    /// Externally negotiated contract price. When absent, the price derives
    /// from area × price-per-area.
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub sold: bool,
    pub stage: Option<String>,
    pub notes: Option<String>,
}

impl UnitInput {
    pub fn into_unit(self) -> Result<Unit, CoreError> {
        validate_input(&self)?;
        if self.area <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "unit area must be greater than zero".to_string(),
            ));
        }
        if matches!(self.price_per_area, Some(price) if price <= Decimal::ZERO) {
            return Err(CoreError::Validation(
                "price per area must be greater than zero".to_string(),
            ));
        }
        if matches!(self.total_price, Some(price) if price < Decimal::ZERO) {
            return Err(CoreError::Validation(
                "total price must not be negative".to_string(),
            ));
        }

        let mut unit = Unit::new(self.number, self.area);
        unit.price_per_area = self.price_per_area;
        unit.stage = self.stage;
        unit.notes = self.notes;
        match self.total_price {
            Some(price) => unit.total_price = round2(price),
            None => unit.refresh_total_price(),
        }
        // Sold status is applied last: a sold unit's price is fixed and must
        // never be re-derived.
        unit.sold = self.sold;
        Ok(unit)
    }
}

/// Entry payload for one received payment. The milestone association is a
/// closed choice made here, at entry time; free-text labels from legacy
/// sources go through `Milestone::classify_payment_label` before they reach
/// this type.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PaymentInput {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    #[validate(length(max = 50))]
    pub method: Option<String>,
    pub stage: Option<Milestone>,
    #[serde(default)]
    pub is_deposit: bool,
    pub notes: Option<String>,
}

impl PaymentInput {
    pub fn into_payment(self) -> Result<Payment, CoreError> {
        validate_input(&self)?;
        if self.amount < Decimal::new(1, 2) {
            return Err(CoreError::Validation(
                "payment amount must be at least 0.01".to_string(),
            ));
        }
        let mut payment = Payment::new(self.amount, self.payment_date, self.stage);
        payment.method = self.method;
        payment.is_deposit = self.is_deposit;
        payment.notes = self.notes;
        Ok(payment)
    }
}

/// Payload for a unit's four-milestone payment plan.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaymentPlanInput {
    pub preliminary_date: Option<NaiveDate>,
    pub act14_date: Option<NaiveDate>,
    pub act15_date: Option<NaiveDate>,
    pub act16_date: Option<NaiveDate>,
    pub preliminary_amount: Option<Decimal>,
    pub act14_amount: Option<Decimal>,
    pub act15_amount: Option<Decimal>,
    pub act16_amount: Option<Decimal>,
}

impl PaymentPlanInput {
    /// Build the stored plan. Negative amounts are rejected; with
    /// `strict_plan_chronology` enabled, present due dates must be
    /// non-decreasing in milestone order.
    pub fn into_plan(self, config: &CoreConfig) -> Result<PaymentPlan, CoreError> {
        let plan = PaymentPlan {
            preliminary_date: self.preliminary_date,
            act14_date: self.act14_date,
            act15_date: self.act15_date,
            act16_date: self.act16_date,
            preliminary_amount: self.preliminary_amount.map(round2),
            act14_amount: self.act14_amount.map(round2),
            act15_amount: self.act15_amount.map(round2),
            act16_amount: self.act16_amount.map(round2),
        };

        for milestone in Milestone::ALL {
            if plan.expected_amount(milestone) < Decimal::ZERO {
                return Err(CoreError::Validation(format!(
                    "expected amount for {} must not be negative",
                    milestone.key()
                )));
            }
        }

        if config.strict_plan_chronology {
            let mut previous: Option<(Milestone, NaiveDate)> = None;
            for milestone in Milestone::ALL {
                let Some(due_date) = plan.due_date(milestone) else {
                    continue;
                };
                if let Some((earlier, earlier_date)) = previous {
                    if due_date < earlier_date {
                        return Err(CoreError::Validation(format!(
                            "{} is due before {}",
                            milestone.key(),
                            earlier.key()
                        )));
                    }
                }
                previous = Some((milestone, due_date));
            }
        }

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{PaymentInput, PaymentPlanInput, UnitInput};
    use crate::config::CoreConfig;
    use crate::domain::Milestone;
    use crate::error::CoreError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn strict_config() -> CoreConfig {
        CoreConfig {
            strict_plan_chronology: true,
            ..CoreConfig::default()
        }
    }

    #[test]
    fn unit_input_derives_price_when_not_fixed() {
        let unit = UnitInput {
            number: "A-1".to_string(),
            area: Decimal::new(8050, 2),               // 80.50
            price_per_area: Some(Decimal::new(120_000, 2)), // 1200.00
            total_price: None,
            sold: false,
            stage: None,
            notes: None,
        }
        .into_unit()
        .expect("unit");
        assert_eq!(unit.total_price, Decimal::new(9_660_000, 2)); // 96600.00
    }

    #[test]
    fn unit_input_keeps_a_fixed_contract_price() {
        let unit = UnitInput {
            number: "A-1".to_string(),
            area: Decimal::new(8050, 2),
            price_per_area: Some(Decimal::new(120_000, 2)),
            total_price: Some(Decimal::new(900_005, 1)), // 90000.5 -> 90000.50
            sold: true,
            stage: None,
            notes: None,
        }
        .into_unit()
        .expect("unit");
        assert!(unit.sold);
        assert_eq!(unit.total_price, Decimal::new(9_000_050, 2));
    }

    #[test]
    fn unit_input_rejects_nonpositive_area() {
        let result = UnitInput {
            number: "A-1".to_string(),
            area: Decimal::ZERO,
            price_per_area: None,
            total_price: None,
            sold: false,
            stage: None,
            notes: None,
        }
        .into_unit();
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn payment_input_rounds_and_bounds_the_amount() {
        let payment = PaymentInput {
            amount: Decimal::new(100_005, 3), // 100.005 -> 100.01
            payment_date: date(2024, 1, 5),
            method: Some("bank".to_string()),
            stage: Some(Milestone::Act14),
            is_deposit: false,
            notes: None,
        }
        .into_payment()
        .expect("payment");
        assert_eq!(payment.amount, Decimal::new(10_001, 2));

        let too_small = PaymentInput {
            amount: Decimal::new(5, 3), // 0.005
            payment_date: date(2024, 1, 5),
            method: None,
            stage: None,
            is_deposit: false,
            notes: None,
        }
        .into_payment();
        assert!(matches!(too_small, Err(CoreError::Validation(_))));
    }

    #[test]
    fn plan_chronology_is_permissive_by_default() {
        let input = PaymentPlanInput {
            preliminary_date: Some(date(2024, 5, 1)),
            act14_date: Some(date(2024, 1, 1)),
            ..PaymentPlanInput::default()
        };
        assert!(input.clone().into_plan(&CoreConfig::default()).is_ok());
        assert!(matches!(
            input.into_plan(&strict_config()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn strict_chronology_allows_gaps_and_equal_dates() {
        let input = PaymentPlanInput {
            preliminary_date: Some(date(2024, 1, 1)),
            // act14 has no date at all; act15/act16 share one.
            act15_date: Some(date(2024, 6, 1)),
            act16_date: Some(date(2024, 6, 1)),
            ..PaymentPlanInput::default()
        };
        assert!(input.into_plan(&strict_config()).is_ok());
    }

    #[test]
    fn plan_rejects_negative_amounts() {
        let result = PaymentPlanInput {
            act14_amount: Some(Decimal::new(-100, 2)),
            ..PaymentPlanInput::default()
        }
        .into_plan(&CoreConfig::default());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}
