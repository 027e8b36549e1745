use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::money::{percentage, round2};
use crate::domain::Milestone;
use crate::error::CoreError;
use crate::repository::BuildingStore;
use crate::services::arrears;

/// Sold-unit counts per billing stage. Blank, legacy, or otherwise
/// unrecognized stage labels fold into the preliminary bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageBreakdown {
    pub preliminary: u32,
    pub act14: u32,
    pub act15: u32,
    pub act16: u32,
}

impl StageBreakdown {
    fn bump(&mut self, milestone: Milestone) {
        match milestone {
            Milestone::Preliminary => self.preliminary += 1,
            Milestone::Act14 => self.act14 += 1,
            Milestone::Act15 => self.act15 += 1,
            Milestone::Act16 => self.act16 += 1,
        }
    }
}

/// Expected versus collected amounts for one milestone, summed across all
/// sold units of a building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MilestoneTotals {
    pub expected: Decimal,
    pub collected: Decimal,
}

/// Per-milestone expected/collected totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PaymentBreakdown {
    pub preliminary: MilestoneTotals,
    pub act14: MilestoneTotals,
    pub act15: MilestoneTotals,
    pub act16: MilestoneTotals,
}

impl PaymentBreakdown {
    fn totals_mut(&mut self, milestone: Milestone) -> &mut MilestoneTotals {
        match milestone {
            Milestone::Preliminary => &mut self.preliminary,
            Milestone::Act14 => &mut self.act14,
            Milestone::Act15 => &mut self.act15,
            Milestone::Act16 => &mut self.act16,
        }
    }
}

/// Collection performance of one building's sold units.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildingStatistics {
    pub total_units: u32,
    pub total_revenue: Decimal,
    pub total_collected: Decimal,
    pub total_expected: Decimal,
    /// collected / revenue as a percentage, 2 fraction digits; zero when
    /// there is no revenue.
    pub collection_rate: Decimal,
    pub remaining: Decimal,
    pub stage_breakdown: StageBreakdown,
    pub payment_breakdown: PaymentBreakdown,
}

/// Roll up revenue, collection and stage figures for one building's sold
/// units. With no building id there is nothing selected to aggregate and
/// the report is explicitly all-zero.
pub fn compute_statistics(
    store: &dyn BuildingStore,
    building_id: Option<Uuid>,
) -> Result<BuildingStatistics, CoreError> {
    let Some(building_id) = building_id else {
        debug!("no building selected; returning empty statistics");
        return Ok(BuildingStatistics::default());
    };
    let building = store.fetch_building(building_id)?;

    let mut report = BuildingStatistics::default();
    for unit in building.sold_units() {
        report.total_units += 1;
        report.total_revenue += unit.total_price;
        report.total_collected += arrears::total_paid(unit);

        report
            .stage_breakdown
            .bump(unit.current_milestone().unwrap_or(Milestone::Preliminary));

        for milestone in Milestone::ALL {
            let totals = report.payment_breakdown.totals_mut(milestone);
            totals.expected += unit.plan.expected_amount(milestone);
            totals.collected += arrears::paid_for_stage(unit, milestone);
        }
    }

    report.total_revenue = round2(report.total_revenue);
    report.total_collected = round2(report.total_collected);
    // Expected portfolio income equals the contracted prices.
    report.total_expected = report.total_revenue;
    report.collection_rate = percentage(report.total_collected, report.total_revenue);
    report.remaining = round2(report.total_expected - report.total_collected);
    for milestone in Milestone::ALL {
        let totals = report.payment_breakdown.totals_mut(milestone);
        totals.expected = round2(totals.expected);
        totals.collected = round2(totals.collected);
    }

    debug!(
        building_id = %building_id,
        units = report.total_units,
        collection_rate = %report.collection_rate,
        "computed building statistics"
    );

    Ok(report)
}

/// Number of sold units of the building currently in arrears; zero when no
/// building is selected.
pub fn count_overdue_units(
    store: &dyn BuildingStore,
    building_id: Option<Uuid>,
) -> Result<u32, CoreError> {
    let Some(building_id) = building_id else {
        return Ok(0);
    };
    let building = store.fetch_building(building_id)?;
    let overdue = building
        .sold_units()
        .filter(|unit| arrears::has_overdue_payments(unit))
        .count();
    Ok(overdue as u32)
}
