mod conversion;
mod finance;
mod health;
mod home;
mod option;

use super::threshold::ThresholdTable;
use super::types::Calculator;

/// Every calculator, grouped by module.
pub static CATALOG: [&[Calculator]; 5] = [
    &conversion::CALCULATORS,
    &finance::CALCULATORS,
    &option::CALCULATORS,
    &health::CALCULATORS,
    &home::CALCULATORS,
];

static THRESHOLD_TABLES: [&ThresholdTable; 12] = [
    &finance::BOND_PRICING,
    &finance::PAYBACK_SPEED,
    &finance::NET_WORTH,
    &finance::INTEREST_BURDEN,
    &finance::CONTRIBUTION_MARGIN,
    &finance::DISCOUNT_SIZE,
    &finance::FUND_COVERAGE,
    &option::MONEYNESS,
    &health::HABIT_STRENGTH,
    &health::MUSCLE_MALE,
    &health::MUSCLE_FEMALE,
    &health::CARB_LEVEL,
];

pub fn threshold_tables() -> &'static [&'static ThresholdTable] {
    &THRESHOLD_TABLES
}
