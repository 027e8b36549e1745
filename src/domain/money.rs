use rust_decimal::{Decimal, RoundingStrategy};

/// Shortfalls and remainders at or below this magnitude are treated as
/// settled, absorbing accumulated rounding noise.
pub fn amount_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Round a monetary amount to exactly 2 fraction digits, half-up.
///
/// Every amount crossing an engine interface goes through this; amounts are
/// never represented as floats.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole * 100`, rounded to 2 fraction digits. Returns zero when
/// `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round2(part / whole * Decimal::ONE_HUNDRED)
}
