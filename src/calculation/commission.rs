//! Hybrid commission calculation.

use rust_decimal::Decimal;

/// Calculates commission pay for a hybrid contract.
///
/// Commission is the period's sales volume multiplied by the contract's
/// commission rate, rounded to 2 decimal places.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_commission;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let commission = calculate_commission(
///     Decimal::from_str("10000").unwrap(),
///     Decimal::from_str("0.10").unwrap(),
/// );
/// assert_eq!(commission, Decimal::from_str("1000.00").unwrap());
/// ```
pub fn calculate_commission(sales_volume: Decimal, commission_rate: Decimal) -> Decimal {
    (sales_volume * commission_rate).round_dp(2)
}
