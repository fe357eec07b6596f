//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done in `Decimal` and converted back to `f64`
//! for storage/serialization, rounded to 2 decimal places half-up.

use rust_decimal::prelude::*;

use super::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per unit
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate a (unit_price, quantity) pair before it becomes an order line
pub fn validate_line(unit_price: f64, quantity: i32) -> Result<(), OrderError> {
    if !unit_price.is_finite() {
        return Err(OrderError::InvalidLine(format!(
            "unit price must be a finite number, got {}",
            unit_price
        )));
    }
    if unit_price < 0.0 {
        return Err(OrderError::InvalidLine(format!(
            "unit price must be non-negative, got {}",
            unit_price
        )));
    }
    if unit_price > MAX_PRICE {
        return Err(OrderError::InvalidLine(format!(
            "unit price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, unit_price
        )));
    }
    if quantity <= 0 {
        return Err(OrderError::InvalidLine(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidLine(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// quantity × unit_price, rounded to 2 decimal places
///
/// This is the figure stored on the line; totals sum the stored figures so
/// later recomputation cannot drift from what was charged.
pub fn line_total(quantity: i32, unit_price: f64) -> f64 {
    let total = Decimal::from(quantity) * to_decimal(unit_price);
    to_f64(total)
}

/// Sum already-rounded line totals into an order total
pub fn order_total(line_totals: impl IntoIterator<Item = f64>) -> f64 {
    let total: Decimal = line_totals.into_iter().map(to_decimal).sum();
    to_f64(total)
}

/// quantity_used × unit_price for fractional quantities (ingredient usage),
/// rounded to 2 decimal places
pub fn line_cost(quantity_used: f64, unit_price: f64) -> f64 {
    let cost = to_decimal(quantity_used) * to_decimal(unit_price);
    to_f64(cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum 0.01 one thousand times
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(3, 10.99), 32.97);
        assert_eq!(line_total(2, 20.0), 40.0);
        assert_eq!(line_total(1, 0.0), 0.0);
    }

    #[test]
    fn test_line_total_rounds_half_up() {
        // 3 × 0.015 = 0.045 → 0.05
        assert_eq!(line_total(3, 0.015), 0.05);
    }

    #[test]
    fn test_line_cost_fractional_quantity() {
        // 5 kg of flour at 4.00/kg
        assert_eq!(line_cost(5.0, 4.0), 20.0);
        // 0.75 kg at 3.30/kg → 2.475 → 2.48
        assert_eq!(line_cost(0.75, 3.30), 2.48);
    }

    #[test]
    fn test_order_total_sums_stored_lines() {
        let total = order_total([32.97, 40.0, 0.01]);
        assert_eq!(total, 72.98);
    }

    #[test]
    fn test_order_total_many_small_lines() {
        // 100 lines at 0.01 each
        let total = order_total(std::iter::repeat_n(0.01, 100));
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_validate_line_accepts_normal_values() {
        assert!(validate_line(19.95, 3).is_ok());
        assert!(validate_line(0.0, 1).is_ok());
    }

    #[test]
    fn test_validate_line_rejects_nan_and_infinity() {
        assert!(validate_line(f64::NAN, 1).is_err());
        assert!(validate_line(f64::INFINITY, 1).is_err());
    }

    #[test]
    fn test_validate_line_rejects_negative_price() {
        assert!(validate_line(-0.01, 1).is_err());
    }

    #[test]
    fn test_validate_line_rejects_bad_quantity() {
        assert!(validate_line(10.0, 0).is_err());
        assert!(validate_line(10.0, -2).is_err());
        assert!(validate_line(10.0, MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_line_rejects_excessive_price() {
        assert!(validate_line(MAX_PRICE + 1.0, 1).is_err());
    }

    #[test]
    fn test_to_decimal_nan_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
