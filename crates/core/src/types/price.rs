//! Discount arithmetic on exact decimals.

use rust_decimal::Decimal;

/// Apply a percentage discount to a price.
///
/// `discount_percent` is expected in `[0, 100]`; the result is
/// `price * (1 - discount_percent / 100)` computed with exact decimal
/// arithmetic, so a 0% discount returns the price unchanged and a 100%
/// discount returns zero.
#[must_use]
pub fn discounted_price(price: Decimal, discount_percent: Decimal) -> Decimal {
    price * (Decimal::ONE_HUNDRED - discount_percent) / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_discount_is_identity() {
        let price = Decimal::from(45_999);
        assert_eq!(discounted_price(price, Decimal::ZERO), price);
    }

    #[test]
    fn test_full_discount_is_free() {
        let price = Decimal::from(2_499);
        assert_eq!(discounted_price(price, Decimal::ONE_HUNDRED), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_applied_exactly() {
        // 18% off 45999 = 37719.18
        let result = discounted_price(Decimal::from(45_999), Decimal::from(18));
        assert_eq!(result, Decimal::new(37_719_18, 2));
    }

    #[test]
    fn test_never_exceeds_price_in_range() {
        let price = Decimal::from(899);
        for pct in 0..=100 {
            let discounted = discounted_price(price, Decimal::from(pct));
            assert!(discounted <= price);
            assert!(discounted >= Decimal::ZERO);
        }
    }
}
