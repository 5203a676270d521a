use crate::storage_types::PCT_BASE;

/// Whether `value` is strictly more than `pct` (scaled by `PCT_BASE`) of `total`.
///
/// A zero total never passes. Negative amounts count as zero. The comparison
/// is done on full 256-bit products, so any `i128` token amount is safe.
pub fn is_value_pct(value: i128, total: i128, pct: u64) -> bool {
    if total <= 0 {
        return false;
    }

    let value = value.max(0) as u128;
    let total = total as u128;

    widening_mul(value, PCT_BASE as u128) > widening_mul(pct as u128, total)
}

/// 256-bit product of two `u128`s as `(high, low)` halves.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    let cross = (lo_lo >> 64) + (hi_lo & MASK) + (lo_hi & MASK);
    let low = (cross << 64) | (lo_lo & MASK);
    let high = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (cross >> 64);

    (high, low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct16(x: u64) -> u64 {
        x * 10u64.pow(16)
    }

    #[test]
    fn test_zero_total_never_passes() {
        assert!(!is_value_pct(0, 0, pct16(50)));
        assert!(!is_value_pct(1, 0, pct16(50)));
        assert!(!is_value_pct(1, 0, 0));
    }

    #[test]
    fn test_zero_value() {
        assert!(!is_value_pct(0, 10, pct16(50)));
        assert!(!is_value_pct(0, 10, 0));
    }

    #[test]
    fn test_pct_close_to_hundred() {
        assert!(is_value_pct(10, 10, PCT_BASE - 1));
        assert!(!is_value_pct(9, 10, PCT_BASE - 1));
    }

    #[test]
    fn test_strict_inequality() {
        assert!(!is_value_pct(10, 20, pct16(50)));

        let total = pct16(100) as i128;
        let half = pct16(50) as i128;
        assert!(!is_value_pct(half - 1, total, pct16(50)));
        assert!(!is_value_pct(half, total, pct16(50)));
        assert!(is_value_pct(half + 1, total, pct16(50)));
    }

    #[test]
    fn test_large_amounts_do_not_overflow() {
        assert!(is_value_pct(i128::MAX, i128::MAX, PCT_BASE - 1));
        assert!(!is_value_pct(i128::MAX / 2, i128::MAX, pct16(50)));
        assert!(is_value_pct(i128::MAX / 2 + 1, i128::MAX, pct16(50)));
    }

    #[test]
    fn test_negative_value_counts_as_zero() {
        assert!(!is_value_pct(-5, 10, 0));
    }

    #[test]
    fn test_widening_mul() {
        assert_eq!(widening_mul(0, u128::MAX), (0, 0));
        assert_eq!(widening_mul(u128::MAX, 1), (0, u128::MAX));
        assert_eq!(widening_mul(1 << 64, 1 << 64), (1, 0));
        assert_eq!(widening_mul(u128::MAX, u128::MAX), (u128::MAX - 1, 1));
    }
}
