//! Prime sizing helpers for bucket array capacities.
//!
//! Quadratic probing only reaches enough distinct slots when the table size is prime, so every
//! capacity the map allocates passes through these two functions.

/// Returns `true` when `n` is prime.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    // `factor <= n / factor` is `factor * factor <= n` without the overflow.
    while factor <= n / factor {
        if n % factor == 0 {
            return false;
        }
        factor = factor.saturating_add(2);
    }

    true
}

/// Returns the smallest odd prime greater than or equal to `n`.
///
/// Even inputs start the search at `n + 1`, so `next_prime(2)` is `3` and the result is never
/// smaller than `3`.
#[must_use]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n.saturating_add(1) } else { n };

    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_small_primes() {
        let primes: Vec<usize> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_is_prime_rejects_squares_of_primes() {
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        assert!(!is_prime(10_201)); // 101 * 101
        assert!(is_prime(10_007));
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 3);
        assert_eq!(next_prime(1), 3);
        assert_eq!(next_prime(2), 3);
        assert_eq!(next_prime(3), 3);
        assert_eq!(next_prime(11), 11);
        assert_eq!(next_prime(20), 23);
        assert_eq!(next_prime(22), 23);
        assert_eq!(next_prime(53 * 2), 107);
        assert_eq!(next_prime(100), 101);
    }

    proptest! {
        #[test]
        fn next_prime_is_prime_and_not_smaller(n in 0usize..100_000) {
            let p = next_prime(n);
            prop_assert!(is_prime(p));
            prop_assert!(p >= n);
            prop_assert!(p % 2 == 1);
        }

        #[test]
        fn is_prime_matches_trial_division(n in 0usize..5_000) {
            let expected = n >= 2 && (2..n).all(|d| n % d != 0);
            prop_assert_eq!(is_prime(n), expected);
        }
    }
}
