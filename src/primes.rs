//! Fixed table of small primes used to derive the double-hashing step

/// Every prime below 1000, ascending
pub(crate) const PRIMES: [usize; 168] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47,
    53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107, 109, 113,
    127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197,
    199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281,
    283, 293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379,
    383, 389, 397, 401, 409, 419, 421, 431, 433, 439, 443, 449, 457, 461, 463,
    467, 479, 487, 491, 499, 503, 509, 521, 523, 541, 547, 557, 563, 569, 571,
    577, 587, 593, 599, 601, 607, 613, 617, 619, 631, 641, 643, 647, 653, 659,
    661, 673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751, 757, 761,
    769, 773, 787, 797, 809, 811, 821, 823, 827, 829, 839, 853, 857, 859, 863,
    877, 881, 883, 887, 907, 911, 919, 929, 937, 941, 947, 953, 967, 971, 977,
    983, 991, 997,
];

/// Returns the index of the largest prime strictly below `bound`.
///
/// Saturates at the last prime (997) for larger bounds and at the first one (2) when no
/// prime is below `bound`.
pub(crate) fn cursor_below(bound: usize) -> usize {
    PRIMES.partition_point(|&prime| prime < bound).saturating_sub(1)
}

/// Returns the prime at `cursor`, clamping out-of-range cursors to the largest prime
pub(crate) fn prime_at(cursor: usize) -> usize {
    PRIMES.get(cursor).or(PRIMES.last()).copied().unwrap_or(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_below_power_of_two_capacities() {
        assert_eq!(prime_at(cursor_below(4)), 3);
        assert_eq!(prime_at(cursor_below(8)), 7);
        assert_eq!(prime_at(cursor_below(16)), 13);
        assert_eq!(prime_at(cursor_below(64)), 61);
        assert_eq!(prime_at(cursor_below(512)), 509);
    }

    #[test]
    fn test_cursor_is_strictly_below_prime_bounds() {
        // 11 is itself prime, the cursor must land on 7
        assert_eq!(prime_at(cursor_below(11)), 7);
        assert_eq!(prime_at(cursor_below(12)), 11);
    }

    #[test]
    fn test_cursor_saturates() {
        assert_eq!(prime_at(cursor_below(1024)), 997);
        assert_eq!(prime_at(cursor_below(1 << 20)), 997);
        assert_eq!(prime_at(cursor_below(2)), 2);
        assert_eq!(prime_at(PRIMES.len()), 997);
    }

    #[test]
    fn test_primes_ascending() {
        assert!(PRIMES.windows(2).all(|pair| pair.first() < pair.last()));
    }
}
