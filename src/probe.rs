//! Quadratic probe sequence.

/// Candidate slot indices for one key: `(initial + j²) mod capacity` for `j = 0, 1, 2, ...`.
///
/// Offsets are advanced incrementally (`(j + 1)² - j² = 2j + 1`) and kept reduced modulo the
/// capacity, so `j²` itself is never materialised. Since `j` and `j + capacity` land on the same
/// slot, the sequence ends after `capacity` steps; every distinct index has been produced by then.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// Number of slots in the table being probed
    capacity: usize,
    /// Slot index for `j = 0`
    initial: usize,
    /// `j²` reduced modulo `capacity`
    offset: usize,
    /// The next `j` to yield
    step: usize,
}

impl ProbeSequence {
    /// Starts the sequence for a key hashing to `hash` in a table of `capacity` slots
    #[must_use]
    pub fn new(hash: u64, capacity: usize) -> Self {
        Self { capacity, initial: Self::initial_index(hash, capacity), offset: 0, step: 0 }
    }

    /// `hash mod capacity`, or 0 for an empty table
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    pub fn initial_index(hash: u64, capacity: usize) -> usize {
        match u64::try_from(capacity) {
            // The remainder is below `capacity`, so it fits back into `usize`.
            Ok(modulus) => hash.checked_rem(modulus).map_or(0, |index| index as usize),
            // `usize` wider than 64 bits: every `u64` hash is already a valid residue.
            Err(_) => usize::try_from(hash).map_or(0, |hash| hash % capacity),
        }
    }

    /// Number of indices yielded so far
    #[must_use]
    pub fn steps(&self) -> usize {
        self.step
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.capacity {
            return None;
        }

        // Both terms are below `capacity`.
        let index = (self.initial % self.capacity + self.offset) % self.capacity;

        // offset(j + 1) = offset(j) + 2j + 1
        let increment = (self.step % self.capacity * 2 + 1) % self.capacity;
        self.offset = (self.offset + increment) % self.capacity;
        self.step += 1;

        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity.saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sequence_starts_at_initial_index() {
        let mut probe = ProbeSequence::new(25, 11);
        assert_eq!(probe.next(), Some(3));
        assert_eq!(probe.next(), Some(4));
        assert_eq!(probe.next(), Some(7));
        assert_eq!(probe.next(), Some(1)); // 3 + 9 = 12
        assert_eq!(probe.next(), Some(8)); // 3 + 16 = 19
        assert_eq!(probe.steps(), 5);
    }

    #[test]
    fn test_sequence_is_bounded_by_capacity() {
        assert_eq!(ProbeSequence::new(12_345, 7).count(), 7);
        assert_eq!(ProbeSequence::new(0, 0).next(), None);
    }

    #[test]
    fn test_prime_capacity_reaches_half_the_table() {
        let capacity = 23;
        let mut seen: Vec<usize> = ProbeSequence::new(5, capacity).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), capacity.div_ceil(2));
    }

    proptest! {
        #[test]
        fn matches_closed_form(hash in any::<u64>(), capacity in 1usize..500) {
            let initial = ProbeSequence::initial_index(hash, capacity);
            prop_assert!(initial < capacity);

            for (j, index) in ProbeSequence::new(hash, capacity).enumerate() {
                let expected = (initial + (j * j) % capacity) % capacity;
                prop_assert_eq!(index, expected);
            }
        }
    }
}
