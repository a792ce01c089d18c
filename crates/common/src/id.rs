use crate::types::UniqueId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Game tick length in milliseconds; the jitter field is sampled in this
/// tick-scaled unit.
const TICK_MILLIS: u64 = 50;

const TYPE_SHIFT: u32 = 19;
const JITTER_SHIFT: u32 = 10;
const JITTER_MASK: u64 = 0x1ff;
const COUNTER_MASK: u64 = 0x3ff;

/// Allocates process-scoped entity unique ids.
///
/// Bit layout of an allocated id: bits >= 19 hold the network type id,
/// bits 10..=18 a 9-bit time-derived jitter, bits 0..=9 the low bits of a
/// monotonically increasing counter. The counter's overflow above 10 bits
/// is folded into the jitter field, keeping ids pairwise distinct until
/// the combined 19-bit space wraps.
///
/// Ids are unique within one process run only; across restarts a collision
/// requires type, jitter and counter to all coincide, which is tolerated.
#[derive(Debug, Clone)]
pub struct UniqueIdAllocator {
    counter: u64,
    base_jitter: u64,
}

impl UniqueIdAllocator {
    /// Allocator seeded from the current wall clock.
    pub fn new() -> Self {
        let jitter = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64 / TICK_MILLIS)
            .unwrap_or(0);
        Self::with_jitter(jitter)
    }

    /// Allocator with a fixed jitter base, for deterministic tests.
    pub fn with_jitter(base_jitter: u64) -> Self {
        Self {
            counter: 0,
            base_jitter,
        }
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.counter
    }

    pub fn allocate(&mut self, network_type_id: u32) -> UniqueId {
        let n = self.counter;
        self.counter += 1;
        let jitter = self.base_jitter.wrapping_add(n >> JITTER_SHIFT) & JITTER_MASK;
        let bits = ((network_type_id as u64) << TYPE_SHIFT) | (jitter << JITTER_SHIFT) | (n & COUNTER_MASK);
        UniqueId(bits as i64)
    }
}

impl Default for UniqueIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bit_layout_matches_contract() {
        let mut alloc = UniqueIdAllocator::with_jitter(0x1a5);
        let id = alloc.allocate(7).0 as u64;
        assert_eq!(id >> TYPE_SHIFT, 7);
        assert_eq!((id >> JITTER_SHIFT) & JITTER_MASK, 0x1a5);
        assert_eq!(id & COUNTER_MASK, 0);

        let next = alloc.allocate(7).0 as u64;
        assert_eq!(next & COUNTER_MASK, 1);
    }

    #[test]
    fn fixed_jitter_is_deterministic() {
        let mut a = UniqueIdAllocator::with_jitter(42);
        let mut b = UniqueIdAllocator::with_jitter(42);
        for _ in 0..100 {
            assert_eq!(a.allocate(3), b.allocate(3));
        }
    }

    #[test]
    fn ten_thousand_rapid_ids_are_distinct() {
        let mut alloc = UniqueIdAllocator::with_jitter(0);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(alloc.allocate(1)));
        }
    }

    #[test]
    fn different_type_ids_never_collide() {
        let mut alloc = UniqueIdAllocator::with_jitter(9);
        let a = alloc.allocate(1);
        let mut alloc2 = UniqueIdAllocator::with_jitter(9);
        let b = alloc2.allocate(2);
        assert_ne!(a, b);
    }
}
