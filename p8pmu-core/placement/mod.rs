//! Turning an accepted batch into control register values

mod compute;

pub use compute::{compute_registers, CounterSet};

use p8pmu_raw::current_arch::mmcr::mmcr1;
use p8pmu_raw::current_arch::{spr, GENERAL_COUNTERS};

/// Values for the three PMU control registers
///
/// The caller owns these and decides when to write them to hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MmcrSet {
    pub mmcr0: u64,
    pub mmcr1: u64,
    pub mmcra: u64,
}

impl MmcrSet {
    /// (SPR number, value) pairs in write order
    pub fn spr_writes(&self) -> [(u32, u64); 3] {
        [
            (spr::MMCR0, self.mmcr0),
            (spr::MMCR1, self.mmcr1),
            (spr::MMCRA, self.mmcra),
        ]
    }
}

/// Result of placing a batch of events on the counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub mmcr: MmcrSet,
    /// Zero-based counter for each event, in input order
    pub counters: Vec<usize>,
}

/// Stop counter `counter` (zero-based) from counting anything
///
/// Clears its PMCxSEL field in MMCR1 and nothing else. PMC5 and PMC6 have
/// no selector, so this is a no-op for them.
pub fn disable_counter(counter: usize, mut mmcr: MmcrSet) -> MmcrSet {
    if counter < GENERAL_COUNTERS {
        mmcr.mmcr1 &= !mmcr1::pmcsel_mask(counter as u8 + 1);
    }
    mmcr
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ONES: MmcrSet = MmcrSet {
        mmcr0: u64::MAX,
        mmcr1: u64::MAX,
        mmcra: u64::MAX,
    };

    #[test]
    fn test_disable_general_counter() {
        let out = disable_counter(0, ALL_ONES);
        assert_eq!(out.mmcr1, !(0xffu64 << 24));
        assert_eq!(out.mmcr0, u64::MAX);
        assert_eq!(out.mmcra, u64::MAX);

        let out = disable_counter(3, ALL_ONES);
        assert_eq!(out.mmcr1, !0xffu64);
    }

    #[test]
    fn test_disable_dedicated_counter_is_noop() {
        assert_eq!(disable_counter(4, ALL_ONES), ALL_ONES);
        assert_eq!(disable_counter(5, ALL_ONES), ALL_ONES);
    }

    #[test]
    fn test_spr_writes() {
        let set = MmcrSet {
            mmcr0: 1,
            mmcr1: 2,
            mmcra: 3,
        };
        assert_eq!(set.spr_writes(), [(795, 1), (798, 2), (786, 3)]);
    }
}
