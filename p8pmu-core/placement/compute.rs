//! MMCR computation for an accepted batch of events

use p8pmu_raw::current_arch::event::EventCode;
use p8pmu_raw::current_arch::mmcr::{Mmcr0, Mmcr1, Mmcra};
use p8pmu_raw::current_arch::{GENERAL_COUNTERS, PMU_COUNTERS};
use p8pmu_raw::RegisterLayout;

use super::{MmcrSet, Placement};
use crate::config::SdarMode;
use crate::error::{PmuError, Result};

/// Counters in use, bit `pmc` set for PMC`pmc` (1-based)
///
/// Wide enough for any 4-bit counter field; only PMC1-6 ever get claimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSet(u16);

impl CounterSet {
    pub fn claim(&mut self, pmc: u8) {
        self.0 |= 1u16.checked_shl(pmc as u32).unwrap_or(0);
    }

    pub fn contains(&self, pmc: u8) -> bool {
        self.0 & 1u16.checked_shl(pmc as u32).unwrap_or(0) != 0
    }

    /// Lowest free counter among PMC1-4; PMC5/6 are never handed out
    pub fn lowest_free_general(&self) -> Option<u8> {
        (1..=GENERAL_COUNTERS as u8).find(|&pmc| !self.contains(pmc))
    }

    pub fn any_of(&self, pmcs: std::ops::RangeInclusive<u8>) -> bool {
        pmcs.into_iter().any(|pmc| self.contains(pmc))
    }
}

/// Compute MMCR0, MMCR1 and MMCRA for `events` and assign counters
///
/// The batch must already have passed constraint checking; nothing is
/// re-validated here beyond rejecting counters the PMU does not have.
/// Events without an explicit counter get the lowest free
/// PMC1-4 in input order, so reordering a batch can change the assignment.
pub fn compute_registers(events: &[EventCode], sdar_mode: SdarMode) -> Result<Placement> {
    // First pass to count resource use
    let mut in_use = CounterSet::default();
    for event in events {
        let pmc = event.pmc();
        if pmc as usize > PMU_COUNTERS {
            tracing::debug!("Cannot place event 0x{:x} on PMC{}", event, pmc);
            return Err(PmuError::InvalidCounter {
                event: event.raw(),
                pmc,
            });
        }
        if pmc != 0 {
            in_use.claim(pmc);
        }
    }

    let mut mmcr1 = Mmcr1::default();
    let mut mmcra = Mmcra {
        sdar_mode: sdar_mode.field_value(),
        ..Default::default()
    };
    let mut counters = Vec::with_capacity(events.len());

    // Second pass: assign PMCs, set all MMCR1 fields
    for &event in events {
        let mut pmc = event.pmc();
        if pmc == 0 {
            pmc = in_use
                .lowest_free_general()
                .ok_or(PmuError::CountersExhausted { event: event.raw() })?;
            in_use.claim(pmc);
        }

        if pmc as usize <= GENERAL_COUNTERS {
            let fields = mmcr1.counter_mut(pmc)?;
            fields.unit |= event.unit();
            fields.combine |= event.combine() != 0;
            fields.pmcsel |= event.psel();
        }

        if event.is_l1() {
            let cache = event.cache_sel();
            mmcr1.ic_qual |= cache & 1 != 0;
            mmcr1.dc_qual |= cache & 2 != 0;
        }

        if event.is_marked() {
            mmcra.sample_enable = true;

            let sample = event.sample();
            if sample != 0 {
                mmcra.sample_mode |= sample & 3;
                mmcra.sample_elig |= sample >> 2;
            }
        }

        if event.is_fab_match() {
            mmcr1.fab_match |= event.thresh_ctl();
        } else {
            mmcra.thresh_ctl |= event.thresh_ctl();
            mmcra.thresh_sel |= event.thresh_sel();
            mmcra.thresh_cmp |= event.thresh_cmp();
        }

        tracing::trace!("Event 0x{:x} placed on PMC{}", event, pmc);
        counters.push(pmc as usize - 1);
    }

    // Condition enables follow from occupancy alone
    let mmcr0 = Mmcr0 {
        pmc1ce: in_use.contains(1),
        pmcjce: in_use.any_of(2..=4),
    };

    Ok(Placement {
        mmcr: MmcrSet {
            mmcr0: mmcr0.to_raw(),
            mmcr1: mmcr1.to_raw(),
            mmcra: mmcra.to_raw(),
        },
        counters,
    })
}
