//! The PMU description consumed by a counter scheduling framework
//!
//! The framework owns event scheduling, alternative search and register
//! I/O. It only calls into the operations below, all of which are pure
//! functions of their arguments and the PMU configuration.

use p8pmu_raw::current_arch::constraint::{ADD_FIELDS, TEST_ADDER};
use p8pmu_raw::current_arch::event::EventCode;
use p8pmu_raw::current_arch::PMU_COUNTERS;

use crate::config::PmuConfig;
use crate::constraint::{derive_constraint, Constraint};
use crate::error::Result;
use crate::events::{alternatives_for, Alternatives, GenericEvent, MAX_ALTERNATIVES};
use crate::placement::{compute_registers, disable_counter, MmcrSet, Placement};

/// Optional hardware features a PMU advertises
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PmuFlags {
    /// Sampled instruction address comes from the SIAR slot field
    pub has_sslot: bool,
    /// Sampled instruction event register is present
    pub has_sier: bool,
}

pub trait PowerPmu {
    fn name(&self) -> &'static str;

    /// Number of hardware counters
    fn n_counter(&self) -> usize;

    /// Upper bound on the length of any alternatives list
    fn max_alternatives(&self) -> usize;

    /// Constraint-space bits that behave as adders
    fn add_fields(&self) -> u64;

    /// Bias added before the adder overflow test
    fn test_adder(&self) -> u64;

    fn flags(&self) -> PmuFlags;

    fn get_constraint(&self, event: EventCode) -> Result<Constraint>;

    /// Register values and counter assignment for a feasible batch
    fn compute_mmcr(&self, events: &[EventCode]) -> Result<Placement>;

    fn get_alternatives(&self, event: EventCode, only_count_run: bool) -> Alternatives;

    /// Stop a counter in place, zero-based index
    fn disable_pmc(&self, counter: usize, mmcr: &mut MmcrSet);

    /// Native code for a cross-machine event, if this PMU supports it
    fn generic_event(&self, event: GenericEvent) -> Option<EventCode>;
}

/// POWER8 core PMU
#[derive(Debug, Clone, Copy, Default)]
pub struct Power8Pmu {
    config: PmuConfig,
}

impl Power8Pmu {
    pub fn new(config: PmuConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PmuConfig {
        &self.config
    }

    /// Alternatives with run-state pairing taken from the configuration
    pub fn alternatives(&self, event: EventCode) -> Alternatives {
        self.get_alternatives(event, self.config.only_count_run())
    }
}

impl PowerPmu for Power8Pmu {
    fn name(&self) -> &'static str {
        "POWER8"
    }

    fn n_counter(&self) -> usize {
        PMU_COUNTERS
    }

    fn max_alternatives(&self) -> usize {
        MAX_ALTERNATIVES
    }

    fn add_fields(&self) -> u64 {
        ADD_FIELDS
    }

    fn test_adder(&self) -> u64 {
        TEST_ADDER
    }

    fn flags(&self) -> PmuFlags {
        PmuFlags {
            has_sslot: true,
            has_sier: true,
        }
    }

    fn get_constraint(&self, event: EventCode) -> Result<Constraint> {
        derive_constraint(event)
    }

    fn compute_mmcr(&self, events: &[EventCode]) -> Result<Placement> {
        compute_registers(events, self.config.sdar_mode)
    }

    fn get_alternatives(&self, event: EventCode, only_count_run: bool) -> Alternatives {
        alternatives_for(event, only_count_run)
    }

    fn disable_pmc(&self, counter: usize, mmcr: &mut MmcrSet) {
        *mmcr = disable_counter(counter, *mmcr);
    }

    fn generic_event(&self, event: GenericEvent) -> Option<EventCode> {
        Some(event.event_code())
    }
}
