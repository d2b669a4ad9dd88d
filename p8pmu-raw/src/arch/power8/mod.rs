//! IBM POWER8 PMU definitions
//!
//! The POWER8 core has six performance monitor counters. PMC1-4 are
//! programmable through MMCR1; PMC5 counts instructions completed in run
//! state and PMC6 counts cycles in run state, and nothing else.
//!
//! ## Layouts
//!
//! - **event** - raw 64-bit event code fields
//! - **constraint** - constraint space used to detect scheduling conflicts
//! - **mmcr** - MMCR0 / MMCR1 / MMCRA register layouts
//!
//! ## References
//!
//! - Power ISA Version 2.07, Book III-S, Chapter 9: Performance Monitor Facility
//! - POWER8 Processor User's Manual, Performance Monitor Unit

pub mod constraint;
pub mod event;
pub mod mmcr;

/// Total number of counters
pub const PMU_COUNTERS: usize = 6;

/// Number of counters programmable through MMCR1 (PMC1-4)
pub const GENERAL_COUNTERS: usize = 4;

/// SPR numbers for the PMU control registers
pub mod spr {
    pub const MMCR0: u32 = 795;
    pub const MMCR1: u32 = 798;
    pub const MMCRA: u32 = 786;
}
