//! MMCR0 / MMCR1 / MMCRA register layouts for POWER8
//!
//! Bit numbers below are LSB-0. The ISA documents these registers with IBM
//! (MSB-0) numbering; `MMCR1[20:27]` in the ISA is bits 36-43 here.

use super::GENERAL_COUNTERS;
use crate::field::{check_width, FieldError, Result};
use crate::register::RegisterLayout;

/// MMCR0 bits
pub mod mmcr0 {
    /// PMC1 condition enable
    pub const PMC1CE: u64 = 0x0000_8000;
    /// PMC2-6 condition enable
    pub const PMCJCE: u64 = 0x0000_4000;
}

/// MMCR1 bits
pub mod mmcr1 {
    pub const DC_QUAL_SHIFT: u32 = 47;
    pub const IC_QUAL_SHIFT: u32 = 46;
    pub const FAB_SHIFT: u32 = 36;
    pub const FAB_MASK: u64 = 0xff << FAB_SHIFT;

    /// PMCxUNIT offset for `pmc` (1-based, 1-4)
    pub const fn unit_shift(pmc: u8) -> u32 {
        60 - 4 * (pmc as u32 - 1)
    }

    /// PMCxCOMB offset for `pmc` (1-based, 1-4)
    pub const fn combine_shift(pmc: u8) -> u32 {
        35 - (pmc as u32 - 1)
    }

    /// PMCxSEL offset for `pmc` (1-based, 1-4)
    pub const fn pmcsel_shift(pmc: u8) -> u32 {
        24 - (pmc as u32 - 1) * 8
    }

    /// The full PMCxSEL field for `pmc` (1-based, 1-4)
    pub const fn pmcsel_mask(pmc: u8) -> u64 {
        0xff << pmcsel_shift(pmc)
    }
}

/// MMCRA bits
pub mod mmcra {
    pub const SAMPLE_ENABLE: u64 = 0x1;
    pub const SAMP_MODE_SHIFT: u32 = 1;
    pub const SAMP_ELIG_SHIFT: u32 = 4;
    pub const THR_CTL_SHIFT: u32 = 8;
    pub const THR_SEL_SHIFT: u32 = 16;
    pub const THR_CMP_SHIFT: u32 = 32;
    pub const SDAR_MODE_SHIFT: u32 = 42;

    /// Update SDAR on TLB miss
    pub const SDAR_MODE_TLB: u64 = 1 << SDAR_MODE_SHIFT;
}

/// MMCR0 Register layout (only the fields derived from counter occupancy)
///
/// ## Register Format
///
/// | Bits | Field  | Description              |
/// |------|--------|--------------------------|
/// | 14   | pmcjce | PMC2-6 condition enable  |
/// | 15   | pmc1ce | PMC1 condition enable    |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mmcr0 {
    pub pmc1ce: bool,
    pub pmcjce: bool,
}

impl RegisterLayout for Mmcr0 {
    fn to_raw(&self) -> u64 {
        (if self.pmc1ce { mmcr0::PMC1CE } else { 0 })
            | (if self.pmcjce { mmcr0::PMCJCE } else { 0 })
    }

    fn from_raw(value: u64) -> Self {
        Self {
            pmc1ce: value & mmcr0::PMC1CE != 0,
            pmcjce: value & mmcr0::PMCJCE != 0,
        }
    }
}

/// Per-counter MMCR1 fields for PMC1-4
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mmcr1Counter {
    /// PMCxUNIT (4 bits)
    pub unit: u8,
    /// PMCxCOMB
    pub combine: bool,
    /// PMCxSEL (8 bits)
    pub pmcsel: u8,
}

/// MMCR1 Register layout
///
/// ## Register Format
///
/// | Bits   | Field     | Description                   |
/// |--------|-----------|-------------------------------|
/// | 0-31   | pmcsel    | PMC4SEL..PMC1SEL, 8 bits each |
/// | 32-35  | combine   | PMC4COMB..PMC1COMB            |
/// | 36-43  | fab_match | FAB_CRESP_MATCH/FAB_TYPE_MATCH|
/// | 46     | ic_qual   | L1 I-cache qualifier          |
/// | 47     | dc_qual   | L1 D-cache qualifier          |
/// | 48-63  | unit      | PMC4UNIT..PMC1UNIT, 4 bits    |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mmcr1 {
    /// Indexed by counter, PMC1 first
    pub counters: [Mmcr1Counter; GENERAL_COUNTERS],
    pub fab_match: u8,
    pub ic_qual: bool,
    pub dc_qual: bool,
}

impl Mmcr1 {
    /// Fields of `pmc` (1-based, 1-4)
    pub fn counter_mut(&mut self, pmc: u8) -> Result<&mut Mmcr1Counter> {
        match pmc {
            1..=4 => Ok(&mut self.counters[pmc as usize - 1]),
            _ => Err(FieldError::NoSuchCounter {
                field: "MMCR1 selector",
                pmc,
            }),
        }
    }
}

impl RegisterLayout for Mmcr1 {
    fn to_raw(&self) -> u64 {
        let mut value = 0u64;

        for (pmc, counter) in (1u8..).zip(self.counters.iter()) {
            value |= (counter.unit as u64) << mmcr1::unit_shift(pmc);
            value |= (counter.combine as u64) << mmcr1::combine_shift(pmc);
            value |= (counter.pmcsel as u64) << mmcr1::pmcsel_shift(pmc);
        }

        value |= (self.fab_match as u64) << mmcr1::FAB_SHIFT;
        value |= (self.ic_qual as u64) << mmcr1::IC_QUAL_SHIFT;
        value |= (self.dc_qual as u64) << mmcr1::DC_QUAL_SHIFT;
        value
    }

    fn from_raw(value: u64) -> Self {
        let mut counters = [Mmcr1Counter::default(); GENERAL_COUNTERS];
        for (pmc, counter) in (1u8..).zip(counters.iter_mut()) {
            counter.unit = ((value >> mmcr1::unit_shift(pmc)) & 0xf) as u8;
            counter.combine = (value >> mmcr1::combine_shift(pmc)) & 1 != 0;
            counter.pmcsel = ((value >> mmcr1::pmcsel_shift(pmc)) & 0xff) as u8;
        }

        Self {
            counters,
            fab_match: ((value >> mmcr1::FAB_SHIFT) & 0xff) as u8,
            ic_qual: (value >> mmcr1::IC_QUAL_SHIFT) & 1 != 0,
            dc_qual: (value >> mmcr1::DC_QUAL_SHIFT) & 1 != 0,
        }
    }

    fn validate(&self) -> Result<()> {
        for counter in &self.counters {
            check_width("PMCxUNIT", counter.unit as u64, 4)?;
        }
        Ok(())
    }
}

/// MMCRA Register layout
///
/// ## Register Format
///
/// | Bits   | Field         | Description                    |
/// |--------|---------------|--------------------------------|
/// | 0      | sample_enable | Random sampling enable         |
/// | 1-2    | sample_mode   | RAND_SAMP_MODE                 |
/// | 4-6    | sample_elig   | RAND_SAMP_ELIG                 |
/// | 8-15   | thresh_ctl    | Threshold start/stop events    |
/// | 16-18  | thresh_sel    | Threshold select               |
/// | 32-41  | thresh_cmp    | Threshold compare              |
/// | 42-43  | sdar_mode     | SDAR update mode               |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mmcra {
    pub sample_enable: bool,
    pub sample_mode: u8,
    pub sample_elig: u8,
    pub thresh_ctl: u8,
    pub thresh_sel: u8,
    pub thresh_cmp: u16,
    pub sdar_mode: u8,
}

impl RegisterLayout for Mmcra {
    fn to_raw(&self) -> u64 {
        (if self.sample_enable { mmcra::SAMPLE_ENABLE } else { 0 })
            | ((self.sample_mode as u64) << mmcra::SAMP_MODE_SHIFT)
            | ((self.sample_elig as u64) << mmcra::SAMP_ELIG_SHIFT)
            | ((self.thresh_ctl as u64) << mmcra::THR_CTL_SHIFT)
            | ((self.thresh_sel as u64) << mmcra::THR_SEL_SHIFT)
            | ((self.thresh_cmp as u64) << mmcra::THR_CMP_SHIFT)
            | ((self.sdar_mode as u64) << mmcra::SDAR_MODE_SHIFT)
    }

    fn from_raw(value: u64) -> Self {
        Self {
            sample_enable: value & mmcra::SAMPLE_ENABLE != 0,
            sample_mode: ((value >> mmcra::SAMP_MODE_SHIFT) & 0x3) as u8,
            sample_elig: ((value >> mmcra::SAMP_ELIG_SHIFT) & 0x7) as u8,
            thresh_ctl: ((value >> mmcra::THR_CTL_SHIFT) & 0xff) as u8,
            thresh_sel: ((value >> mmcra::THR_SEL_SHIFT) & 0x7) as u8,
            thresh_cmp: ((value >> mmcra::THR_CMP_SHIFT) & 0x3ff) as u16,
            sdar_mode: ((value >> mmcra::SDAR_MODE_SHIFT) & 0x3) as u8,
        }
    }

    fn validate(&self) -> Result<()> {
        check_width("sample_mode", self.sample_mode as u64, 2)?;
        check_width("sample_elig", self.sample_elig as u64, 3)?;
        check_width("thresh_sel", self.thresh_sel as u64, 3)?;
        check_width("thresh_cmp", self.thresh_cmp as u64, 10)?;
        check_width("sdar_mode", self.sdar_mode as u64, 2)
    }
}
