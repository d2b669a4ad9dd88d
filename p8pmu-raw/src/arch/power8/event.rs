//! Raw event code layout for POWER8
//!
//! ## Event Format
//!
//! | Bits   | Field       | Description                                   |
//! |--------|-------------|-----------------------------------------------|
//! | 0-7    | psel        | PMCxSEL, event selector within the unit       |
//! | 8      | marked      | Marked (sampled) event                        |
//! | 11     | combine     | PMCxCOMB                                      |
//! | 12-15  | unit        | PMCxUNIT                                      |
//! | 16-19  | pmc         | Counter number, 1-based, 0 = any              |
//! | 20-23  | cache_sel   | L1/L2/L3 cache select                         |
//! | 24-28  | sample      | Sampling mode for marked events               |
//! | 29-31  | thresh_sel  | Threshold select                              |
//! | 32-39  | thresh_ctl  | Threshold start/stop, or FAB match value      |
//! | 40-49  | thresh_cmp  | Threshold compare (3-bit exp, 7-bit mantissa) |

use crate::field::{check_width, extract, Result};
use crate::register::RegisterLayout;

pub const EVENT_PSEL_MASK: u64 = 0xff;
pub const EVENT_MARKED_SHIFT: u32 = 8;
pub const EVENT_MARKED_MASK: u64 = 0x1;
pub const EVENT_COMBINE_SHIFT: u32 = 11;
pub const EVENT_COMBINE_MASK: u64 = 0x1;
pub const EVENT_UNIT_SHIFT: u32 = 12;
pub const EVENT_UNIT_MASK: u64 = 0xf;
pub const EVENT_PMC_SHIFT: u32 = 16;
pub const EVENT_PMC_MASK: u64 = 0xf;
pub const EVENT_CACHE_SEL_SHIFT: u32 = 20;
pub const EVENT_CACHE_SEL_MASK: u64 = 0xf;
pub const EVENT_SAMPLE_SHIFT: u32 = 24;
pub const EVENT_SAMPLE_MASK: u64 = 0x1f;
pub const EVENT_THR_SEL_SHIFT: u32 = 29;
pub const EVENT_THR_SEL_MASK: u64 = 0x7;
pub const EVENT_THR_CTL_SHIFT: u32 = 32;
pub const EVENT_THR_CTL_MASK: u64 = 0xff;
pub const EVENT_THR_CMP_SHIFT: u32 = 40;
pub const EVENT_THR_CMP_MASK: u64 = 0x3ff;

/// All threshold bits (select, control and compare) as one window
pub const EVENT_THRESH_SHIFT: u32 = 29;
pub const EVENT_THRESH_MASK: u64 = 0x1f_ffff;

/// Set for L1 cache events (cache_sel bit 2)
pub const EVENT_IS_L1: u64 = 4 << EVENT_CACHE_SEL_SHIFT;
pub const EVENT_IS_MARKED: u64 = EVENT_MARKED_MASK << EVENT_MARKED_SHIFT;

/// pmc, unit and psel without the edge bit (bit 0)
const FAB_MATCH_SELECT_MASK: u64 = 0xff0fe;

/// Units whose cache selector lives in MMCRC (L2 and L3 banks)
pub const SHARED_CACHE_UNITS: std::ops::RangeInclusive<u8> = 6..=9;

/// Well-known POWER8 event codes
pub mod codes {
    use super::EventCode;

    pub const PM_CYC: EventCode = EventCode(0x0001e);
    pub const PM_INST_CMPL: EventCode = EventCode(0x00002);
    pub const PM_GCT_NOSLOT_CYC: EventCode = EventCode(0x100f8);
    pub const PM_CMPLU_STALL: EventCode = EventCode(0x4000a);
    pub const PM_BRU_FIN: EventCode = EventCode(0x10068);
    pub const PM_BR_MPRED_CMPL: EventCode = EventCode(0x400f6);

    /// Hardwired to PMC5
    pub const PM_RUN_INST_CMPL: EventCode = EventCode(0x500fa);
    /// Hardwired to PMC6
    pub const PM_RUN_CYC: EventCode = EventCode(0x600f4);

    pub const PM_MRK_FAB_RSP_MATCH: EventCode = EventCode(0x30056);
    pub const PM_MRK_FAB_RSP_MATCH_CYC: EventCode = EventCode(0x4f052);
}

/// A raw POWER8 event code
///
/// Decoding never fails: out-of-range bit patterns decode to out-of-range
/// field values and are judged by whoever consumes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventCode(pub u64);

impl EventCode {
    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn psel(self) -> u8 {
        (self.0 & EVENT_PSEL_MASK) as u8
    }

    pub const fn is_marked(self) -> bool {
        self.0 & EVENT_IS_MARKED != 0
    }

    pub const fn combine(self) -> u8 {
        extract(self.0, EVENT_COMBINE_SHIFT, EVENT_COMBINE_MASK) as u8
    }

    pub const fn unit(self) -> u8 {
        extract(self.0, EVENT_UNIT_SHIFT, EVENT_UNIT_MASK) as u8
    }

    /// Requested counter, 1-based; 0 when any counter will do
    pub const fn pmc(self) -> u8 {
        extract(self.0, EVENT_PMC_SHIFT, EVENT_PMC_MASK) as u8
    }

    pub const fn cache_sel(self) -> u8 {
        extract(self.0, EVENT_CACHE_SEL_SHIFT, EVENT_CACHE_SEL_MASK) as u8
    }

    pub const fn is_l1(self) -> bool {
        self.0 & EVENT_IS_L1 != 0
    }

    pub const fn sample(self) -> u8 {
        extract(self.0, EVENT_SAMPLE_SHIFT, EVENT_SAMPLE_MASK) as u8
    }

    pub const fn thresh_sel(self) -> u8 {
        extract(self.0, EVENT_THR_SEL_SHIFT, EVENT_THR_SEL_MASK) as u8
    }

    pub const fn thresh_ctl(self) -> u8 {
        extract(self.0, EVENT_THR_CTL_SHIFT, EVENT_THR_CTL_MASK) as u8
    }

    pub const fn thresh_cmp(self) -> u16 {
        extract(self.0, EVENT_THR_CMP_SHIFT, EVENT_THR_CMP_MASK) as u16
    }

    /// Select, control and compare packed as one 21-bit window
    pub const fn threshold_window(self) -> u32 {
        extract(self.0, EVENT_THRESH_SHIFT, EVENT_THRESH_MASK) as u32
    }

    /// Whether the unit is an L2/L3 bank with its selector in MMCRC
    pub fn uses_shared_cache_unit(self) -> bool {
        SHARED_CACHE_UNITS.contains(&self.unit())
    }

    /// PM_MRK_FAB_RSP_MATCH or PM_MRK_FAB_RSP_MATCH_CYC
    ///
    /// These two events carry a fabric response match value in the threshold
    /// control bits instead of a threshold start/stop pair.
    pub const fn is_fab_match(self) -> bool {
        let select = self.0 & FAB_MATCH_SELECT_MASK;
        select == codes::PM_MRK_FAB_RSP_MATCH.0 || select == codes::PM_MRK_FAB_RSP_MATCH_CYC.0
    }

    /// Decode every field at once
    pub fn fields(self) -> EventFields {
        EventFields::from_raw(self.0)
    }
}

impl From<u64> for EventCode {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::LowerHex for EventCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Check a threshold compare value against the floating encoding rules
///
/// The mantissa's upper two bits must not both be zero unless the exponent
/// is also zero.
pub const fn thresh_cmp_is_valid(cmp: u16) -> bool {
    let exp = cmp >> 7;
    exp == 0 || (cmp & 0x60) != 0
}

/// Decoded event code fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFields {
    /// PMCxSEL (bits 0-7)
    pub psel: u8,

    /// Marked event (bit 8)
    pub marked: bool,

    /// Combine (bit 11)
    pub combine: bool,

    /// Unit (bits 12-15)
    pub unit: u8,

    /// Counter, 1-based (bits 16-19)
    pub pmc: u8,

    /// Cache select (bits 20-23)
    pub cache_sel: u8,

    /// Sampling mode (bits 24-28)
    pub sample: u8,

    /// Threshold select (bits 29-31)
    pub thresh_sel: u8,

    /// Threshold control or FAB match (bits 32-39)
    pub thresh_ctl: u8,

    /// Threshold compare (bits 40-49)
    pub thresh_cmp: u16,
}

impl RegisterLayout for EventFields {
    fn to_raw(&self) -> u64 {
        (self.psel as u64)
            | (if self.marked { EVENT_IS_MARKED } else { 0 })
            | (if self.combine { 1 << EVENT_COMBINE_SHIFT } else { 0 })
            | ((self.unit as u64) << EVENT_UNIT_SHIFT)
            | ((self.pmc as u64) << EVENT_PMC_SHIFT)
            | ((self.cache_sel as u64) << EVENT_CACHE_SEL_SHIFT)
            | ((self.sample as u64) << EVENT_SAMPLE_SHIFT)
            | ((self.thresh_sel as u64) << EVENT_THR_SEL_SHIFT)
            | ((self.thresh_ctl as u64) << EVENT_THR_CTL_SHIFT)
            | ((self.thresh_cmp as u64) << EVENT_THR_CMP_SHIFT)
    }

    fn from_raw(value: u64) -> Self {
        let code = EventCode(value);
        Self {
            psel: code.psel(),
            marked: code.is_marked(),
            combine: code.combine() != 0,
            unit: code.unit(),
            pmc: code.pmc(),
            cache_sel: code.cache_sel(),
            sample: code.sample(),
            thresh_sel: code.thresh_sel(),
            thresh_ctl: code.thresh_ctl(),
            thresh_cmp: code.thresh_cmp(),
        }
    }

    fn validate(&self) -> Result<()> {
        check_width("unit", self.unit as u64, 4)?;
        check_width("pmc", self.pmc as u64, 4)?;
        check_width("cache_sel", self.cache_sel as u64, 4)?;
        check_width("sample", self.sample as u64, 5)?;
        check_width("thresh_sel", self.thresh_sel as u64, 3)?;
        check_width("thresh_cmp", self.thresh_cmp as u64, 10)
    }
}

impl EventFields {
    pub fn code(&self) -> EventCode {
        EventCode(self.to_raw())
    }
}
