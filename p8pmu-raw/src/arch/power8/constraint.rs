//! Constraint space layout for POWER8
//!
//! Every event is mapped to a (mask, value) pair over this layout before it is
//! scheduled. The scheduling framework accumulates the values of a candidate
//! batch and detects conflicts with one masked comparison.
//!
//! ## Constraint Format
//!
//! | Bits   | Field      | Kind  | Description                            |
//! |--------|------------|-------|----------------------------------------|
//! | 0-11   | p1..p6     | adder | 2 bits per counter, high bit = error   |
//! | 12-15  | nc         | adder | number of PMC1-4 slots, bit 15 = error |
//! | 16-20  | sample     | value | Sampling mode of marked events         |
//! | 22-23  | l1_qual    | value | L1 I/D qualifier                       |
//! | 32-52  | thresh     | value | Threshold select, control and compare  |
//! | 56-63  | fab_match  | value | FAB match value                        |
//!
//! Adder fields accumulate by addition. For NC, counting up to four events
//! needs three bits and the fifth must overflow into the fourth, so the
//! field is biased by three through [`TEST_ADDER`].

use super::event::{EVENT_SAMPLE_MASK, EVENT_THRESH_MASK, EVENT_THR_CTL_MASK};

pub const CNST_FAB_MATCH_SHIFT: u32 = 56;
pub const CNST_FAB_MATCH_MASK: u64 = EVENT_THR_CTL_MASK << CNST_FAB_MATCH_SHIFT;

pub const CNST_THRESH_SHIFT: u32 = 32;
pub const CNST_THRESH_MASK: u64 = EVENT_THRESH_MASK << CNST_THRESH_SHIFT;

pub const CNST_L1_QUAL_SHIFT: u32 = 22;
pub const CNST_L1_QUAL_MASK: u64 = 3 << CNST_L1_QUAL_SHIFT;

pub const CNST_SAMPLE_SHIFT: u32 = 16;
pub const CNST_SAMPLE_MASK: u64 = EVENT_SAMPLE_MASK << CNST_SAMPLE_SHIFT;

pub const CNST_NC_SHIFT: u32 = 12;
pub const CNST_NC_VAL: u64 = 1 << CNST_NC_SHIFT;
pub const CNST_NC_MASK: u64 = 8 << CNST_NC_SHIFT;

/// Bias added before the masked comparison so a fifth NC event overflows
pub const TEST_ADDER: u64 = 3 << CNST_NC_SHIFT;

/// Bit offset of the two-bit adder field for `pmc` (1-based)
pub const fn cnst_pmc_shift(pmc: u8) -> u32 {
    (pmc as u32 - 1) * 2
}

/// Adder increment for `pmc` (1-based)
pub const fn cnst_pmc_val(pmc: u8) -> u64 {
    1 << cnst_pmc_shift(pmc)
}

/// Overflow bit for `pmc` (1-based)
pub const fn cnst_pmc_mask(pmc: u8) -> u64 {
    2 << cnst_pmc_shift(pmc)
}

pub const fn cnst_fab_match_val(v: u8) -> u64 {
    (v as u64) << CNST_FAB_MATCH_SHIFT
}

pub const fn cnst_thresh_val(window: u32) -> u64 {
    ((window as u64) & EVENT_THRESH_MASK) << CNST_THRESH_SHIFT
}

pub const fn cnst_l1_qual_val(cache_sel: u8) -> u64 {
    ((cache_sel as u64) & 3) << CNST_L1_QUAL_SHIFT
}

pub const fn cnst_sample_val(sample: u8) -> u64 {
    ((sample as u64) & EVENT_SAMPLE_MASK) << CNST_SAMPLE_SHIFT
}

/// Low bits of every adder field
pub const ADD_FIELDS: u64 = cnst_pmc_val(1)
    | cnst_pmc_val(2)
    | cnst_pmc_val(3)
    | cnst_pmc_val(4)
    | cnst_pmc_val(5)
    | cnst_pmc_val(6)
    | CNST_NC_VAL;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adder_constants() {
        assert_eq!(ADD_FIELDS, 0x1555);
        assert_eq!(TEST_ADDER, 0x3000);
        assert_eq!(CNST_NC_MASK, 0x8000);
        assert_eq!(cnst_pmc_mask(1), 0x2);
        assert_eq!(cnst_pmc_mask(6), 0x800);
    }

    #[test]
    fn test_fields_do_not_overlap() {
        let mut pmc_bits = 0u64;
        for pmc in 1..=6 {
            pmc_bits |= cnst_pmc_val(pmc) | cnst_pmc_mask(pmc);
        }
        let fields = [
            pmc_bits,
            CNST_NC_MASK | (7 << CNST_NC_SHIFT),
            CNST_SAMPLE_MASK,
            CNST_L1_QUAL_MASK,
            CNST_THRESH_MASK,
            CNST_FAB_MATCH_MASK,
        ];
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                assert_eq!(a & b, 0, "{a:#x} overlaps {b:#x}");
            }
        }
    }

    #[test]
    fn test_nc_bias_overflows_on_fifth_event() {
        for count in 1..=4u64 {
            assert_eq!((count * CNST_NC_VAL + TEST_ADDER) & CNST_NC_MASK, 0);
        }
        assert_ne!((5 * CNST_NC_VAL + TEST_ADDER) & CNST_NC_MASK, 0);
    }
}
