//! Packed (mask, value) constraints and the additive conflict check

use p8pmu_raw::current_arch::constraint::{ADD_FIELDS, TEST_ADDER};

/// One event's constraint over the packed constraint space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraint {
    pub mask: u64,
    pub value: u64,
}

/// Accumulates packed constraints the way the scheduling framework does
///
/// Adder fields are summed (`(value | v) + (value & v & add_fields)`), value
/// fields are OR-ed, and after biasing with `test_adder` the result must
/// still agree with everything accumulated so far and with the new event
/// under their masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintAccumulator {
    mask: u64,
    value: u64,
    add_fields: u64,
    test_adder: u64,
}

impl Default for ConstraintAccumulator {
    fn default() -> Self {
        Self::new(ADD_FIELDS, TEST_ADDER)
    }
}

impl ConstraintAccumulator {
    pub fn new(add_fields: u64, test_adder: u64) -> Self {
        Self {
            mask: 0,
            value: 0,
            add_fields,
            test_adder,
        }
    }

    /// Try to add one event; returns false and leaves the state untouched
    /// if it conflicts
    pub fn try_add(&mut self, c: Constraint) -> bool {
        let nv = (self.value | c.value)
            .wrapping_add(self.value & c.value & self.add_fields);
        let biased = nv.wrapping_add(self.test_adder);

        if ((biased ^ self.value) & self.mask) != 0 || ((biased ^ c.value) & c.mask) != 0 {
            tracing::trace!(
                "Packed conflict: nv=0x{:016x} mask=0x{:016x} c.mask=0x{:016x}",
                nv,
                self.mask,
                c.mask
            );
            return false;
        }

        self.value = nv;
        self.mask |= c.mask;
        true
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}
