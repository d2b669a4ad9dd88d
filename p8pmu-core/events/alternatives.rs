//! Interchangeable encodings of the same event
//!
//! When a batch does not fit, the scheduling framework retries with another
//! encoding of one of its events. Each row of the table below lists codes that
//! count the same thing with a different resource footprint.

use p8pmu_raw::current_arch::event::{codes, EventCode};

/// Longest alternatives list for any event, the event itself included
pub const MAX_ALTERNATIVES: usize = 3;

const ALT_COLUMNS: usize = MAX_ALTERNATIVES - 1;

/// Table of alternatives, sorted by column 0
static EVENT_ALTERNATIVES: [[u64; ALT_COLUMNS]; 11] = [
    [0x10134, 0x301e2], // PM_MRK_ST_CMPL
    [0x10138, 0x40138], // PM_BR_MRK_2PATH
    [0x18082, 0x3e05e], // PM_L3_CO_MEPF
    [0x1d14e, 0x401e8], // PM_MRK_DATA_FROM_L2MISS
    [0x1e054, 0x4000a], // PM_CMPLU_STALL
    [0x20036, 0x40036], // PM_BR_2PATH
    [0x200f2, 0x300f2], // PM_INST_DISP
    [0x200f4, 0x600f4], // PM_RUN_CYC
    [0x2013c, 0x3012e], // PM_MRK_FILT_MATCH
    [0x3e054, 0x400f0], // PM_LD_MISS_L1
    [0x400fa, 0x500fa], // PM_RUN_INST_CMPL
];

/// Codes that count the same thing while the run latch is set
const RUN_STATE_PAIRS: [(EventCode, EventCode); 2] = [
    (codes::PM_CYC, codes::PM_RUN_CYC),
    (codes::PM_INST_CMPL, codes::PM_RUN_INST_CMPL),
];

/// Row of the alternatives table containing `event` in any column
fn find_alternative(event: EventCode) -> Option<usize> {
    for (row, alts) in EVENT_ALTERNATIVES.iter().enumerate() {
        if event.raw() < alts[0] {
            break;
        }
        if alts.iter().take_while(|&&alt| alt != 0).any(|&alt| alt == event.raw()) {
            return Some(row);
        }
    }
    None
}

/// Fixed-capacity, de-duplicated list of event codes
///
/// The first entry is always the event the list was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternatives {
    codes: [EventCode; MAX_ALTERNATIVES],
    len: usize,
}

impl Alternatives {
    fn new(event: EventCode) -> Self {
        let mut codes = [EventCode::default(); MAX_ALTERNATIVES];
        codes[0] = event;
        Self { codes, len: 1 }
    }

    fn push(&mut self, code: EventCode) {
        if self.contains(code) {
            return;
        }
        if self.len == MAX_ALTERNATIVES {
            tracing::warn!("Dropping alternative 0x{:x}, list is full", code);
            return;
        }
        self.codes[self.len] = code;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[EventCode] {
        &self.codes[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventCode> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Never true; the queried event is always present
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, code: EventCode) -> bool {
        self.as_slice().contains(&code)
    }

    pub fn queried(&self) -> EventCode {
        self.codes[0]
    }
}

impl<'a> IntoIterator for &'a Alternatives {
    type Item = &'a EventCode;
    type IntoIter = std::slice::Iter<'a, EventCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Every code interchangeable with `event`, `event` first
///
/// With `only_count_run`, PM_CYC/PM_RUN_CYC and PM_INST_CMPL/PM_RUN_INST_CMPL
/// become interchangeable too. That pairing is applied once to the table
/// results, not repeated on what it adds.
pub fn alternatives_for(event: EventCode, only_count_run: bool) -> Alternatives {
    let mut alts = Alternatives::new(event);

    if let Some(row) = find_alternative(event) {
        for &alt in &EVENT_ALTERNATIVES[row] {
            if alt != 0 {
                alts.push(EventCode(alt));
            }
        }
    }

    if only_count_run {
        let found = alts;
        for &code in &found {
            for &(always, in_run) in &RUN_STATE_PAIRS {
                if code == always {
                    alts.push(in_run);
                } else if code == in_run {
                    alts.push(always);
                }
            }
        }
    }

    alts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_of(alts: &Alternatives) -> Vec<u64> {
        alts.iter().map(|code| code.raw()).collect()
    }

    #[test]
    fn test_table_is_sorted() {
        for pair in EVENT_ALTERNATIVES.windows(2) {
            assert!(pair[0][0] < pair[1][0]);
        }
    }

    #[test]
    fn test_no_alternatives() {
        let alts = alternatives_for(EventCode(0x12345), false);
        assert_eq!(codes_of(&alts), vec![0x12345]);
        assert_eq!(alts.queried(), EventCode(0x12345));
        assert!(!alts.is_empty());
    }

    #[test]
    fn test_lookup_either_column() {
        assert_eq!(codes_of(&alternatives_for(EventCode(0x1e054), false)), vec![0x1e054, 0x4000a]);
        assert_eq!(codes_of(&alternatives_for(EventCode(0x4000a), false)), vec![0x4000a, 0x1e054]);
        assert_eq!(codes_of(&alternatives_for(EventCode(0x301e2), false)), vec![0x301e2, 0x10134]);
    }

    #[test]
    fn test_run_state_pairing() {
        assert_eq!(codes_of(&alternatives_for(codes::PM_CYC, false)), vec![0x1e]);
        assert_eq!(codes_of(&alternatives_for(codes::PM_CYC, true)), vec![0x1e, 0x600f4]);
        assert_eq!(codes_of(&alternatives_for(codes::PM_INST_CMPL, true)), vec![0x2, 0x500fa]);
        assert_eq!(
            codes_of(&alternatives_for(EventCode(0x200f4), true)),
            vec![0x200f4, 0x600f4, 0x1e]
        );
        assert_eq!(
            codes_of(&alternatives_for(codes::PM_RUN_INST_CMPL, true)),
            vec![0x500fa, 0x400fa, 0x2]
        );
    }

    #[test]
    fn test_every_code_fits_and_is_deterministic() {
        let mut all: Vec<EventCode> = EVENT_ALTERNATIVES
            .iter()
            .flatten()
            .map(|&code| EventCode(code))
            .collect();
        all.extend([codes::PM_CYC, codes::PM_INST_CMPL]);

        for code in all {
            for only_count_run in [false, true] {
                let alts = alternatives_for(code, only_count_run);
                assert_eq!(alts.queried(), code);
                assert!(alts.len() <= MAX_ALTERNATIVES);
                let mut unique = codes_of(&alts);
                unique.sort_unstable();
                unique.dedup();
                assert_eq!(unique.len(), alts.len());
                assert_eq!(alts, alternatives_for(code, only_count_run));
            }
        }
    }
}
