//! Typed per-event resource usage and the batch feasibility tally

use p8pmu_raw::current_arch::constraint::*;
use p8pmu_raw::current_arch::{GENERAL_COUNTERS, PMU_COUNTERS};
use p8pmu_raw::FieldError;
use thiserror::Error;

use super::packed::Constraint;

/// What an event occupies in the threshold/FAB match hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdUse {
    /// Threshold select, control and compare packed as a 21-bit window
    Window(u32),
    /// FAB response match byte (PM_MRK_FAB_RSP_MATCH{,_CYC} only)
    FabMatch(u8),
}

/// Resources one event needs once it is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceUsage {
    /// Explicit counter claim, 1-based
    pub counter: Option<u8>,
    /// Consumes one of the PMC1-4 slots (assigned or not)
    pub general_slot: bool,
    /// L1 I/D qualifier, two bits
    pub l1_qualifier: Option<u8>,
    /// Sampling mode of a marked event, five bits
    pub sample_mode: Option<u8>,
    pub threshold: ThresholdUse,
}

impl ResourceUsage {
    /// Pack into the (mask, value) form the scheduling framework adds up
    ///
    /// Fails if `counter` names a PMC outside 1-6.
    pub fn pack(&self) -> p8pmu_raw::Result<Constraint> {
        let mut mask = 0u64;
        let mut value = 0u64;

        if let Some(pmc) = self.counter {
            if !counter_exists(pmc) {
                return Err(FieldError::NoSuchCounter {
                    field: "constraint counter",
                    pmc,
                });
            }
            mask |= cnst_pmc_mask(pmc);
            value |= cnst_pmc_val(pmc);
        }

        if self.general_slot {
            mask |= CNST_NC_MASK;
            value |= CNST_NC_VAL;
        }

        if let Some(qual) = self.l1_qualifier {
            mask |= CNST_L1_QUAL_MASK;
            value |= cnst_l1_qual_val(qual);
        }

        if let Some(sample) = self.sample_mode {
            mask |= CNST_SAMPLE_MASK;
            value |= cnst_sample_val(sample);
        }

        match self.threshold {
            ThresholdUse::FabMatch(byte) => {
                mask |= CNST_FAB_MATCH_MASK;
                value |= cnst_fab_match_val(byte);
            }
            ThresholdUse::Window(window) => {
                mask |= CNST_THRESH_MASK;
                value |= cnst_thresh_val(window);
            }
        }

        Ok(Constraint { mask, value })
    }
}

fn counter_exists(pmc: u8) -> bool {
    (1..=PMU_COUNTERS).contains(&(pmc as usize))
}

/// Why an event cannot join a batch
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    #[error("PMC{pmc} does not exist")]
    NoSuchCounter { pmc: u8 },

    #[error("PMC{pmc} is already claimed")]
    CounterTaken { pmc: u8 },

    #[error("more than {capacity} events need PMC1-4")]
    TooManyEvents { capacity: usize },

    #[error("L1 qualifier {event:#x} differs from {batch:#x}")]
    L1Qualifier { batch: u8, event: u8 },

    #[error("sampling mode {event:#x} differs from {batch:#x}")]
    SampleMode { batch: u8, event: u8 },

    #[error("threshold window {event:#x} differs from {batch:#x}")]
    ThresholdWindow { batch: u32, event: u32 },

    #[error("FAB match {event:#x} differs from {batch:#x}")]
    FabMatch { batch: u8, event: u8 },
}


/// Shared value fields must agree across the batch
fn agree<T: Copy + PartialEq>(
    slot: &mut Option<T>,
    wanted: Option<T>,
    conflict: impl FnOnce(T, T) -> Conflict,
) -> Result<(), Conflict> {
    match (*slot, wanted) {
        (Some(batch), Some(event)) if batch != event => Err(conflict(batch, event)),
        (None, Some(event)) => {
            *slot = Some(event);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Running resource totals for a candidate batch
///
/// Each counter may be claimed once and at most four events may occupy
/// PMC1-4. Value fields must match exactly between the events that set them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageTally {
    claims: [u8; PMU_COUNTERS],
    general_slots: usize,
    l1_qualifier: Option<u8>,
    sample_mode: Option<u8>,
    threshold_window: Option<u32>,
    fab_match: Option<u8>,
}

impl UsageTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one event; on conflict the tally is left unchanged
    pub fn add(&mut self, usage: &ResourceUsage) -> Result<(), Conflict> {
        let mut next = self.clone();

        if let Some(pmc) = usage.counter {
            if !counter_exists(pmc) {
                return Err(Conflict::NoSuchCounter { pmc });
            }
            let claims = &mut next.claims[pmc as usize - 1];
            if *claims != 0 {
                return Err(Conflict::CounterTaken { pmc });
            }
            *claims += 1;
        }

        if usage.general_slot {
            if next.general_slots == GENERAL_COUNTERS {
                return Err(Conflict::TooManyEvents {
                    capacity: GENERAL_COUNTERS,
                });
            }
            next.general_slots += 1;
        }

        agree(&mut next.l1_qualifier, usage.l1_qualifier, |batch, event| {
            Conflict::L1Qualifier { batch, event }
        })?;
        agree(&mut next.sample_mode, usage.sample_mode, |batch, event| {
            Conflict::SampleMode { batch, event }
        })?;

        match usage.threshold {
            ThresholdUse::Window(window) => {
                agree(&mut next.threshold_window, Some(window), |batch, event| {
                    Conflict::ThresholdWindow { batch, event }
                })?
            }
            ThresholdUse::FabMatch(byte) => {
                agree(&mut next.fab_match, Some(byte), |batch, event| {
                    Conflict::FabMatch { batch, event }
                })?
            }
        }

        *self = next;
        Ok(())
    }

    /// Number of events occupying PMC1-4
    pub fn general_slots(&self) -> usize {
        self.general_slots
    }

    /// Whether `pmc` (1-based) has been claimed explicitly
    pub fn is_claimed(&self, pmc: u8) -> bool {
        counter_exists(pmc) && self.claims[pmc as usize - 1] != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(counter: Option<u8>) -> ResourceUsage {
        ResourceUsage {
            counter,
            general_slot: counter.map_or(true, |pmc| pmc <= 4),
            l1_qualifier: None,
            sample_mode: None,
            threshold: ThresholdUse::Window(0),
        }
    }

    #[test]
    fn test_pack_plain_event() {
        let c = plain(Some(2)).pack().unwrap();
        assert_eq!(c.mask, cnst_pmc_mask(2) | CNST_NC_MASK | CNST_THRESH_MASK);
        assert_eq!(c.value, cnst_pmc_val(2) | CNST_NC_VAL);
    }

    #[test]
    fn test_pack_fab_match() {
        let usage = ResourceUsage {
            threshold: ThresholdUse::FabMatch(0x5a),
            ..plain(Some(3))
        };
        let c = usage.pack().unwrap();
        assert_eq!(c.mask & CNST_THRESH_MASK, 0);
        assert_eq!(c.mask & CNST_FAB_MATCH_MASK, CNST_FAB_MATCH_MASK);
        assert_eq!(c.value >> 56, 0x5a);
    }

    #[test]
    fn test_tally_counter_claimed_twice() {
        let mut tally = UsageTally::new();
        tally.add(&plain(Some(3))).unwrap();
        assert!(tally.is_claimed(3));
        assert_eq!(
            tally.add(&plain(Some(3))),
            Err(Conflict::CounterTaken { pmc: 3 })
        );
        assert_eq!(tally.general_slots(), 1);
    }

    #[test]
    fn test_tally_general_slot_capacity() {
        let mut tally = UsageTally::new();
        for _ in 0..GENERAL_COUNTERS {
            tally.add(&plain(None)).unwrap();
        }
        assert_eq!(
            tally.add(&plain(None)),
            Err(Conflict::TooManyEvents { capacity: 4 })
        );
        // PMC5/6 events do not need a general slot
        tally.add(&plain(Some(5))).unwrap();
        tally.add(&plain(Some(6))).unwrap();
    }

    #[test]
    fn test_tally_value_fields_must_agree() {
        let mut tally = UsageTally::new();
        let marked = |mode| ResourceUsage {
            sample_mode: Some(mode),
            ..plain(None)
        };
        tally.add(&marked(0x15)).unwrap();
        tally.add(&marked(0x15)).unwrap();
        tally.add(&plain(None)).unwrap();
        assert_eq!(
            tally.add(&marked(0x3)),
            Err(Conflict::SampleMode {
                batch: 0x15,
                event: 0x3
            })
        );
        assert_eq!(tally.general_slots(), 3);
    }

    #[test]
    fn test_tally_threshold_and_fab_match_are_separate() {
        let mut tally = UsageTally::new();
        tally
            .add(&ResourceUsage {
                threshold: ThresholdUse::FabMatch(0x11),
                ..plain(None)
            })
            .unwrap();
        tally
            .add(&ResourceUsage {
                threshold: ThresholdUse::Window(0x200),
                ..plain(None)
            })
            .unwrap();
        let err = tally
            .add(&ResourceUsage {
                threshold: ThresholdUse::Window(0x100),
                ..plain(None)
            })
            .unwrap_err();
        assert!(err.to_string().contains("threshold window"));
    }

    #[test]
    fn test_nonexistent_counter_is_rejected() {
        for pmc in [0u8, 7, 15] {
            assert_eq!(
                plain(Some(pmc)).pack(),
                Err(FieldError::NoSuchCounter {
                    field: "constraint counter",
                    pmc
                })
            );

            let mut tally = UsageTally::new();
            assert_eq!(
                tally.add(&plain(Some(pmc))),
                Err(Conflict::NoSuchCounter { pmc })
            );
            assert_eq!(tally, UsageTally::new());
            assert!(!tally.is_claimed(pmc));
        }
    }
}
