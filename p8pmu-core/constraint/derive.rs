//! Per-event constraint derivation

use p8pmu_raw::current_arch::event::{codes, thresh_cmp_is_valid, EventCode};
use p8pmu_raw::current_arch::{GENERAL_COUNTERS, PMU_COUNTERS};

use super::packed::Constraint;
use super::usage::{ResourceUsage, ThresholdUse};
use crate::error::{PmuError, Result};

/// The only events allowed on PMC5 and PMC6
const HARDWIRED_EVENTS: [EventCode; 2] = [codes::PM_RUN_INST_CMPL, codes::PM_RUN_CYC];

/// Work out which resources `event` needs
///
/// Fails when the counter request is invalid, when the threshold compare
/// value is an illegal floating encoding, or when an L2/L3 event asks for a
/// cache selector other than zero. The selector for those units lives in
/// MMCRC, which only the hypervisor can write and initialises to zero.
pub fn derive_usage(event: EventCode) -> Result<ResourceUsage> {
    let pmc = event.pmc();
    let reject = |err: PmuError| {
        tracing::debug!("Rejecting event 0x{:x}: {}", event, err);
        Err(err)
    };

    let counter = if pmc == 0 {
        None
    } else if pmc as usize > PMU_COUNTERS
        || (pmc as usize > GENERAL_COUNTERS && !HARDWIRED_EVENTS.contains(&event))
    {
        return reject(PmuError::InvalidCounter {
            event: event.raw(),
            pmc,
        });
    } else {
        Some(pmc)
    };

    // Unassigned events still take a PMC1-4 slot once scheduled; PMC5/6
    // have exactly one event each and are accounted for above.
    let general_slot = pmc as usize <= GENERAL_COUNTERS;

    let l1_qualifier = if event.uses_shared_cache_unit() {
        if event.cache_sel() != 0 {
            return reject(PmuError::UnsupportedCacheSelector {
                event: event.raw(),
                unit: event.unit(),
                cache_sel: event.cache_sel(),
            });
        }
        None
    } else if event.is_l1() {
        Some(event.cache_sel() & 3)
    } else {
        None
    };

    let sample_mode = event.is_marked().then(|| event.sample());

    let threshold = if event.is_fab_match() {
        ThresholdUse::FabMatch(event.thresh_ctl())
    } else {
        let cmp = event.thresh_cmp();
        if !thresh_cmp_is_valid(cmp) {
            return reject(PmuError::InvalidThresholdEncoding {
                event: event.raw(),
                cmp,
            });
        }
        ThresholdUse::Window(event.threshold_window())
    };

    Ok(ResourceUsage {
        counter,
        general_slot,
        l1_qualifier,
        sample_mode,
        threshold,
    })
}

/// Packed constraint for `event`, as consumed by the scheduling framework
pub fn derive_constraint(event: EventCode) -> Result<Constraint> {
    let constraint = derive_usage(event)?.pack()?;
    tracing::trace!(
        "Event 0x{:x}: mask=0x{:016x} value=0x{:016x}",
        event,
        constraint.mask,
        constraint.value
    );
    Ok(constraint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use p8pmu_raw::current_arch::constraint::*;
    use p8pmu_raw::current_arch::event::EventFields;
    use p8pmu_raw::RegisterLayout;

    fn event(fields: EventFields) -> EventCode {
        EventCode(fields.to_raw())
    }

    #[test]
    fn test_cycles_constraint() {
        let c = derive_constraint(codes::PM_CYC).unwrap();
        assert_eq!(c.mask, CNST_NC_MASK | CNST_THRESH_MASK);
        assert_eq!(c.value, CNST_NC_VAL);
    }

    #[test]
    fn test_explicit_pmc_sets_adder() {
        for pmc in 1..=4u8 {
            let e = event(EventFields {
                pmc,
                psel: 0xf0,
                ..Default::default()
            });
            let c = derive_constraint(e).unwrap();
            assert_eq!(c.mask & cnst_pmc_mask(pmc), cnst_pmc_mask(pmc));
            assert_eq!(c.value & (cnst_pmc_val(pmc) | cnst_pmc_mask(pmc)), cnst_pmc_val(pmc));
            assert_eq!(c.value & CNST_NC_VAL, CNST_NC_VAL);
        }
    }

    #[test]
    fn test_hardwired_counters() {
        let c = derive_constraint(codes::PM_RUN_CYC).unwrap();
        assert_eq!(c.value & 0xfff, cnst_pmc_val(6));
        assert_eq!(c.mask & CNST_NC_MASK, 0);

        let c = derive_constraint(codes::PM_RUN_INST_CMPL).unwrap();
        assert_eq!(c.value & 0xfff, cnst_pmc_val(5));
        assert_eq!(c.value & CNST_NC_VAL, 0);
    }

    #[test]
    fn test_invalid_counters() {
        assert_eq!(
            derive_constraint(EventCode(0x700f4)),
            Err(PmuError::InvalidCounter {
                event: 0x700f4,
                pmc: 7
            })
        );
        assert!(matches!(
            derive_constraint(EventCode(0x500f4)),
            Err(PmuError::InvalidCounter { pmc: 5, .. })
        ));
        assert!(matches!(
            derive_constraint(EventCode(0x600fa | (1 << 8))),
            Err(PmuError::InvalidCounter { pmc: 6, .. })
        ));
        // Only the exact hardwired codes may use PMC5/6
        assert!(derive_constraint(EventCode(0x600fa)).is_err());
        assert!(derive_constraint(EventCode(0xf0000)).is_err());
    }

    #[test]
    fn test_shared_cache_units_need_zero_selector() {
        for unit in 6..=9u8 {
            for cache_sel in 1..=0xfu8 {
                let e = event(EventFields {
                    unit,
                    cache_sel,
                    psel: 0x80,
                    ..Default::default()
                });
                assert_eq!(
                    derive_constraint(e),
                    Err(PmuError::UnsupportedCacheSelector {
                        event: e.raw(),
                        unit,
                        cache_sel
                    })
                );
            }
            let ok = event(EventFields {
                unit,
                psel: 0x80,
                ..Default::default()
            });
            let c = derive_constraint(ok).unwrap();
            assert_eq!(c.mask & CNST_L1_QUAL_MASK, 0);
        }
    }

    #[test]
    fn test_l1_qualifier() {
        let e = event(EventFields {
            unit: 1,
            cache_sel: 0b0110,
            ..Default::default()
        });
        let c = derive_constraint(e).unwrap();
        assert_eq!(c.mask & CNST_L1_QUAL_MASK, CNST_L1_QUAL_MASK);
        assert_eq!(c.value & CNST_L1_QUAL_MASK, 0b10 << 22);

        let not_l1 = event(EventFields {
            unit: 1,
            cache_sel: 0b0011,
            ..Default::default()
        });
        assert_eq!(derive_constraint(not_l1).unwrap().mask & CNST_L1_QUAL_MASK, 0);
    }

    #[test]
    fn test_marked_sample_mode() {
        let e = event(EventFields {
            marked: true,
            sample: 0b10101,
            ..Default::default()
        });
        let usage = derive_usage(e).unwrap();
        assert_eq!(usage.sample_mode, Some(0b10101));
        let c = usage.pack().unwrap();
        assert_eq!(c.value & CNST_SAMPLE_MASK, 0b10101 << 16);

        let unmarked = event(EventFields {
            sample: 0b10101,
            ..Default::default()
        });
        assert_eq!(derive_usage(unmarked).unwrap().sample_mode, None);
    }

    #[test]
    fn test_fab_match_uses_match_field() {
        let e = EventCode(codes::PM_MRK_FAB_RSP_MATCH.raw() | (0xc7 << 32));
        let c = derive_constraint(e).unwrap();
        assert_eq!(c.mask & CNST_THRESH_MASK, 0);
        assert_eq!(c.mask & CNST_FAB_MATCH_MASK, CNST_FAB_MATCH_MASK);
        assert_eq!(c.value & CNST_FAB_MATCH_MASK, 0xc7 << 56);

        let plain = EventCode(0x30058 | (0xc7 << 32));
        let c = derive_constraint(plain).unwrap();
        assert_eq!(c.mask & CNST_FAB_MATCH_MASK, 0);
        assert_eq!(c.value & CNST_THRESH_MASK, (0xc7u64 << 3) << 32);
    }

    #[test]
    fn test_fab_match_skips_threshold_validation() {
        // exponent 1, mantissa 0: illegal as a threshold, ignored for FAB match
        let e = EventCode(codes::PM_MRK_FAB_RSP_MATCH_CYC.raw() | (0x80 << 40));
        assert!(derive_constraint(e).is_ok());
    }

    #[test]
    fn test_invalid_threshold_encoding() {
        let e = event(EventFields {
            thresh_cmp: (2 << 7) | 0x1f,
            ..Default::default()
        });
        assert_eq!(
            derive_constraint(e),
            Err(PmuError::InvalidThresholdEncoding {
                event: e.raw(),
                cmp: (2 << 7) | 0x1f
            })
        );

        let valid = event(EventFields {
            thresh_cmp: (2 << 7) | 0x40,
            thresh_ctl: 0x12,
            thresh_sel: 3,
            ..Default::default()
        });
        let c = derive_constraint(valid).unwrap();
        assert_eq!(c.value & CNST_THRESH_MASK, (valid.threshold_window() as u64) << 32);
    }
}
