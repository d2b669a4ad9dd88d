//! Generic (cross-machine) event names and their POWER8 encodings

use std::collections::HashMap;

use once_cell::sync::Lazy;
use p8pmu_raw::current_arch::event::{codes, EventCode};

use crate::enum_with_data;

enum_with_data! {
    pub enum GenericEvent: EventCode {
        CpuCycles => ("cycles", codes::PM_CYC),
        StalledCyclesFrontend => ("stalled-cycles-frontend", codes::PM_GCT_NOSLOT_CYC),
        StalledCyclesBackend => ("stalled-cycles-backend", codes::PM_CMPLU_STALL),
        Instructions => ("instructions", codes::PM_INST_CMPL),
        BranchInstructions => ("branch-instructions", codes::PM_BRU_FIN),
        BranchMisses => ("branch-misses", codes::PM_BR_MPRED_CMPL),
    }
    impl event_code -> EventCode
}

static BY_NAME: Lazy<HashMap<&'static str, GenericEvent>> = Lazy::new(|| {
    GenericEvent::all()
        .into_iter()
        .map(|event| (event.name(), event))
        .collect()
});

impl GenericEvent {
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }
}

/// Native events that can be referred to by name
pub const NAMED_EVENTS: &[(&str, EventCode)] = &[
    ("PM_CYC", codes::PM_CYC),
    ("PM_INST_CMPL", codes::PM_INST_CMPL),
    ("PM_GCT_NOSLOT_CYC", codes::PM_GCT_NOSLOT_CYC),
    ("PM_CMPLU_STALL", codes::PM_CMPLU_STALL),
    ("PM_BRU_FIN", codes::PM_BRU_FIN),
    ("PM_BR_MPRED_CMPL", codes::PM_BR_MPRED_CMPL),
    ("PM_RUN_INST_CMPL", codes::PM_RUN_INST_CMPL),
    ("PM_RUN_CYC", codes::PM_RUN_CYC),
    ("PM_MRK_FAB_RSP_MATCH", codes::PM_MRK_FAB_RSP_MATCH),
    ("PM_MRK_FAB_RSP_MATCH_CYC", codes::PM_MRK_FAB_RSP_MATCH_CYC),
];

pub fn named_event(name: &str) -> Option<EventCode> {
    NAMED_EVENTS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}
