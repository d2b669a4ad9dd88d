use p8pmu_raw::FieldError;
use thiserror::Error;

use crate::constraint::Conflict;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PmuError {
    #[error("Event 0x{event:x} requests invalid counter PMC{pmc}")]
    InvalidCounter { event: u64, pmc: u8 },

    #[error("Event 0x{event:x} has invalid threshold compare encoding 0x{cmp:x}")]
    InvalidThresholdEncoding { event: u64, cmp: u16 },

    #[error("Event 0x{event:x} sets cache selector 0x{cache_sel:x} on unit {unit}, only 0 is supported")]
    UnsupportedCacheSelector { event: u64, unit: u8, cache_sel: u8 },

    #[error("Event {index} (0x{event:x}) conflicts with the batch: {conflict}")]
    ResourceConflict {
        index: usize,
        event: u64,
        conflict: Conflict,
    },

    #[error("No free counter left for event 0x{event:x}")]
    CountersExhausted { event: u64 },

    #[error("Register field error: {0}")]
    Field(#[from] FieldError),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, PmuError>;
