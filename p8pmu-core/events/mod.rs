pub mod alternatives;
pub mod generic;

pub use alternatives::{alternatives_for, Alternatives, MAX_ALTERNATIVES};
pub use generic::{named_event, GenericEvent, NAMED_EVENTS};

use p8pmu_raw::current_arch::event::EventCode;

use crate::error::{PmuError, Result};

/// Parse an event given as hex (`0x600f4`), decimal, a generic name
/// (`cycles`) or a native name (`PM_RUN_CYC`)
pub fn parse_event(text: &str) -> Result<EventCode> {
    let text = text.trim();

    if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        return u64::from_str_radix(&hex.replace('_', ""), 16)
            .map(EventCode)
            .map_err(|e| PmuError::ParseError(format!("Invalid hex event '{text}': {e}")));
    }

    if let Ok(value) = text.parse::<u64>() {
        return Ok(EventCode(value));
    }

    GenericEvent::from_name(text)
        .map(|event| event.event_code())
        .or_else(|| named_event(text))
        .ok_or_else(|| PmuError::ParseError(format!("Unknown event '{text}'")))
}

/// Parse several events, failing on the first bad one
pub fn parse_events<S: AsRef<str>>(texts: &[S]) -> Result<Vec<EventCode>> {
    texts.iter().map(|text| parse_event(text.as_ref())).collect()
}
