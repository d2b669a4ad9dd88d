//! Constraint derivation and batch feasibility
//!
//! Every event maps to a [`ResourceUsage`]; its packed [`Constraint`] form is
//! what the scheduling framework adds up. [`UsageTally`] answers the same
//! feasibility question with per-resource counters and names the resource
//! that ran out.

mod derive;
mod packed;
mod usage;

pub use derive::{derive_constraint, derive_usage};
pub use packed::{Constraint, ConstraintAccumulator};
pub use usage::{Conflict, ResourceUsage, ThresholdUse, UsageTally};

use p8pmu_raw::current_arch::event::EventCode;

use crate::error::{PmuError, Result};

/// Check that `events` can all be counted at once
///
/// Returns the first per-event derivation error, or the first event that
/// does not fit alongside the ones before it.
pub fn check_batch(events: &[EventCode]) -> Result<UsageTally> {
    let mut tally = UsageTally::new();

    for (index, &event) in events.iter().enumerate() {
        let usage = derive_usage(event)?;
        if let Err(conflict) = tally.add(&usage) {
            tracing::debug!("Event {} (0x{:x}) does not fit: {}", index, event, conflict);
            return Err(PmuError::ResourceConflict {
                index,
                event: event.raw(),
                conflict,
            });
        }
    }

    Ok(tally)
}
