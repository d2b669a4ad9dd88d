// Macros (must be first for visibility)
#[macro_use]
pub mod macros;

pub mod config;
pub mod constraint;
pub mod error;
pub mod events;
pub mod placement;
pub mod pmu;

pub use config::{CountingScope, PmuConfig, SdarMode};
pub use constraint::{check_batch, derive_constraint, derive_usage, Constraint};
pub use error::{PmuError, Result};
pub use events::{alternatives_for, parse_event, parse_events, Alternatives, GenericEvent};
pub use placement::{compute_registers, disable_counter, MmcrSet, Placement};
pub use pmu::{PmuFlags, Power8Pmu, PowerPmu};

pub use p8pmu_raw::current_arch::event::EventCode;
