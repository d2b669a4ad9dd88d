//! # p8pmu-raw
//!
//! Bit-level definitions for the IBM POWER8 Performance Monitoring Unit.
//!
//! This crate describes *where things live*: the fields of a raw event code,
//! the fields of the abstract constraint space used to detect scheduling
//! conflicts, and the layouts of the MMCR0, MMCR1 and MMCRA control registers.
//! It performs no I/O; the logic that consumes these layouts lives in
//! `p8pmu-core`.
//!
//! ## Features
//!
//! - `power8` (default) - POWER8 layouts
//!
//! ## Usage
//!
//! ```ignore
//! use p8pmu_raw::current_arch::event::EventCode;
//! use p8pmu_raw::current_arch::mmcr::Mmcra;
//! use p8pmu_raw::RegisterLayout;
//!
//! let event = EventCode(0x4f052);
//! assert!(event.is_fab_match());
//!
//! let mmcra = Mmcra {
//!     sample_enable: true,
//!     sample_mode: 0b01,
//!     ..Default::default()
//! };
//! mmcra.validate()?;
//! let raw = mmcra.to_raw();
//! ```

pub mod arch;
pub mod field;
pub mod register;

pub use field::{FieldError, Result};
pub use register::RegisterLayout;

// Export current architecture based on feature flag
#[cfg(feature = "power8")]
pub use arch::power8 as current_arch;
