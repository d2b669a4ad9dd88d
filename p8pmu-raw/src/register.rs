//! Generic register abstractions for type-safe SPR programming

use crate::field::Result;

/// Trait for register layouts that can be converted to/from raw SPR values
///
/// This trait provides type-safe conversion between structured register
/// layouts and the raw 64-bit values that the caller eventually moves into
/// the special purpose registers.
///
/// # Example
///
/// ```ignore
/// use p8pmu_raw::field::{check_width, Result};
/// use p8pmu_raw::register::RegisterLayout;
///
/// #[derive(Debug, Default)]
/// struct MyControl {
///     freeze: bool,
///     mode: u8,
/// }
///
/// impl RegisterLayout for MyControl {
///     fn to_raw(&self) -> u64 {
///         (if self.freeze { 1 } else { 0 }) | ((self.mode as u64) << 4)
///     }
///
///     fn from_raw(value: u64) -> Self {
///         Self {
///             freeze: (value & 1) != 0,
///             mode: ((value >> 4) & 0x3) as u8,
///         }
///     }
///
///     fn validate(&self) -> Result<()> {
///         check_width("mode", self.mode as u64, 2)
///     }
/// }
/// ```
pub trait RegisterLayout: Sized {
    /// Convert this register layout to a raw 64-bit value
    fn to_raw(&self) -> u64;

    /// Parse a raw 64-bit value into this register layout
    fn from_raw(value: u64) -> Self;

    /// Validate that every field fits within its bit width
    ///
    /// `to_raw` does not mask its inputs, so an oversized field would spill
    /// into its neighbours. Call this before trusting the raw value.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
