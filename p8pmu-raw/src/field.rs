//! Field extraction helpers and the error type for field validation

pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors raised when a typed layout cannot be represented in raw form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Value 0x{value:X} does not fit in {width}-bit field {field}")]
    Overflow {
        field: &'static str,
        value: u64,
        width: u32,
    },

    #[error("Counter PMC{pmc} has no {field} field")]
    NoSuchCounter { field: &'static str, pmc: u8 },
}

/// Extract `mask`-wide field starting at `shift`
#[inline]
pub const fn extract(value: u64, shift: u32, mask: u64) -> u64 {
    (value >> shift) & mask
}

/// Check that `value` fits in `width` bits
pub fn check_width(field: &'static str, value: u64, width: u32) -> Result<()> {
    if width < 64 && value >> width != 0 {
        return Err(FieldError::Overflow {
            field,
            value,
            width,
        });
    }
    Ok(())
}
