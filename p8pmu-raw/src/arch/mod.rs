//! Architecture-specific register definitions
//!
//! Each POWER generation lays out its event codes and MMCR fields differently.
//! This module provides the definitions organised by processor generation.
//!
//! ## Supported Architectures
//!
//! - **POWER8** (`power8` feature) - ISA 2.07 server processors

#[cfg(feature = "power8")]
pub mod power8;
