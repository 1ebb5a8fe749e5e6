//! RP2040-specific HAL for the SonyVFD firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `sonyvfd-hal` traits, plus RP2040-specific functionality:
//!
//! - GPIO allocation by number for config-driven bus wiring
//! - UART console with a bounded keypress wait
//! - Flash storage driver (implements `sonyvfd_hal::FlashStorage`)

#![no_std]

pub mod console;
pub mod flash;
pub mod pins;

// Re-export shared traits from sonyvfd-hal for convenience
pub use sonyvfd_hal::{Console, FlashStorage as FlashStorageTrait, StorageKey};
