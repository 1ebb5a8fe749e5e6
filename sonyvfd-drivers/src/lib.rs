//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in sonyvfd-core:
//!
//! - PT6315 VFD controller over a bit-banged 3-wire bus
//! - Display facade rendering text and icons through the mapping

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod pt6315;

#[cfg(test)]
mod mock;

pub use display::VfdDisplay;
pub use pt6315::{BusError, Pt6315};
