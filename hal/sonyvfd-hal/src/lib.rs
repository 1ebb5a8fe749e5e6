//! SonyVFD Hardware Abstraction Layer
//!
//! This crate defines the capabilities the firmware consumes from the
//! board, so the application code does not name a chip directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (sonyvfd-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sonyvfd-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ sonyvfd-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::FlashStorage`] - Persistent key-value storage
//! - [`console::Console`] - Operator terminal (byte in, text out)
//!
//! The VFD bus itself uses the `embedded-hal` `OutputPin` and `DelayNs`
//! traits directly.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod console;
pub mod flash;

// Re-export key traits at crate root for convenience
pub use console::{Console, ConsoleError};
pub use flash::{FlashError, FlashStorage, StorageKey};
