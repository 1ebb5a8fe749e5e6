//! Configuration and mapping persistence
//!
//! Loads the panel configuration and the mapping document from flash,
//! falling back to the defaults compiled into the firmware.

pub mod loader;

pub use loader::{Persistence, StoreError};
