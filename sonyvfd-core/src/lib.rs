//! Board-agnostic core logic for the SonyVFD panel
//!
//! This crate contains everything that does not touch the hardware:
//!
//! - Controller geometry and (grid, bit) coordinate addressing
//! - Shadow framebuffer holding the controller's display RAM
//! - 14-segment font table
//! - Mapping model (icons and per-position segment maps) and its JSON document
//! - Panel configuration
//! - The `PanelDriver` trait implemented by the bus driver
//! - The interactive mapping editor state machine and its terminal view

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod editor;
pub mod font;
pub mod framebuffer;
pub mod geometry;
pub mod mapping;
pub mod traits;

pub use config::{ConfigError, PanelConfig};
pub use editor::{Editor, InputMode, Outcome, View};
pub use framebuffer::Framebuffer;
pub use geometry::{Coordinate, Geometry};
pub use mapping::{DocumentError, MapNameError, MappingData};
pub use traits::PanelDriver;
