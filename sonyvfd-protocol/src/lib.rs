//! Operator Console Protocol
//!
//! This crate defines the text protocol spoken between the operator's serial
//! terminal and the mapping tool running on the RP2040. The terminal is a
//! plain ANSI terminal; the device does all the line editing itself.
//!
//! # Protocol Overview
//!
//! ```text
//! UART bytes ──► KeyDecoder ──► Key ──► LineEditor ──► line ──► Command::parse
//!                                 │
//!                                 └──► (key mode) Key::command
//! ```
//!
//! Two input styles are supported:
//! - **Line mode**: the operator types a command such as `map d1_a` and
//!   presses Enter. An empty line means "next bit".
//! - **Key mode**: every keypress (including arrow keys, sent as ANSI escape
//!   sequences) is a command on its own.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod keys;
pub mod line;

pub use command::{Command, CommandError, MAX_NAME_LEN};
pub use events::Key;
pub use keys::{KeyDecoder, KEY_ESC_TIMEOUT_MS};
pub use line::{LineEditor, LineEvent, MAX_LINE_LEN};
