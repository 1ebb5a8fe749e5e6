//! ANSI keypress decoding
//!
//! Turns the raw byte stream from a terminal into [`Key`]s. Arrow keys arrive
//! as escape sequences (`ESC [ A` .. `ESC [ D`, or `ESC O A` .. in
//! application cursor mode), which makes a lone Escape keypress ambiguous
//! until either more bytes arrive or the line goes quiet. The caller resolves
//! that by waiting up to [`KEY_ESC_TIMEOUT_MS`] for the next byte and calling
//! [`KeyDecoder::timeout`] if none comes.

use heapless::Vec;

use crate::events::Key;

/// How long to wait after ESC before treating it as a lone keypress
pub const KEY_ESC_TIMEOUT_MS: u64 = 50;

const ESC: u8 = 0x1B;
const CR: u8 = 0x0D;
const LF: u8 = 0x0A;

/// Keys produced by one fed byte (at most two: a flushed Escape plus the byte)
pub type Keys = Vec<Key, 2>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Plain bytes
    Ground,
    /// Got ESC
    Escape,
    /// Got `ESC [` or `ESC O`, skipping parameter bytes until the final byte
    Sequence,
}

/// State machine decoding terminal bytes into keys
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    state: DecodeState,
    /// Previous byte was CR (swallow the LF of a CR LF pair)
    after_cr: bool,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self {
            state: DecodeState::Ground,
            after_cr: false,
        }
    }

    /// Reset to the ground state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = DecodeState::Ground;
        self.after_cr = false;
    }

    /// True while an escape sequence is partially received
    ///
    /// The caller should apply the ESC timeout to the next read.
    pub fn is_pending(&self) -> bool {
        self.state != DecodeState::Ground
    }

    /// Feed a single byte
    pub fn feed(&mut self, byte: u8) -> Keys {
        let mut keys = Keys::new();
        let after_cr = core::mem::replace(&mut self.after_cr, byte == CR);

        match self.state {
            DecodeState::Ground => {
                if byte == ESC {
                    self.state = DecodeState::Escape;
                } else if byte == LF && after_cr {
                    // Second half of CR LF
                } else if let Some(key) = Key::from_byte(byte) {
                    let _ = keys.push(key);
                }
            }
            DecodeState::Escape => match byte {
                b'[' | b'O' => self.state = DecodeState::Sequence,
                ESC => {
                    // ESC ESC: the first one was a lone keypress
                    let _ = keys.push(Key::Escape);
                }
                _ => {
                    // ESC followed by an ordinary byte: deliver both
                    self.state = DecodeState::Ground;
                    let _ = keys.push(Key::Escape);
                    if let Some(key) = Key::from_byte(byte) {
                        let _ = keys.push(key);
                    }
                }
            },
            DecodeState::Sequence => match byte {
                // Parameter and intermediate bytes (e.g. `1;5` in `ESC [ 1 ; 5 A`)
                0x20..=0x3F => {}
                // Final byte
                0x40..=0x7E => {
                    self.state = DecodeState::Ground;
                    let key = match byte {
                        b'A' => Some(Key::Up),
                        b'B' => Some(Key::Down),
                        b'C' => Some(Key::Right),
                        b'D' => Some(Key::Left),
                        // Home/End/F-keys etc. are not used
                        _ => None,
                    };
                    if let Some(key) = key {
                        let _ = keys.push(key);
                    }
                }
                _ => {
                    // Malformed sequence, resynchronise
                    self.state = DecodeState::Ground;
                }
            },
        }

        keys
    }

    /// No byte arrived within the ESC timeout
    ///
    /// A pending lone ESC becomes [`Key::Escape`]; a truncated sequence is
    /// dropped.
    pub fn timeout(&mut self) -> Option<Key> {
        let state = core::mem::replace(&mut self.state, DecodeState::Ground);
        match state {
            DecodeState::Escape => Some(Key::Escape),
            _ => None,
        }
    }
}
