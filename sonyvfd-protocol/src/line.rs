//! Line editing for line-mode input
//!
//! The terminal sends raw keystrokes; the device echoes and assembles them
//! into a line, handling backspace and Ctrl-C.

use heapless::String;

use crate::events::Key;

/// Maximum accepted line length (extra characters are dropped)
pub const MAX_LINE_LEN: usize = 64;

/// Result of feeding one key to the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// Nothing to do
    None,
    /// Character accepted, echo it
    Echo(char),
    /// Last character removed, erase it on the terminal
    Erase,
    /// Enter pressed, here is the completed line
    Submit(String<MAX_LINE_LEN>),
    /// Ctrl-C pressed
    Interrupt,
}

/// Assembles keys into a line
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    buffer: String<MAX_LINE_LEN>,
}

impl LineEditor {
    /// Create an empty line editor
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Current (unsubmitted) contents
    pub fn as_str(&self) -> &str {
        self.buffer.as_str()
    }

    /// Discard the current contents
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Feed one key
    pub fn feed(&mut self, key: Key) -> LineEvent {
        match key {
            Key::Char(c) => {
                if self.buffer.push(c).is_ok() {
                    LineEvent::Echo(c)
                } else {
                    LineEvent::None
                }
            }
            Key::Backspace => {
                if self.buffer.pop().is_some() {
                    LineEvent::Erase
                } else {
                    LineEvent::None
                }
            }
            Key::Enter => LineEvent::Submit(core::mem::take(&mut self.buffer)),
            Key::Interrupt => {
                self.buffer.clear();
                LineEvent::Interrupt
            }
            // Arrows and Escape have no meaning while typing a line
            _ => LineEvent::None,
        }
    }
}
