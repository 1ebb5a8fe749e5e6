//! Decoded keypresses from the operator terminal

use crate::command::Command;

/// A single decoded keypress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Printable ASCII character
    Char(char),
    /// Enter / Return (CR, LF, or CR LF)
    Enter,
    /// Backspace or DEL
    Backspace,
    /// A lone Escape keypress (not followed by a sequence)
    Escape,
    /// Arrow up (`ESC [ A`)
    Up,
    /// Arrow down (`ESC [ B`)
    Down,
    /// Arrow right (`ESC [ C`)
    Right,
    /// Arrow left (`ESC [ D`)
    Left,
    /// Ctrl-C
    Interrupt,
}

// Control bytes
const CTRL_C: u8 = 0x03;
const BACKSPACE: u8 = 0x08;
const LF: u8 = 0x0A;
const CR: u8 = 0x0D;
const DEL: u8 = 0x7F;

impl Key {
    /// Map a single (non-escape) byte to a key
    ///
    /// Returns `None` for control bytes that carry no meaning here.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CTRL_C => Some(Key::Interrupt),
            CR | LF => Some(Key::Enter),
            BACKSPACE | DEL => Some(Key::Backspace),
            0x20..=0x7E => Some(Key::Char(byte as char)),
            _ => None,
        }
    }

    /// Command bound to this key in key mode
    ///
    /// Arrows move the cursor: left/right step one bit, up/down step one
    /// grid. Letter keys mirror the line-mode command words.
    pub fn command(self) -> Option<Command> {
        match self {
            Key::Right | Key::Char('n') | Key::Enter => Some(Command::NextBit),
            Key::Left | Key::Char('p') => Some(Command::PrevBit),
            Key::Up | Key::Char('N') => Some(Command::NextGrid),
            Key::Down | Key::Char('P') => Some(Command::PrevGrid),
            Key::Char('s') => Some(Command::Save),
            Key::Char('t') => Some(Command::TestPattern),
            Key::Char('q') | Key::Interrupt => Some(Command::Quit),
            Key::Char('?') => Some(Command::Help),
            Key::Escape => Some(Command::LineMode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte_printable() {
        assert_eq!(Key::from_byte(b'a'), Some(Key::Char('a')));
        assert_eq!(Key::from_byte(b' '), Some(Key::Char(' ')));
        assert_eq!(Key::from_byte(b'~'), Some(Key::Char('~')));
    }

    #[test]
    fn test_from_byte_control() {
        assert_eq!(Key::from_byte(0x03), Some(Key::Interrupt));
        assert_eq!(Key::from_byte(b'\r'), Some(Key::Enter));
        assert_eq!(Key::from_byte(b'\n'), Some(Key::Enter));
        assert_eq!(Key::from_byte(0x7F), Some(Key::Backspace));
        assert_eq!(Key::from_byte(0x08), Some(Key::Backspace));
        assert_eq!(Key::from_byte(0x00), None);
        assert_eq!(Key::from_byte(0x80), None);
    }

    #[test]
    fn test_key_mode_bindings() {
        assert_eq!(Key::Right.command(), Some(Command::NextBit));
        assert_eq!(Key::Left.command(), Some(Command::PrevBit));
        assert_eq!(Key::Up.command(), Some(Command::NextGrid));
        assert_eq!(Key::Down.command(), Some(Command::PrevGrid));
        assert_eq!(Key::Char('N').command(), Some(Command::NextGrid));
        assert_eq!(Key::Char('n').command(), Some(Command::NextBit));
        assert_eq!(Key::Interrupt.command(), Some(Command::Quit));
        assert_eq!(Key::Escape.command(), Some(Command::LineMode));
        assert_eq!(Key::Char('x').command(), None);
    }
}
