//! Terminal rendering of the editor state
//!
//! Plain text with ANSI clear-screen; rendered through [`core::fmt::Display`]
//! so the caller can write it to any console.

use alloc::string::String;
use core::fmt;

use super::InputMode;
use crate::geometry::{Coordinate, Geometry};

/// ANSI clear screen and cursor home
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const RULE_WIDTH: usize = 30;

const LINE_CONTROLS: &[&str] = &[
    "  <Enter> / n  : Next Bit",
    "  p            : Prev Bit",
    "  N            : Next Grid",
    "  P            : Prev Grid",
    "  map <name>   : Map (e.g. 'd1_a')",
    "  jump <g> <b> : Jump to grid/bit",
    "  mode <hex>   : Display mode",
    "  bright <0-7> : Brightness",
    "  led <0-15>   : LED port",
    "  test         : Light all segments",
    "  dump         : Print mappings",
    "  keys         : Arrow-key mode",
    "  save         : Save mappings",
    "  q            : Quit",
];

const KEY_CONTROLS: &[&str] = &[
    "  Right / n    : Next Bit",
    "  Left / p     : Prev Bit",
    "  Up / N       : Next Grid",
    "  Down / P     : Prev Grid",
    "  :            : Enter a command",
    "  t            : Light all segments",
    "  s            : Save mappings",
    "  Esc          : Line mode",
    "  q            : Quit",
];

/// Editor screen contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Lit coordinate
    pub cursor: Coordinate,
    /// Active range (ruler width)
    pub geometry: Geometry,
    /// Name bound to the cursor, if any
    pub mapped: Option<String>,
    /// Input mode (selects the controls list)
    pub input: InputMode,
}

impl View {
    fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..RULE_WIDTH {
            f.write_str("-")?;
        }
        f.write_str("\r\n")
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Coordinate { grid, bit } = self.cursor;

        f.write_str(CLEAR_SCREEN)?;
        f.write_str("=== VFD MAPPING TOOL ===\r\n")?;
        write!(f, "GRID: {:02} (Addr 0x{:02X})\r\n", grid, self.cursor.address())?;

        for b in 0..self.geometry.bits {
            f.write_str(if b == bit { "[*]" } else { "[ ]" })?;
        }
        f.write_str("\r\n")?;
        for b in 0..self.geometry.bits {
            write!(f, "{:2} ", b)?;
        }
        f.write_str("\r\n")?;

        Self::rule(f)?;
        write!(f, "Current: Grid {}, Bit {}\r\n", grid, bit)?;
        write!(
            f,
            "Mapped:  {}\r\n",
            self.mapped.as_deref().unwrap_or("---")
        )?;
        Self::rule(f)?;

        f.write_str("Controls:\r\n")?;
        let controls = match self.input {
            InputMode::Line => LINE_CONTROLS,
            InputMode::Keys => KEY_CONTROLS,
        };
        for line in controls {
            f.write_str(line)?;
            f.write_str("\r\n")?;
        }
        Self::rule(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn view(grid: u8, bit: u8, mapped: Option<&str>) -> View {
        View {
            cursor: Coordinate::new(grid, bit),
            geometry: Geometry::for_mode(0x03),
            mapped: mapped.map(String::from),
            input: InputMode::Line,
        }
    }

    #[test]
    fn test_header_and_address() {
        let text = view(11, 3, None).to_string();
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(text.contains("=== VFD MAPPING TOOL ==="));
        assert!(text.contains("GRID: 11 (Addr 0x16)"));
        assert!(text.contains("Current: Grid 11, Bit 3"));
    }

    #[test]
    fn test_ruler_marks_cursor() {
        let text = view(0, 2, None).to_string();
        assert!(text.contains("[ ][ ][*][ ][ ][ ][ ][ ][ ][ ][ ][ ]\r\n"));
        assert!(text.contains(" 0  1  2  3  4  5  6  7  8  9 10 11 \r\n"));
    }

    #[test]
    fn test_ruler_follows_geometry() {
        let mut v = view(0, 15, None);
        v.geometry = Geometry::for_mode(0x02);
        let text = v.to_string();
        assert_eq!(text.matches("[ ]").count(), 15);
        assert_eq!(text.matches("[*]").count(), 1);
    }

    #[test]
    fn test_mapped_name() {
        assert!(view(0, 0, None).to_string().contains("Mapped:  ---"));
        assert!(view(0, 0, Some("d1_a")).to_string().contains("Mapped:  d1_a"));
    }

    #[test]
    fn test_controls_follow_input_mode() {
        let mut v = view(0, 0, None);
        assert!(v.to_string().contains("jump <g> <b>"));
        v.input = InputMode::Keys;
        let text = v.to_string();
        assert!(text.contains("Esc"));
        assert!(!text.contains("jump <g> <b>"));
    }
}
