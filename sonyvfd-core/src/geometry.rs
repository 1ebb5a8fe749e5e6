//! Controller geometry and coordinate addressing
//!
//! The PT6315 display RAM holds one 16-bit word per grid, stored as two
//! bytes: bits 0-7 in byte `grid * 2`, bits 8-15 in byte `grid * 2 + 1`.
//! How many grids and how many segment bits per grid are actually scanned
//! depends on the display mode register.

use serde::{Deserialize, Serialize};

/// Bits in one grid word
pub const BITS_PER_GRID: u8 = 16;

/// Largest grid count any mode scans (6-bit RAM address, 2 bytes per grid)
pub const MAX_GRIDS: u8 = 32;

/// Display RAM size in bytes
pub const MAX_BUFFER_LEN: usize = MAX_GRIDS as usize * 2;

/// Mode nibble: 12 grids, 16 segment bits (14-segment characters)
pub const MODE_12_GRID_16_BIT: u8 = 0x02;

/// Mode nibble: 16 grids, 12 segment bits
pub const MODE_16_GRID_12_BIT: u8 = 0x03;

/// A physical segment driver line: one bit of one grid word
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct Coordinate {
    /// Grid (digit) line
    pub grid: u8,
    /// Segment bit within the grid word (0-15)
    pub bit: u8,
}

impl Coordinate {
    /// Create a coordinate
    pub const fn new(grid: u8, bit: u8) -> Self {
        Self { grid, bit }
    }

    /// Byte offset of this coordinate in display RAM
    ///
    /// Returns `None` for bit indices outside the 16-bit grid word.
    pub fn byte_index(&self) -> Option<usize> {
        if self.bit >= BITS_PER_GRID {
            return None;
        }
        let base = self.grid as usize * 2;
        Some(if self.bit < 8 { base } else { base + 1 })
    }

    /// Mask of this coordinate's bit within its byte
    pub fn bit_mask(&self) -> u8 {
        1 << (self.bit % 8)
    }

    /// Controller RAM address of the grid word (`grid * 2`)
    pub fn address(&self) -> u16 {
        self.grid as u16 * 2
    }
}

impl From<(u8, u8)> for Coordinate {
    fn from((grid, bit): (u8, u8)) -> Self {
        Self { grid, bit }
    }
}

impl From<Coordinate> for (u8, u8) {
    fn from(c: Coordinate) -> Self {
        (c.grid, c.bit)
    }
}

/// Number of scanned grids and segment bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Serialize, Deserialize)]
pub struct Geometry {
    /// Grid count (1-32)
    pub grids: u8,
    /// Segment bits per grid (1-16)
    pub bits: u8,
}

impl Geometry {
    /// Create a geometry, clamping to the controller limits
    pub fn new(grids: u8, bits: u8) -> Self {
        Self {
            grids: grids.clamp(1, MAX_GRIDS),
            bits: bits.clamp(1, BITS_PER_GRID),
        }
    }

    /// Geometry scanned in the given mode
    ///
    /// Modes other than the two the panel is known to use map to the full
    /// address space, so every RAM bit can be explored.
    pub fn for_mode(mode: u8) -> Self {
        match mode & 0x0F {
            MODE_12_GRID_16_BIT => Self { grids: 12, bits: 16 },
            MODE_16_GRID_12_BIT => Self { grids: 16, bits: 12 },
            _ => Self {
                grids: MAX_GRIDS,
                bits: BITS_PER_GRID,
            },
        }
    }

    /// True if both counts are within controller limits
    pub fn is_valid(&self) -> bool {
        (1..=MAX_GRIDS).contains(&self.grids) && (1..=BITS_PER_GRID).contains(&self.bits)
    }

    /// Bytes of display RAM covered by this geometry (2 per grid)
    pub fn buffer_len(&self) -> usize {
        self.grids as usize * 2
    }

    /// True if the coordinate is inside this geometry
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.grid < self.grids && coord.bit < self.bits
    }

    /// Clamp a coordinate into this geometry
    pub fn clamp(&self, grid: u32, bit: u32) -> Coordinate {
        Coordinate {
            grid: grid.min(self.grids as u32 - 1) as u8,
            bit: bit.min(self.bits as u32 - 1) as u8,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::for_mode(MODE_12_GRID_16_BIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_addressing_low_bits() {
        let c = Coordinate::new(3, 5);
        assert_eq!(c.byte_index(), Some(6));
        assert_eq!(c.bit_mask(), 0b0010_0000);
    }

    #[test]
    fn test_byte_addressing_high_bits() {
        let c = Coordinate::new(3, 8);
        assert_eq!(c.byte_index(), Some(7));
        assert_eq!(c.bit_mask(), 0x01);

        let c = Coordinate::new(0, 15);
        assert_eq!(c.byte_index(), Some(1));
        assert_eq!(c.bit_mask(), 0x80);
    }

    #[test]
    fn test_bit_outside_word() {
        assert_eq!(Coordinate::new(0, 16).byte_index(), None);
        assert_eq!(Coordinate::new(5, 200).byte_index(), None);
    }

    #[test]
    fn test_address() {
        assert_eq!(Coordinate::new(0, 0).address(), 0);
        assert_eq!(Coordinate::new(11, 3).address(), 22);
    }

    #[test]
    fn test_mode_geometry() {
        assert_eq!(Geometry::for_mode(0x02), Geometry { grids: 12, bits: 16 });
        assert_eq!(Geometry::for_mode(0x03), Geometry { grids: 16, bits: 12 });
        assert_eq!(Geometry::for_mode(0x07), Geometry { grids: 32, bits: 16 });
        assert_eq!(Geometry::for_mode(0x00).buffer_len(), MAX_BUFFER_LEN);
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Geometry::new(0, 0), Geometry { grids: 1, bits: 1 });
        assert_eq!(Geometry::new(40, 20), Geometry { grids: 32, bits: 16 });
        assert!(Geometry::new(40, 20).is_valid());
        assert!(!Geometry { grids: 0, bits: 16 }.is_valid());
    }

    #[test]
    fn test_clamp_coordinate() {
        let g = Geometry::for_mode(MODE_16_GRID_12_BIT);
        assert_eq!(g.clamp(3, 4), Coordinate::new(3, 4));
        assert_eq!(g.clamp(99, 99), Coordinate::new(15, 11));
        assert_eq!(g.clamp(u32::MAX, 0), Coordinate::new(15, 0));
    }

    #[test]
    fn test_contains() {
        let g = Geometry::default();
        assert!(g.contains(Coordinate::new(11, 15)));
        assert!(!g.contains(Coordinate::new(12, 0)));
    }

    #[test]
    fn test_coordinate_json_shape() {
        let json = serde_json::to_string(&Coordinate::new(2, 5)).unwrap();
        assert_eq!(json, "[2,5]");
        let back: Coordinate = serde_json::from_str("[7,11]").unwrap();
        assert_eq!(back, Coordinate::new(7, 11));
    }
}
