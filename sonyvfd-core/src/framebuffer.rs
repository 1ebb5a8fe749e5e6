//! Shadow copy of the controller's display RAM
//!
//! The buffer is the only source of truth for what the panel shows. Pixel
//! writes that fall outside the active window are dropped without error so
//! that nothing is ever written to an undefined RAM address.

use crate::geometry::{Coordinate, Geometry, MAX_BUFFER_LEN};

/// Display RAM shadow buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bytes: [u8; MAX_BUFFER_LEN],
    /// Active window length (2 bytes per scanned grid)
    len: usize,
}

impl Framebuffer {
    /// Create a cleared buffer sized for `geometry`
    pub fn new(geometry: Geometry) -> Self {
        Self {
            bytes: [0; MAX_BUFFER_LEN],
            len: geometry.buffer_len().min(MAX_BUFFER_LEN),
        }
    }

    /// Active window length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the active window is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes of the active window, in transmission order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Resize the active window for a new geometry
    ///
    /// Bytes outside the new window are zeroed so a later grow never
    /// resurrects stale segments.
    pub fn resize(&mut self, geometry: Geometry) {
        self.len = geometry.buffer_len().min(MAX_BUFFER_LEN);
        self.bytes[self.len..].fill(0);
    }

    /// Set or clear one bit
    ///
    /// No-op when the coordinate falls outside the active window.
    pub fn set_pixel(&mut self, grid: u8, bit: u8, on: bool) {
        let coord = Coordinate::new(grid, bit);
        let Some(index) = coord.byte_index() else {
            return;
        };
        if index >= self.len {
            return;
        }

        if on {
            self.bytes[index] |= coord.bit_mask();
        } else {
            self.bytes[index] &= !coord.bit_mask();
        }
    }

    /// Read one bit (false outside the active window)
    pub fn pixel(&self, grid: u8, bit: u8) -> bool {
        let coord = Coordinate::new(grid, bit);
        match coord.byte_index() {
            Some(index) if index < self.len => self.bytes[index] & coord.bit_mask() != 0,
            _ => false,
        }
    }

    /// Zero the whole buffer
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Set every bit of the active window
    pub fn fill(&mut self) {
        self.bytes[..self.len].fill(0xFF);
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MODE_12_GRID_16_BIT, MODE_16_GRID_12_BIT};
    use proptest::prelude::*;

    #[test]
    fn test_new_buffer_sized_by_mode() {
        assert_eq!(Framebuffer::new(Geometry::for_mode(MODE_12_GRID_16_BIT)).len(), 24);
        assert_eq!(Framebuffer::new(Geometry::for_mode(MODE_16_GRID_12_BIT)).len(), 32);
        assert_eq!(Framebuffer::new(Geometry::for_mode(0x0F)).len(), 64);
    }

    #[test]
    fn test_set_pixel_low_and_high_byte() {
        let mut fb = Framebuffer::default();
        fb.set_pixel(0, 0, true);
        fb.set_pixel(1, 9, true);
        assert_eq!(fb.as_bytes()[0], 0x01);
        assert_eq!(fb.as_bytes()[3], 0x02);
        assert!(fb.pixel(1, 9));
        assert!(!fb.pixel(1, 8));
    }

    #[test]
    fn test_clear_pixel_keeps_neighbours() {
        let mut fb = Framebuffer::default();
        fb.set_pixel(2, 3, true);
        fb.set_pixel(2, 4, true);
        fb.set_pixel(2, 3, false);
        assert_eq!(fb.as_bytes()[4], 0b0001_0000);
    }

    #[test]
    fn test_out_of_window_ignored() {
        let mut fb = Framebuffer::new(Geometry::for_mode(MODE_12_GRID_16_BIT));
        let before = fb.clone();
        fb.set_pixel(12, 0, true);
        fb.set_pixel(200, 15, true);
        fb.set_pixel(0, 16, true);
        assert_eq!(fb, before);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut fb = Framebuffer::default();
        fb.fill();
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
        fb.clear();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_resize_zeroes_outside_window() {
        let mut fb = Framebuffer::new(Geometry::for_mode(0x0F));
        fb.fill();
        fb.resize(Geometry::for_mode(MODE_12_GRID_16_BIT));
        assert_eq!(fb.len(), 24);
        fb.resize(Geometry::for_mode(0x0F));
        assert!(fb.as_bytes()[..24].iter().all(|&b| b == 0xFF));
        assert!(fb.as_bytes()[24..].iter().all(|&b| b == 0));
    }

    proptest! {
        #[test]
        fn test_set_then_clear_restores_byte(
            seed in proptest::collection::vec(any::<u8>(), 24),
            grid in 0u8..12,
            bit in 0u8..16,
        ) {
            let mut fb = Framebuffer::new(Geometry::for_mode(MODE_12_GRID_16_BIT));
            for (i, b) in seed.iter().enumerate() {
                for j in 0..8u8 {
                    if b & (1 << j) != 0 {
                        fb.set_pixel((i / 2) as u8, (i % 2) as u8 * 8 + j, true);
                    }
                }
            }
            let index = grid as usize * 2 + usize::from(bit >= 8);
            let original = fb.as_bytes()[index];
            let was_on = fb.pixel(grid, bit);

            fb.set_pixel(grid, bit, true);
            fb.set_pixel(grid, bit, was_on);
            prop_assert_eq!(fb.as_bytes()[index], original);
        }

        #[test]
        fn test_out_of_range_is_noop(grid in 12u8..=255, bit in any::<u8>()) {
            let mut fb = Framebuffer::new(Geometry::for_mode(MODE_12_GRID_16_BIT));
            fb.fill();
            let before = fb.clone();
            fb.set_pixel(grid, bit, false);
            prop_assert_eq!(fb, before);
        }
    }
}
