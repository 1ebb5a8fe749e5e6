//! Panel driver trait for the VFD controller

use crate::geometry::Geometry;

/// Trait for a VFD controller with a shadow framebuffer
///
/// Pixel operations only touch the shadow buffer. Nothing reaches the
/// panel until [`flush`](PanelDriver::flush) (or an operation documented
/// as flushing) is called.
pub trait PanelDriver {
    /// Bus error type
    type Error;

    /// Grid/bit range currently scanned
    fn geometry(&self) -> Geometry;

    /// Set or clear one bit in the shadow buffer
    ///
    /// Coordinates outside the active window are ignored.
    fn set_pixel(&mut self, grid: u8, bit: u8, on: bool);

    /// Zero the shadow buffer without touching the panel
    fn clear_buffer(&mut self);

    /// Set every bit of the active window in the shadow buffer
    fn fill_buffer(&mut self);

    /// Transmit the shadow buffer to the panel
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Zero the shadow buffer and flush
    fn clear(&mut self) -> Result<(), Self::Error> {
        self.clear_buffer();
        self.flush()
    }

    /// Light every segment of the active window on the panel
    fn test_pattern(&mut self) -> Result<(), Self::Error> {
        self.fill_buffer();
        self.flush()
    }

    /// Display on at the given dimming level (clamped to 0-7)
    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error>;

    /// Send a mode-select command
    ///
    /// The controller may blank on a mode change; callers re-assert
    /// brightness afterwards.
    fn set_mode(&mut self, mode: u8) -> Result<(), Self::Error>;

    /// Write the LED port (low 4 bits)
    fn write_leds(&mut self, bitmap: u8) -> Result<(), Self::Error>;
}
