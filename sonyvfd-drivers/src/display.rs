//! Text and icon rendering on top of a panel driver
//!
//! Resolves logical requests (an icon name, a character at a position)
//! through the mapping and the 14-segment font into pixel writes.
//! Position 0 is the rightmost character.

use sonyvfd_core::font;
use sonyvfd_core::mapping::MappingData;
use sonyvfd_core::traits::PanelDriver;

/// Display facade owning a panel and a read-only mapping
pub struct VfdDisplay<P> {
    panel: P,
    mapping: MappingData,
}

impl<P: PanelDriver> VfdDisplay<P> {
    /// Wrap an initialised panel
    pub fn new(panel: P, mapping: MappingData) -> Self {
        Self { panel, mapping }
    }

    /// Number of character positions
    pub fn positions(&self) -> usize {
        self.mapping.position_count()
    }

    /// Mapping in use
    pub fn mapping(&self) -> &MappingData {
        &self.mapping
    }

    /// Underlying panel
    pub fn panel(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Set or clear a named icon in the buffer
    ///
    /// Unknown names are ignored.
    pub fn set_icon(&mut self, name: &str, on: bool) {
        if let Some(coord) = self.mapping.icon(name) {
            self.panel.set_pixel(coord.grid, coord.bit, on);
        }
    }

    /// Render one character at a position in the buffer
    ///
    /// Every segment wired at the position is cleared first, so nothing of
    /// the previous glyph survives. Font segments not wired at the
    /// position are skipped. Positions past the last one are ignored.
    pub fn write_char(&mut self, position: usize, ch: char) {
        let Some(segments) = self.mapping.position(position) else {
            return;
        };

        for coord in segments.values() {
            self.panel.set_pixel(coord.grid, coord.bit, false);
        }
        for name in font::segments(ch) {
            if let Some(coord) = segments.get(*name) {
                self.panel.set_pixel(coord.grid, coord.bit, true);
            }
        }
    }

    /// Render a string right-aligned and flush once
    ///
    /// Characters beyond the position count are dropped from the end; the
    /// last remaining character lands on position 0.
    pub fn write_string(&mut self, text: &str) -> Result<(), P::Error> {
        let end = text
            .char_indices()
            .nth(self.positions())
            .map_or(text.len(), |(i, _)| i);
        for (position, ch) in text[..end].chars().rev().enumerate() {
            self.write_char(position, ch);
        }
        self.panel.flush()
    }

    /// Transmit the buffer
    pub fn flush(&mut self) -> Result<(), P::Error> {
        self.panel.flush()
    }

    /// Blank the buffer and the panel
    pub fn clear(&mut self) -> Result<(), P::Error> {
        self.panel.clear()
    }

    /// Set the dimming level (0-7)
    pub fn set_brightness(&mut self, level: u8) -> Result<(), P::Error> {
        self.panel.set_brightness(level)
    }
}
