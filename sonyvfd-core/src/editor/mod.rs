//! Interactive mapping editor
//!
//! Walks a single lit segment across the panel so an operator can see which
//! physical segment each (grid, bit) drives and give it a logical name.
//!
//! The editor owns the cursor and the mapping. It never touches the console:
//! [`Editor::apply`] returns an [`Outcome`] describing what the caller should
//! print or persist, and [`Editor::refresh`] returns a [`View`] to render
//! whenever the cursor moved.

pub mod view;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use sonyvfd_protocol::Command;

use crate::config::MAX_BRIGHTNESS;
use crate::geometry::{Coordinate, Geometry};
use crate::mapping::MappingData;
use crate::traits::PanelDriver;

pub use view::View;

/// How operator input is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// Whole lines, parsed as commands
    #[default]
    Line,
    /// Single keypresses with arrow keys
    Keys,
}

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report
    Continue,
    /// Print a message to the operator
    Message(String),
    /// Persist this mapping document
    Save(Vec<u8>),
    /// Print this mapping document
    Dump(String),
    /// Leave the editor
    Quit,
}

/// Mapping editor state
#[derive(Debug, Clone)]
pub struct Editor {
    cursor: Coordinate,
    geometry: Geometry,
    mapping: MappingData,
    /// Cursor shown on the panel by the last refresh
    last_drawn: Option<Coordinate>,
    input: InputMode,
    brightness: u8,
}

impl Editor {
    /// Create an editor over `mapping` for a panel scanning `geometry`
    pub fn new(mapping: MappingData, geometry: Geometry) -> Self {
        Self {
            cursor: Coordinate::default(),
            geometry: clamped(geometry),
            mapping,
            last_drawn: None,
            input: InputMode::Line,
            brightness: MAX_BRIGHTNESS,
        }
    }

    /// Prepare the panel for editing
    ///
    /// Blanks the shadow buffer without flushing it (the first
    /// [`refresh`](Self::refresh) lights the cursor) and sets full brightness.
    pub fn start<P: PanelDriver>(&mut self, panel: &mut P) -> Result<(), P::Error> {
        self.geometry = clamped(panel.geometry());
        self.cursor = self
            .geometry
            .clamp(self.cursor.grid as u32, self.cursor.bit as u32);
        panel.clear_buffer();
        panel.set_brightness(self.brightness)?;
        self.invalidate();
        Ok(())
    }

    /// Blank the panel on the way out
    pub fn shutdown<P: PanelDriver>(&mut self, panel: &mut P) -> Result<(), P::Error> {
        self.invalidate();
        panel.clear()
    }

    /// Current cursor
    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    /// Range the cursor moves in
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Mapping being edited
    pub fn mapping(&self) -> &MappingData {
        &self.mapping
    }

    /// Current input mode
    pub fn input_mode(&self) -> InputMode {
        self.input
    }

    /// Force the next [`refresh`](Self::refresh) to redraw
    pub fn invalidate(&mut self) {
        self.last_drawn = None;
    }

    /// Apply one operator command
    ///
    /// Only bus errors are returned; invalid input is reported through
    /// [`Outcome::Message`] and leaves the state untouched.
    pub fn apply<P: PanelDriver>(
        &mut self,
        command: Command,
        panel: &mut P,
    ) -> Result<Outcome, P::Error> {
        match command {
            Command::NextBit => self.next_bit(),
            Command::PrevBit => self.prev_bit(),
            Command::NextGrid => self.step_grid(true),
            Command::PrevGrid => self.step_grid(false),
            Command::Jump { grid, bit } => {
                self.cursor = self.geometry.clamp(grid, bit.unwrap_or(0));
            }
            Command::Map(name) => {
                return Ok(match self.mapping.bind(&name, self.cursor) {
                    Ok(()) => {
                        self.invalidate();
                        Outcome::Message(format!("Mapped {}", name))
                    }
                    Err(_) => Outcome::Message(String::from("Invalid mapping name format")),
                });
            }
            Command::Mode(mode) => {
                panel.set_mode(mode)?;
                // Mode changes may blank the display
                panel.set_brightness(self.brightness)?;
                self.geometry = clamped(panel.geometry());
                self.cursor = self
                    .geometry
                    .clamp(self.cursor.grid as u32, self.cursor.bit as u32);
                self.invalidate();
            }
            Command::Brightness(level) => {
                self.brightness = level.min(MAX_BRIGHTNESS);
                panel.set_brightness(self.brightness)?;
                self.invalidate();
            }
            Command::Leds(bitmap) => {
                panel.write_leds(bitmap)?;
                self.invalidate();
            }
            Command::TestPattern => {
                // Stays lit until the cursor next moves
                panel.test_pattern()?;
                self.last_drawn = Some(self.cursor);
            }
            Command::Dump => {
                return Ok(match self.mapping.to_json_string() {
                    Ok(json) => Outcome::Dump(json),
                    Err(e) => Outcome::Message(format!("Error encoding mappings: {:?}", e)),
                });
            }
            Command::Save => {
                return Ok(match self.mapping.to_json() {
                    Ok(bytes) => Outcome::Save(bytes),
                    Err(e) => Outcome::Message(format!("Error saving: {:?}", e)),
                });
            }
            Command::KeyMode => {
                self.input = InputMode::Keys;
                self.invalidate();
            }
            Command::LineMode => {
                self.input = InputMode::Line;
                self.invalidate();
            }
            Command::Help => self.invalidate(),
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Continue)
    }

    /// Light the cursor if it moved since the last refresh
    ///
    /// Returns the view to render, or `None` if nothing changed.
    pub fn refresh<P: PanelDriver>(&mut self, panel: &mut P) -> Result<Option<View>, P::Error> {
        if self.last_drawn == Some(self.cursor) {
            return Ok(None);
        }

        panel.clear_buffer();
        panel.set_pixel(self.cursor.grid, self.cursor.bit, true);
        panel.flush()?;
        self.last_drawn = Some(self.cursor);

        Ok(Some(self.view()))
    }

    /// Snapshot of what the terminal should show
    pub fn view(&self) -> View {
        View {
            cursor: self.cursor,
            geometry: self.geometry,
            mapped: self.mapping.name_at(self.cursor),
            input: self.input,
        }
    }

    fn next_bit(&mut self) {
        let Coordinate { mut grid, mut bit } = self.cursor;
        bit += 1;
        if bit >= self.geometry.bits {
            bit = 0;
            grid = (grid + 1) % self.geometry.grids;
        }
        self.cursor = Coordinate::new(grid, bit);
    }

    fn prev_bit(&mut self) {
        let Coordinate { mut grid, mut bit } = self.cursor;
        if bit == 0 {
            bit = self.geometry.bits - 1;
            grid = if grid == 0 {
                self.geometry.grids - 1
            } else {
                grid - 1
            };
        } else {
            bit -= 1;
        }
        self.cursor = Coordinate::new(grid, bit);
    }

    fn step_grid(&mut self, forward: bool) {
        let grids = self.geometry.grids;
        let grid = if forward {
            (self.cursor.grid + 1) % grids
        } else if self.cursor.grid == 0 {
            grids - 1
        } else {
            self.cursor.grid - 1
        };
        self.cursor = Coordinate::new(grid, 0);
    }
}

/// Geometry with both counts forced into the controller limits
///
/// The wrap arithmetic needs at least one grid and one bit.
fn clamped(geometry: Geometry) -> Geometry {
    Geometry::new(geometry.grids, geometry.bits)
}
