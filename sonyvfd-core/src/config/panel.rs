//! Panel wiring and start-up configuration

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::geometry::{Geometry, MODE_12_GRID_16_BIT};
use crate::mapping::MAX_POSITIONS;

/// Highest usable GPIO number on the RP2040
pub const MAX_GPIO: u8 = 29;

/// Highest dimming level accepted by the controller
pub const MAX_BRIGHTNESS: u8 = 7;

/// Upper bound on the encoded config size
pub const MAX_ENCODED_LEN: usize = 64;

/// Configuration validation and decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin number beyond the last GPIO
    InvalidPin(u8),
    /// The same pin is assigned to two bus lines
    DuplicatePin(u8),
    /// Mode does not fit in the 4-bit mode field
    InvalidMode(u8),
    /// Brightness above the controller's maximum
    InvalidBrightness(u8),
    /// Position count of zero or above the supported maximum
    InvalidPositions(u8),
    /// Geometry override outside controller limits
    InvalidGeometry,
    /// Stored bytes could not be decoded
    Decode,
    /// Config could not be encoded
    Encode,
}

/// Bus wiring and initial controller state
///
/// Defaults match the RP2040-Zero board the panel was reverse-engineered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Serialize, Deserialize)]
pub struct PanelConfig {
    /// Clock line GPIO
    pub clock_pin: u8,
    /// Data line GPIO
    pub data_pin: u8,
    /// Strobe line GPIO
    pub strobe_pin: u8,
    /// Mode nibble sent at init
    pub mode: u8,
    /// Dimming level applied after init (0-7)
    pub brightness: u8,
    /// Minimum number of character positions to allocate
    pub positions: u8,
    /// Explicit grid/bit range, replacing the one derived from `mode`
    pub geometry: Option<Geometry>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            clock_pin: 4,
            data_pin: 3,
            strobe_pin: 5,
            mode: MODE_12_GRID_16_BIT,
            brightness: MAX_BRIGHTNESS,
            positions: 9,
            geometry: None,
        }
    }
}

impl PanelConfig {
    /// Check pin assignments and ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = [self.clock_pin, self.data_pin, self.strobe_pin];
        for (i, &pin) in pins.iter().enumerate() {
            if pin > MAX_GPIO {
                return Err(ConfigError::InvalidPin(pin));
            }
            if pins[i + 1..].contains(&pin) {
                return Err(ConfigError::DuplicatePin(pin));
            }
        }

        if self.mode > 0x0F {
            return Err(ConfigError::InvalidMode(self.mode));
        }
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::InvalidBrightness(self.brightness));
        }
        if self.positions == 0 || self.positions as usize > MAX_POSITIONS {
            return Err(ConfigError::InvalidPositions(self.positions));
        }
        if let Some(geometry) = self.geometry {
            if !geometry.is_valid() {
                return Err(ConfigError::InvalidGeometry);
            }
        }
        Ok(())
    }

    /// Geometry in effect at start-up
    pub fn geometry(&self) -> Geometry {
        self.geometry.unwrap_or_else(|| Geometry::for_mode(self.mode))
    }

    /// Encode to postcard bytes for flash
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let bytes = postcard::to_allocvec(self).map_err(|_| ConfigError::Encode)?;
        if bytes.len() > MAX_ENCODED_LEN {
            return Err(ConfigError::Encode);
        }
        Ok(bytes)
    }

    /// Decode and validate postcard bytes read from flash
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}
