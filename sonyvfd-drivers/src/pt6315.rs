//! PT6315 VFD controller over a bit-banged 3-wire bus
//!
//! # Bus framing
//!
//! Every transfer is framed by STB low. Within a frame bytes are clocked
//! out LSB first: for each bit CLK goes low, DIN is set, and CLK rises after
//! at least 1µs; the controller samples DIN on the rising edge.
//!
//! ```text
//! STB ‾‾\_________________________/‾‾
//! CLK ‾‾‾‾\_/‾\_/‾\_/ ... \_/‾‾‾‾‾‾‾‾
//! DIN ____X b0 X b1 X ... X b7 X_____
//! ```
//!
//! A display RAM write is two frames: the data-set command on its own,
//! then the address-set command followed by the payload in the same frame.
//!
//! Idle state is CLK high, STB high, DIN low.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use sonyvfd_core::config::{PanelConfig, MAX_BRIGHTNESS};
use sonyvfd_core::framebuffer::Framebuffer;
use sonyvfd_core::geometry::Geometry;
use sonyvfd_core::traits::PanelDriver;

/// PT6315 command bytes
pub mod cmd {
    /// Display mode setting (low nibble selects grids/segments)
    pub const MODE_SET: u8 = 0x00;
    /// Data setting: write display RAM, auto-increment address
    pub const DATA_SET: u8 = 0x40;
    /// Data setting: write LED port
    pub const DATA_SET_LED: u8 = 0x41;
    /// Address setting (low 6 bits are the RAM address)
    pub const ADDR_SET: u8 = 0xC0;
    /// Display control (dimming level in the low 3 bits)
    pub const DISPLAY_CTRL: u8 = 0x80;
    /// Display control: display on
    pub const DISP_ON: u8 = 0x08;
    /// Mask for the RAM address in an address-set command
    pub const ADDR_MASK: u8 = 0x3F;
    /// Mask for the LED port bits
    pub const LED_MASK: u8 = 0x0F;
}

/// Minimum CLK half-period and STB setup/hold time, in µs
const HOLD_US: u32 = 1;

/// Settle time after forcing the bus idle at init, in ms
const INIT_SETTLE_MS: u32 = 10;

/// A bus line that failed to change level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Clock line
    Clock,
    /// Data line
    Data,
    /// Strobe line
    Strobe,
}

/// PT6315 driver with a shadow framebuffer
pub struct Pt6315<CLK, DIN, STB, D> {
    clk: CLK,
    din: DIN,
    stb: STB,
    delay: D,
    buffer: Framebuffer,
    mode: u8,
    /// Fixed range, replacing the one derived from the mode
    geometry_override: Option<Geometry>,
}

impl<CLK, DIN, STB, D> Pt6315<CLK, DIN, STB, D>
where
    CLK: OutputPin,
    DIN: OutputPin,
    STB: OutputPin,
    D: DelayNs,
{
    /// Create a driver; nothing is sent until [`init`](Self::init)
    ///
    /// An out-of-range geometry override is clamped to the controller limits.
    pub fn new(clk: CLK, din: DIN, stb: STB, delay: D, config: &PanelConfig) -> Self {
        let mode = config.mode & 0x0F;
        let geometry_override = config.geometry.map(|g| Geometry::new(g.grids, g.bits));
        let geometry = geometry_override.unwrap_or_else(|| Geometry::for_mode(mode));
        Self {
            clk,
            din,
            stb,
            delay,
            buffer: Framebuffer::new(geometry),
            mode,
            geometry_override,
        }
    }

    /// Bring the controller up: idle bus, mode, blank RAM, display on at full brightness
    pub fn init(&mut self) -> Result<(), BusError> {
        self.idle()?;
        self.delay.delay_ms(INIT_SETTLE_MS);

        self.send_command(cmd::MODE_SET | self.mode)?;
        self.clear()?;
        self.send_command(cmd::DISPLAY_CTRL | cmd::DISP_ON | MAX_BRIGHTNESS)
    }

    /// Mode nibble last sent
    pub fn mode(&self) -> u8 {
        self.mode
    }

    /// Shadow buffer
    pub fn buffer(&self) -> &Framebuffer {
        &self.buffer
    }

    /// Send a single-byte command in its own strobe frame
    pub fn send_command(&mut self, command: u8) -> Result<(), BusError> {
        self.begin()?;
        self.write_byte(command)?;
        self.end()
    }

    /// Write `data` to display RAM starting at `address`
    pub fn write_data(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
        self.send_command(cmd::DATA_SET)?;

        self.begin()?;
        self.write_byte(cmd::ADDR_SET | (address & cmd::ADDR_MASK))?;
        for &byte in data {
            self.write_byte(byte)?;
        }
        self.end()
    }

    fn idle(&mut self) -> Result<(), BusError> {
        self.clk.set_high().map_err(|_| BusError::Clock)?;
        self.stb.set_high().map_err(|_| BusError::Strobe)?;
        self.din.set_low().map_err(|_| BusError::Data)
    }

    fn begin(&mut self) -> Result<(), BusError> {
        self.stb.set_low().map_err(|_| BusError::Strobe)?;
        self.delay.delay_us(HOLD_US);
        Ok(())
    }

    fn end(&mut self) -> Result<(), BusError> {
        self.delay.delay_us(HOLD_US);
        self.stb.set_high().map_err(|_| BusError::Strobe)?;
        self.delay.delay_us(HOLD_US);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        for i in 0..8 {
            self.clk.set_low().map_err(|_| BusError::Clock)?;
            let level = if (byte >> i) & 0x01 != 0 {
                self.din.set_high()
            } else {
                self.din.set_low()
            };
            level.map_err(|_| BusError::Data)?;
            self.delay.delay_us(HOLD_US);
            self.clk.set_high().map_err(|_| BusError::Clock)?;
            self.delay.delay_us(HOLD_US);
        }
        Ok(())
    }
}

impl<CLK, DIN, STB, D> PanelDriver for Pt6315<CLK, DIN, STB, D>
where
    CLK: OutputPin,
    DIN: OutputPin,
    STB: OutputPin,
    D: DelayNs,
{
    type Error = BusError;

    fn geometry(&self) -> Geometry {
        self.geometry_override
            .unwrap_or_else(|| Geometry::for_mode(self.mode))
    }

    fn set_pixel(&mut self, grid: u8, bit: u8, on: bool) {
        self.buffer.set_pixel(grid, bit, on);
    }

    fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    fn fill_buffer(&mut self) {
        self.buffer.fill();
    }

    fn flush(&mut self) -> Result<(), BusError> {
        // Copy out so the bus methods can borrow self mutably
        let mut frame = [0u8; sonyvfd_core::geometry::MAX_BUFFER_LEN];
        let len = self.buffer.len();
        frame[..len].copy_from_slice(self.buffer.as_bytes());
        self.write_data(0x00, &frame[..len])
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), BusError> {
        self.send_command(cmd::DISPLAY_CTRL | cmd::DISP_ON | level.min(MAX_BRIGHTNESS))
    }

    fn set_mode(&mut self, mode: u8) -> Result<(), BusError> {
        self.mode = mode & 0x0F;
        self.buffer.resize(self.geometry());
        self.send_command(cmd::MODE_SET | self.mode)
    }

    fn write_leds(&mut self, bitmap: u8) -> Result<(), BusError> {
        self.begin()?;
        self.write_byte(cmd::DATA_SET_LED)?;
        self.write_byte(bitmap & cmd::LED_MASK)?;
        self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{bus, decode_frames, Delay, Level, Line, Pin, Trace};
    use proptest::prelude::*;
    use sonyvfd_core::geometry::{MODE_12_GRID_16_BIT, MODE_16_GRID_12_BIT};

    type TestVfd = Pt6315<Pin, Pin, Pin, Delay>;

    fn driver() -> (TestVfd, Trace) {
        let (clk, din, stb, delay, trace) = bus();
        (Pt6315::new(clk, din, stb, delay, &PanelConfig::default()), trace)
    }

    #[test]
    fn test_command_is_lsb_first() {
        let (mut vfd, trace) = driver();
        vfd.send_command(0x81).unwrap();
        let frames = decode_frames(&trace.events());
        assert_eq!(frames, vec![vec![0x81]]);

        // First clocked bit is bit 0 (high), second is bit 1 (low)
        let bits = trace.sampled_bits();
        assert_eq!(&bits[..8], &[true, false, false, false, false, false, false, true]);
    }

    #[test]
    fn test_init_sequence() {
        let (mut vfd, trace) = driver();
        vfd.init().unwrap();

        let events = trace.events();
        // Idle state forced before anything else
        assert_eq!(events[0], (Line::Clock, Level::High));
        assert_eq!(events[1], (Line::Strobe, Level::High));
        assert_eq!(events[2], (Line::Data, Level::Low));
        assert!(trace.delays_ms().contains(&10));

        let frames = decode_frames(&events);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], vec![cmd::MODE_SET | MODE_12_GRID_16_BIT]);
        assert_eq!(frames[1], vec![cmd::DATA_SET]);
        assert_eq!(frames[2][0], cmd::ADDR_SET);
        assert_eq!(frames[2].len(), 1 + 24);
        assert!(frames[2][1..].iter().all(|&b| b == 0));
        assert_eq!(frames[3], vec![0x8F]);
    }

    #[test]
    fn test_flush_first_data_bit_is_byte0_bit0() {
        let (mut vfd, trace) = driver();
        vfd.set_pixel(0, 0, true);
        vfd.flush().unwrap();

        let frames = decode_frames(&trace.events());
        assert_eq!(frames[0], vec![cmd::DATA_SET]);
        assert_eq!(frames[1][0], 0xC0);
        assert_eq!(frames[1][1], 0x01);

        // 8 bits of DATA_SET, 8 of ADDR_SET, then payload
        let bits = trace.sampled_bits();
        assert!(bits[16]);
        assert!(bits[17..24].iter().all(|b| !b));
    }

    #[test]
    fn test_flush_high_byte() {
        let (mut vfd, trace) = driver();
        vfd.set_pixel(3, 12, true);
        vfd.flush().unwrap();
        let frames = decode_frames(&trace.events());
        let payload = &frames[1][1..];
        assert_eq!(payload[7], 0x10);
        assert_eq!(payload.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn test_out_of_window_pixel_never_sent() {
        let (mut vfd, trace) = driver();
        vfd.set_pixel(12, 0, true);
        vfd.set_pixel(0, 16, true);
        vfd.flush().unwrap();
        let frames = decode_frames(&trace.events());
        assert_eq!(frames[1].len(), 25);
        assert!(frames[1][1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_brightness_clamped() {
        let (mut vfd, trace) = driver();
        vfd.set_brightness(3).unwrap();
        vfd.set_brightness(200).unwrap();
        assert_eq!(decode_frames(&trace.events()), vec![vec![0x8B], vec![0x8F]]);
    }

    #[test]
    fn test_mode_change_resizes_window() {
        let (mut vfd, trace) = driver();
        vfd.set_mode(0x13).unwrap();
        assert_eq!(vfd.mode(), MODE_16_GRID_12_BIT);
        assert_eq!(vfd.geometry(), Geometry { grids: 16, bits: 12 });
        vfd.flush().unwrap();

        let frames = decode_frames(&trace.events());
        assert_eq!(frames[0], vec![MODE_16_GRID_12_BIT]);
        assert_eq!(frames[2].len(), 1 + 32);
    }

    #[test]
    fn test_geometry_override_survives_mode_change() {
        let (clk, din, stb, delay, _trace) = bus();
        let config = PanelConfig {
            geometry: Some(Geometry { grids: 10, bits: 16 }),
            ..Default::default()
        };
        let mut vfd = Pt6315::new(clk, din, stb, delay, &config);
        vfd.set_mode(0x07).unwrap();
        assert_eq!(vfd.geometry(), Geometry { grids: 10, bits: 16 });
        assert_eq!(vfd.buffer().len(), 20);
    }

    #[test]
    fn test_out_of_range_override_clamped() {
        let (clk, din, stb, delay, _trace) = bus();
        let config = PanelConfig {
            geometry: Some(Geometry { grids: 0, bits: 0 }),
            ..Default::default()
        };
        let vfd = Pt6315::new(clk, din, stb, delay, &config);
        assert_eq!(vfd.geometry(), Geometry { grids: 1, bits: 1 });
        assert_eq!(vfd.buffer().len(), 2);

        let (clk, din, stb, delay, _trace) = bus();
        let config = PanelConfig {
            geometry: Some(Geometry { grids: 40, bits: 20 }),
            ..Default::default()
        };
        let vfd = Pt6315::new(clk, din, stb, delay, &config);
        assert_eq!(vfd.geometry(), Geometry { grids: 32, bits: 16 });
        assert_eq!(vfd.buffer().len(), 64);
    }

    #[test]
    fn test_leds_masked() {
        let (mut vfd, trace) = driver();
        vfd.write_leds(0xF5).unwrap();
        assert_eq!(
            decode_frames(&trace.events()),
            vec![vec![cmd::DATA_SET_LED, 0x05]]
        );
    }

    #[test]
    fn test_clear_blanks_after_pattern() {
        let (mut vfd, trace) = driver();
        vfd.test_pattern().unwrap();
        vfd.clear().unwrap();
        let frames = decode_frames(&trace.events());
        assert!(frames[1][1..].iter().all(|&b| b == 0xFF));
        assert!(frames[3][1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pin_failure_reported() {
        let (clk, din, stb, delay, trace) = bus();
        trace.fail(Line::Strobe);
        let mut vfd = Pt6315::new(clk, din, stb, delay, &PanelConfig::default());
        assert_eq!(vfd.init(), Err(BusError::Strobe));
        assert!(decode_frames(&trace.events()).is_empty());
    }

    #[test]
    fn test_address_masked() {
        let (mut vfd, trace) = driver();
        vfd.write_data(0x45, &[0xAA]).unwrap();
        let frames = decode_frames(&trace.events());
        assert_eq!(frames[1], vec![0xC5, 0xAA]);
    }

    proptest! {
        #[test]
        fn test_flush_sends_buffer_lsb_first(bytes in proptest::collection::vec(any::<u8>(), 24)) {
            let (mut vfd, trace) = driver();
            for (index, byte) in bytes.iter().enumerate() {
                let grid = (index / 2) as u8;
                let base = if index % 2 == 0 { 0 } else { 8 };
                for j in 0..8u8 {
                    vfd.set_pixel(grid, base + j, byte & (1 << j) != 0);
                }
            }
            prop_assert_eq!(vfd.buffer().as_bytes(), &bytes[..]);

            vfd.flush().unwrap();
            let frames = decode_frames(&trace.events());
            prop_assert_eq!(frames.len(), 2);
            prop_assert_eq!(&frames[0][..], &[cmd::DATA_SET][..]);
            prop_assert_eq!(frames[1][0], cmd::ADDR_SET);
            prop_assert_eq!(&frames[1][1..], &bytes[..]);
        }
    }
}
