//! Recording bus for driver tests
//!
//! Pins and delay share one trace. The trace can be replayed into the bits
//! the controller would have sampled and into per-strobe byte frames.

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Clock,
    Data,
    Strobe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

#[derive(Default)]
struct Inner {
    events: Vec<(Line, Level)>,
    delays_ms: Vec<u32>,
    failing: Option<Line>,
}

/// Shared record of pin writes
#[derive(Clone, Default)]
pub struct Trace(Rc<RefCell<Inner>>);

impl Trace {
    pub fn events(&self) -> Vec<(Line, Level)> {
        self.0.borrow().events.clone()
    }

    pub fn delays_ms(&self) -> Vec<u32> {
        self.0.borrow().delays_ms.clone()
    }

    /// Make every write to `line` fail from now on
    pub fn fail(&self, line: Line) {
        self.0.borrow_mut().failing = Some(line);
    }

    /// DIN level at every CLK rising edge inside a strobe frame
    pub fn sampled_bits(&self) -> Vec<bool> {
        let mut bits = Vec::new();
        replay(&self.events(), |event| {
            if let Replay::Bit(bit) = event {
                bits.push(bit);
            }
        });
        bits
    }
}

enum Replay {
    FrameStart,
    Bit(bool),
    FrameEnd,
}

fn replay(events: &[(Line, Level)], mut f: impl FnMut(Replay)) {
    let mut clock = Level::High;
    let mut strobe = Level::High;
    let mut data = Level::Low;

    for &(line, level) in events {
        match line {
            Line::Data => data = level,
            Line::Clock => {
                if clock == Level::Low && level == Level::High && strobe == Level::Low {
                    f(Replay::Bit(data == Level::High));
                }
                clock = level;
            }
            Line::Strobe => {
                if strobe == Level::High && level == Level::Low {
                    f(Replay::FrameStart);
                } else if strobe == Level::Low && level == Level::High {
                    f(Replay::FrameEnd);
                }
                strobe = level;
            }
        }
    }
}

/// Bytes clocked in each strobe frame, assembled LSB first
pub fn decode_frames(events: &[(Line, Level)]) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut current = Vec::new();
    let mut byte = 0u8;
    let mut count = 0;

    replay(events, |event| match event {
        Replay::FrameStart => {
            current.clear();
            byte = 0;
            count = 0;
        }
        Replay::Bit(bit) => {
            if bit {
                byte |= 1 << count;
            }
            count += 1;
            if count == 8 {
                current.push(byte);
                byte = 0;
                count = 0;
            }
        }
        Replay::FrameEnd => {
            if !current.is_empty() {
                frames.push(core::mem::take(&mut current));
            }
        }
    });
    frames
}

#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct Pin {
    line: Line,
    trace: Trace,
}

impl Pin {
    fn record(&mut self, level: Level) -> Result<(), PinFault> {
        let mut inner = self.trace.0.borrow_mut();
        if inner.failing == Some(self.line) {
            return Err(PinFault);
        }
        inner.events.push((self.line, level));
        Ok(())
    }
}

impl ErrorType for Pin {
    type Error = PinFault;
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), PinFault> {
        self.record(Level::Low)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.record(Level::High)
    }
}

pub struct Delay {
    trace: Trace,
}

impl DelayNs for Delay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.trace.0.borrow_mut().delays_ms.push(ms);
    }
}

/// Clock, data, strobe pins and a delay sharing one trace
pub fn bus() -> (Pin, Pin, Pin, Delay, Trace) {
    let trace = Trace::default();
    let clk = Pin {
        line: Line::Clock,
        trace: trace.clone(),
    };
    let din = Pin {
        line: Line::Data,
        trace: trace.clone(),
    };
    let stb = Pin {
        line: Line::Strobe,
        trace: trace.clone(),
    };
    let delay = Delay {
        trace: trace.clone(),
    };
    (clk, din, stb, delay, trace)
}
