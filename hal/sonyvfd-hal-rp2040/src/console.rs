//! UART console for RP2040
//!
//! Wraps an interrupt-driven buffered UART. The bounded wait uses
//! `embassy_time::with_timeout`, so a timed-out read loses no data: the
//! byte stays in the RX ring buffer for the next read.

use embassy_rp::uart::BufferedUart;
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, Write};

pub use sonyvfd_hal::console::{Console, ConsoleError, NEWLINE};

/// Console over a buffered UART
pub struct UartConsole {
    uart: BufferedUart,
}

impl UartConsole {
    /// Wrap an already configured buffered UART
    pub fn new(uart: BufferedUart) -> Self {
        Self { uart }
    }
}

impl Console for UartConsole {
    async fn read_byte(&mut self) -> Result<u8, ConsoleError> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte).await {
            Ok(0) => Err(ConsoleError::Closed),
            Ok(_) => Ok(byte[0]),
            Err(_) => Err(ConsoleError::Io),
        }
    }

    async fn read_byte_timeout(&mut self, timeout_ms: u64) -> Result<Option<u8>, ConsoleError> {
        match with_timeout(Duration::from_millis(timeout_ms), self.read_byte()).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), ConsoleError> {
        self.uart.write_all(data).await.map_err(|_| ConsoleError::Io)?;
        self.uart.flush().await.map_err(|_| ConsoleError::Io)
    }
}
