//! Operator console abstractions
//!
//! A byte-oriented terminal link. Escape-sequence decoding and line
//! assembly happen above this layer; the console only moves bytes and
//! offers a bounded wait so a lone ESC can be told apart from the start
//! of an arrow-key sequence.

use core::future::Future;

/// Errors from console I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// Underlying transport reported an error
    Io,
    /// Link closed (no more input will arrive)
    Closed,
}

/// Line terminator written by [`Console::write_line`]
pub const NEWLINE: &str = "\r\n";

/// Operator terminal
pub trait Console {
    /// Wait for the next input byte
    fn read_byte(&mut self) -> impl Future<Output = Result<u8, ConsoleError>>;

    /// Wait up to `timeout_ms` for the next input byte
    ///
    /// Returns `Ok(None)` on timeout.
    fn read_byte_timeout(
        &mut self,
        timeout_ms: u64,
    ) -> impl Future<Output = Result<Option<u8>, ConsoleError>>;

    /// Write all bytes
    fn write_all(&mut self, data: &[u8]) -> impl Future<Output = Result<(), ConsoleError>>;

    /// Write text
    fn write_str(&mut self, text: &str) -> impl Future<Output = Result<(), ConsoleError>> {
        async move { self.write_all(text.as_bytes()).await }
    }

    /// Write text followed by CR LF
    fn write_line(&mut self, text: &str) -> impl Future<Output = Result<(), ConsoleError>> {
        async move {
            self.write_all(text.as_bytes()).await?;
            self.write_all(NEWLINE.as_bytes()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use std::collections::VecDeque;
    use std::vec::Vec;

    struct MockConsole {
        input: VecDeque<u8>,
        output: Vec<u8>,
    }

    impl Console for MockConsole {
        async fn read_byte(&mut self) -> Result<u8, ConsoleError> {
            self.input.pop_front().ok_or(ConsoleError::Closed)
        }

        async fn read_byte_timeout(&mut self, _timeout_ms: u64) -> Result<Option<u8>, ConsoleError> {
            Ok(self.input.pop_front())
        }

        async fn write_all(&mut self, data: &[u8]) -> Result<(), ConsoleError> {
            self.output.extend_from_slice(data);
            Ok(())
        }
    }

    fn console(input: &[u8]) -> MockConsole {
        MockConsole {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    #[test]
    fn test_write_line_appends_crlf() {
        let mut c = console(&[]);
        block_on(c.write_str("> ")).unwrap();
        block_on(c.write_line("Exiting.")).unwrap();
        assert_eq!(c.output, b"> Exiting.\r\n");
    }

    #[test]
    fn test_timeout_returns_none_when_idle() {
        let mut c = console(&[0x1b]);
        assert_eq!(block_on(c.read_byte_timeout(50)), Ok(Some(0x1b)));
        assert_eq!(block_on(c.read_byte_timeout(50)), Ok(None));
        assert_eq!(block_on(c.read_byte()), Err(ConsoleError::Closed));
    }
}
