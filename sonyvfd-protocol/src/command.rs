//! Operator command language
//!
//! One command per line, words separated by whitespace:
//!
//! | Input              | Command                       |
//! |--------------------|-------------------------------|
//! | *(empty)*, `n`     | next bit                      |
//! | `p`                | previous bit                  |
//! | `N`, `P`           | next / previous grid          |
//! | `jump <g> [b]`     | jump to grid (and bit)        |
//! | `map <name>`       | bind a name to the cursor     |
//! | `mode <hex>`       | controller display mode       |
//! | `bright <0-7>`     | dimming level                 |
//! | `led <0-15>`       | LED port bitmap               |
//! | `test`             | light every segment           |
//! | `dump`             | print the mapping document    |
//! | `keys`             | switch to key mode            |
//! | `save`, `q`        | persist / quit                |
//!
//! `N` and `P` are the only case-sensitive words; everything else matches
//! regardless of case.

use heapless::String;

/// Maximum length of a logical name given to `map`
pub const MAX_NAME_LEN: usize = 32;

/// Errors from parsing an operator command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Command word not recognised
    UnknownCommand,
    /// Command needs an argument that was not given
    MissingArgument,
    /// Argument is not a number (or out of the accepted range)
    InvalidNumber,
    /// Name argument longer than [`MAX_NAME_LEN`]
    TooLong,
}

impl CommandError {
    /// Short human-readable description for the console
    pub fn message(self) -> &'static str {
        match self {
            CommandError::UnknownCommand => "Unknown command (try 'help')",
            CommandError::MissingArgument => "Missing argument",
            CommandError::InvalidNumber => "Invalid number",
            CommandError::TooLong => "Name too long",
        }
    }
}

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Advance one bit, wrapping into the next grid
    NextBit,
    /// Retreat one bit, wrapping into the previous grid
    PrevBit,
    /// Jump to bit 0 of the next grid
    NextGrid,
    /// Jump to bit 0 of the previous grid
    PrevGrid,
    /// Jump to an explicit coordinate (bit defaults to 0)
    Jump { grid: u32, bit: Option<u32> },
    /// Bind a logical name to the cursor coordinate
    Map(String<MAX_NAME_LEN>),
    /// Send a mode-select command (mode nibble 0x0-0xF)
    Mode(u8),
    /// Set the dimming level (clamped to 0-7 by the driver)
    Brightness(u8),
    /// Write the LED port (low 4 bits)
    Leds(u8),
    /// Light every segment in the active window
    TestPattern,
    /// Print the mapping document to the console
    Dump,
    /// Persist the mapping
    Save,
    /// Switch to single-keypress input
    KeyMode,
    /// Switch back to line input
    LineMode,
    /// Show the controls
    Help,
    /// Leave the editor
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let word = match words.next() {
            Some(word) => word,
            // Bare Enter steps to the next bit
            None => return Ok(Command::NextBit),
        };

        // Case-sensitive single letters first
        match word {
            "n" => return Ok(Command::NextBit),
            "p" => return Ok(Command::PrevBit),
            "N" => return Ok(Command::NextGrid),
            "P" => return Ok(Command::PrevGrid),
            _ => {}
        }

        if word.eq_ignore_ascii_case("jump") {
            let grid = parse_decimal(words.next().ok_or(CommandError::MissingArgument)?)?;
            let bit = match words.next() {
                Some(arg) => Some(parse_decimal(arg)?),
                None => None,
            };
            Ok(Command::Jump { grid, bit })
        } else if word.eq_ignore_ascii_case("map") {
            let name = words.next().ok_or(CommandError::MissingArgument)?;
            let mut owned = String::new();
            owned.push_str(name).map_err(|_| CommandError::TooLong)?;
            Ok(Command::Map(owned))
        } else if word.eq_ignore_ascii_case("mode") {
            let arg = words.next().ok_or(CommandError::MissingArgument)?;
            let mode = parse_hex(arg)?;
            if mode > 0x0F {
                return Err(CommandError::InvalidNumber);
            }
            Ok(Command::Mode(mode))
        } else if word.eq_ignore_ascii_case("bright") {
            let arg = words.next().ok_or(CommandError::MissingArgument)?;
            // Any level is accepted; the panel clamps it
            let level = parse_decimal(arg)?;
            Ok(Command::Brightness(u8::try_from(level).unwrap_or(u8::MAX)))
        } else if word.eq_ignore_ascii_case("led") {
            let arg = words.next().ok_or(CommandError::MissingArgument)?;
            Ok(Command::Leds(parse_u8(arg)?))
        } else if word.eq_ignore_ascii_case("test") {
            Ok(Command::TestPattern)
        } else if word.eq_ignore_ascii_case("dump") {
            Ok(Command::Dump)
        } else if word.eq_ignore_ascii_case("save") {
            Ok(Command::Save)
        } else if word.eq_ignore_ascii_case("keys") {
            Ok(Command::KeyMode)
        } else if word.eq_ignore_ascii_case("help") || word == "?" {
            Ok(Command::Help)
        } else if word.eq_ignore_ascii_case("q") || word.eq_ignore_ascii_case("quit") {
            Ok(Command::Quit)
        } else {
            Err(CommandError::UnknownCommand)
        }
    }
}

fn parse_decimal(arg: &str) -> Result<u32, CommandError> {
    arg.parse().map_err(|_| CommandError::InvalidNumber)
}

fn parse_u8(arg: &str) -> Result<u8, CommandError> {
    arg.parse().map_err(|_| CommandError::InvalidNumber)
}

fn parse_hex(arg: &str) -> Result<u8, CommandError> {
    let digits = arg
        .strip_prefix("0x")
        .or_else(|| arg.strip_prefix("0X"))
        .unwrap_or(arg);
    u8::from_str_radix(digits, 16).map_err(|_| CommandError::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_is_next_bit() {
        assert_eq!(Command::parse(""), Ok(Command::NextBit));
        assert_eq!(Command::parse("   "), Ok(Command::NextBit));
    }

    #[test]
    fn test_movement_letters_are_case_sensitive() {
        assert_eq!(Command::parse("n"), Ok(Command::NextBit));
        assert_eq!(Command::parse("p"), Ok(Command::PrevBit));
        assert_eq!(Command::parse("N"), Ok(Command::NextGrid));
        assert_eq!(Command::parse("P"), Ok(Command::PrevGrid));
    }

    #[test]
    fn test_jump() {
        assert_eq!(
            Command::parse("jump 3 7"),
            Ok(Command::Jump {
                grid: 3,
                bit: Some(7)
            })
        );
        assert_eq!(
            Command::parse("JUMP 11"),
            Ok(Command::Jump { grid: 11, bit: None })
        );
        assert_eq!(Command::parse("jump"), Err(CommandError::MissingArgument));
        assert_eq!(Command::parse("jump x"), Err(CommandError::InvalidNumber));
        assert_eq!(Command::parse("jump 1 -2"), Err(CommandError::InvalidNumber));
    }

    #[test]
    fn test_map() {
        let cmd = Command::parse("map icon_play").unwrap();
        match cmd {
            Command::Map(name) => assert_eq!(name.as_str(), "icon_play"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(Command::parse("map"), Err(CommandError::MissingArgument));
    }

    #[test]
    fn test_map_name_too_long() {
        let line = "map aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa_b";
        assert_eq!(Command::parse(line), Err(CommandError::TooLong));
    }

    #[test]
    fn test_mode_is_hex() {
        assert_eq!(Command::parse("mode 3"), Ok(Command::Mode(0x03)));
        assert_eq!(Command::parse("mode 0x0a"), Ok(Command::Mode(0x0A)));
        assert_eq!(Command::parse("mode B"), Ok(Command::Mode(0x0B)));
        assert_eq!(Command::parse("mode 10"), Err(CommandError::InvalidNumber));
        assert_eq!(Command::parse("mode zz"), Err(CommandError::InvalidNumber));
    }

    #[test]
    fn test_bright_and_led() {
        assert_eq!(Command::parse("bright 5"), Ok(Command::Brightness(5)));
        assert_eq!(Command::parse("bright 9"), Ok(Command::Brightness(9)));
        assert_eq!(Command::parse("bright 300"), Ok(Command::Brightness(u8::MAX)));
        assert_eq!(Command::parse("bright hi"), Err(CommandError::InvalidNumber));
        assert_eq!(Command::parse("led 15"), Ok(Command::Leds(15)));
        assert_eq!(Command::parse("led"), Err(CommandError::MissingArgument));
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(Command::parse("save"), Ok(Command::Save));
        assert_eq!(Command::parse("SAVE"), Ok(Command::Save));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse("Q"), Ok(Command::Quit));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("test"), Ok(Command::TestPattern));
        assert_eq!(Command::parse("dump"), Ok(Command::Dump));
        assert_eq!(Command::parse("keys"), Ok(Command::KeyMode));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(Command::parse("frobnicate"), Err(CommandError::UnknownCommand));
    }
}
