//! Interactive mapping session over the UART console
//!
//! Reads keystrokes, turns them into editor commands (line or key mode),
//! applies them and renders the editor view after each one.

use alloc::string::{String, ToString};

use defmt::*;
use heapless::Deque;

use sonyvfd_core::editor::{Editor, InputMode, Outcome};
use sonyvfd_core::traits::PanelDriver;
use sonyvfd_hal_rp2040::console::{Console, ConsoleError, NEWLINE};
use sonyvfd_protocol::{Command, Key, KeyDecoder, LineEditor, LineEvent, KEY_ESC_TIMEOUT_MS};

use crate::config::Persistence;

/// Line-mode prompt
const PROMPT: &str = "> ";

/// Key-mode prefix for a one-off command line
const COMMAND_KEY: char = ':';

/// Terminal sequence erasing the character left of the cursor
const ERASE: &str = "\x08 \x08";

/// Session errors
#[derive(Debug)]
pub enum SessionError<E> {
    /// Panel bus failure
    Panel(E),
    /// Console link failure
    Console(ConsoleError),
}

impl<E> From<ConsoleError> for SessionError<E> {
    fn from(e: ConsoleError) -> Self {
        SessionError::Console(e)
    }
}

/// What one read of operator input produced
enum Input {
    /// A command to apply
    Command(Command),
    /// Input that maps to nothing; just prompt again
    Ignored,
    /// A line that failed to parse
    Invalid(&'static str),
    /// Ctrl-C
    Interrupt,
}

/// Keystroke source with escape decoding and line assembly
struct Keyboard {
    decoder: KeyDecoder,
    /// Decoded keys not yet consumed
    queue: Deque<Key, 4>,
    line: LineEditor,
}

impl Keyboard {
    fn new() -> Self {
        Self {
            decoder: KeyDecoder::new(),
            queue: Deque::new(),
            line: LineEditor::new(),
        }
    }

    /// Next decoded key
    ///
    /// While an escape sequence is incomplete the wait is bounded, so a
    /// lone ESC still arrives as [`Key::Escape`].
    async fn read_key<C: Console>(&mut self, console: &mut C) -> Result<Key, ConsoleError> {
        loop {
            if let Some(key) = self.queue.pop_front() {
                return Ok(key);
            }

            if self.decoder.is_pending() {
                match console.read_byte_timeout(KEY_ESC_TIMEOUT_MS).await? {
                    Some(byte) => self.push(byte),
                    None => {
                        if let Some(key) = self.decoder.timeout() {
                            return Ok(key);
                        }
                    }
                }
            } else {
                let byte = console.read_byte().await?;
                self.push(byte);
            }
        }
    }

    fn push(&mut self, byte: u8) {
        for key in self.decoder.feed(byte) {
            if self.queue.push_back(key).is_err() {
                warn!("Key queue full, dropping key");
            }
        }
    }

    /// Read one edited line and parse it
    async fn read_command_line<C: Console>(&mut self, console: &mut C) -> Result<Input, ConsoleError> {
        loop {
            let key = self.read_key(console).await?;
            match self.line.feed(key) {
                LineEvent::None => {}
                LineEvent::Echo(c) => {
                    let mut utf8 = [0u8; 4];
                    console.write_str(c.encode_utf8(&mut utf8)).await?;
                }
                LineEvent::Erase => console.write_str(ERASE).await?,
                LineEvent::Submit(line) => {
                    console.write_str(NEWLINE).await?;
                    return Ok(match Command::parse(&line) {
                        Ok(command) => Input::Command(command),
                        Err(e) => Input::Invalid(e.message()),
                    });
                }
                LineEvent::Interrupt => {
                    console.write_str(NEWLINE).await?;
                    return Ok(Input::Interrupt);
                }
            }
        }
    }

    /// Read input in the editor's current mode
    async fn read<C: Console>(&mut self, mode: InputMode, console: &mut C) -> Result<Input, ConsoleError> {
        match mode {
            InputMode::Line => {
                console.write_str(PROMPT).await?;
                self.read_command_line(console).await
            }
            InputMode::Keys => {
                let key = self.read_key(console).await?;
                if key == Key::Char(COMMAND_KEY) {
                    console.write_str(":").await?;
                    return self.read_command_line(console).await;
                }
                Ok(match key.command() {
                    Some(command) => Input::Command(command),
                    None => Input::Ignored,
                })
            }
        }
    }
}

/// Run the mapping tool until the operator quits
///
/// The panel is blanked on the way out, also after Ctrl-C.
pub async fn run<P, C>(
    editor: &mut Editor,
    panel: &mut P,
    console: &mut C,
    store: &mut Persistence<'_>,
) -> Result<(), SessionError<P::Error>>
where
    P: PanelDriver,
    C: Console,
{
    info!("Mapping session started");
    editor.start(panel).map_err(SessionError::Panel)?;

    let mut keyboard = Keyboard::new();
    let mut message: Option<String> = None;

    loop {
        if let Some(view) = editor.refresh(panel).map_err(SessionError::Panel)? {
            console.write_str(&view.to_string()).await?;
        }
        if let Some(text) = message.take() {
            console.write_line(&text).await?;
        }

        let command = match keyboard.read(editor.input_mode(), console).await? {
            Input::Command(command) => command,
            Input::Ignored => continue,
            Input::Invalid(reason) => {
                message = Some(reason.to_string());
                continue;
            }
            Input::Interrupt => break,
        };

        debug!("Command: {}", command);

        match editor.apply(command, panel).map_err(SessionError::Panel)? {
            Outcome::Continue => {}
            Outcome::Message(text) => message = Some(text),
            Outcome::Dump(json) => console.write_line(&json).await?,
            Outcome::Save(document) => {
                message = Some(match store.save_mappings(&document).await {
                    Ok(()) => alloc::format!("Saved {} bytes", document.len()),
                    Err(e) => {
                        warn!("Saving mappings failed: {}", e);
                        alloc::format!("Error saving: {:?}", e)
                    }
                });
            }
            Outcome::Quit => break,
        }
    }

    editor.shutdown(panel).map_err(SessionError::Panel)?;
    console.write_line("Exiting.").await?;
    info!("Mapping session ended");
    Ok(())
}
