//! Terminal I/O for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// One event read from the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// Ctrl+C or Ctrl+D; treated like `/disconnect`
    Closed,
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(name: &str) {
    print!("{}> ", name);
    std::io::stdout().flush().ok();
}

/// Read lines on a dedicated thread (rustyline is synchronous).
///
/// The receiver outlives individual connections so a reconnect keeps reading
/// from the same terminal.
pub fn spawn_input_thread(name: &str) -> mpsc::UnboundedReceiver<InputEvent> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<InputEvent>();
    let prompt = format!("{}> ", name);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                input_tx.send(InputEvent::Closed).ok();
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                    }
                    if input_tx.send(InputEvent::Line(line.to_string())).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    input_tx.send(InputEvent::Closed).ok();
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    input_tx.send(InputEvent::Closed).ok();
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    input_tx.send(InputEvent::Closed).ok();
                    break;
                }
            }
        }
    });

    input_rx
}

/// Ask for a display name when none was given on the command line.
pub fn prompt_for_name() -> Result<String, ReadlineError> {
    println!("Please enter your username and press 'enter'!");
    let mut rl = DefaultEditor::new()?;
    loop {
        let name = rl.readline("> ")?;
        let name = name.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
}
