//! Yes/no questions asked on the terminal.

use std::{error::Error, io::Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};

/// The answer to a confirmation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Dismissed,
}

impl Confirmation {
    /// Map a key press to an answer. Only `y` confirms.
    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('y' | 'Y') => Some(Self::Confirmed),
            KeyCode::Char('n' | 'N') | KeyCode::Enter | KeyCode::Esc => Some(Self::Dismissed),
            _ => None,
        }
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Ask `question` and wait for a single key.
pub fn ask(question: &str) -> Result<Confirmation, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(format!("{question} [y/N] "))
    )?;
    out.flush()?;

    let answer = loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            execute!(out, Print("\r\n"))?;
            return Err("interrupted".into());
        }
        if let Some(answer) = Confirmation::from_key(code) {
            break answer;
        }
    };

    execute!(out, Print("\r\n"))?;
    out.flush()?;
    Ok(answer)
}
