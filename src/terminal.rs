//! Terminal output collaborator.
//!
//! Thin by contract: it consumes composed frames and owns the escape-code
//! plumbing (alternate screen, clear, cursor), nothing else. Also polls the
//! keyboard so the render loop can be cancelled with q/Esc/Ctrl-C.

use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::frame::DisplayFrame;

pub struct TerminalDisplay {
    buffer: BufWriter<Stdout>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        execute!(stdout, Clear(ClearType::All))?;
        Ok(Self {
            buffer: BufWriter::new(stdout),
        })
    }

    /// Write one frame: clear, draw each fixed-width row at its own line,
    /// flush once at the frame boundary.
    pub fn draw(&mut self, frame: &DisplayFrame) -> io::Result<()> {
        queue!(self.buffer, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        for (i, line) in frame.lines().enumerate() {
            queue!(self.buffer, cursor::MoveTo(0, i as u16), Print(line))?;
        }
        self.buffer.flush()
    }

    /// True when a quit key (q, Esc, Ctrl-C) arrives within the timeout.
    pub fn poll_quit(&self, timeout: Duration) -> io::Result<bool> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                return Ok(is_quit_key(&key));
            }
        }
        Ok(false)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.buffer.flush();
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
