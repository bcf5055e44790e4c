//! Terminal detection and decoration.
//!
//! Colour is only applied when stdout is a terminal, so redirected reports
//! stay plain text.
use crossterm::style::{style, Stylize};
use crossterm::terminal;
use std::io::{self, IsTerminal, Write};
use tdu_core::config::clamp_width;
use tdu_core::PROGRAM_VERSION;

#[derive(Debug, Clone, Copy)]
pub struct Console {
    /// Display width in columns, already clamped.
    pub width: usize,
    /// Stdout is attached to a terminal.
    pub tty: bool,
}

impl Console {
    pub fn detect() -> Self {
        let tty = io::stdout().is_terminal();
        let detected = if tty {
            terminal::size().ok().map(|(cols, _)| usize::from(cols))
        } else {
            None
        };
        Self {
            width: clamp_width(detected),
            tty,
        }
    }

    pub fn banner<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let title = banner_title();
        if self.tty {
            writeln!(w, "\n{}\n", style(&title).bold().cyan())?;
        } else {
            writeln!(w, "\n{title}\n")?;
        }
        writeln!(w, "  Operating system: {}", std::env::consts::OS)
    }

    /// A highlighted status line.
    pub fn status<W: Write>(&self, w: &mut W, text: &str) -> io::Result<()> {
        if self.tty {
            writeln!(w, "{}", style(text).bold())
        } else {
            writeln!(w, "{text}")
        }
    }

    /// A fatal error message on stderr.
    pub fn error(&self, text: &str) {
        let mut err = io::stderr().lock();
        if io::stderr().is_terminal() {
            let _ = writeln!(err, "{}", style(text).red().bold());
        } else {
            let _ = writeln!(err, "{text}");
        }
    }
}

pub fn banner_title() -> String {
    format!("=========== Top Disk Usage v{PROGRAM_VERSION} (GNU GPL) ===========")
}
