//! Colored terminal output.
//!
//! Respects `NO_COLOR` and only colors when stdout/stderr are terminals.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes user-facing messages, honoring verbose and quiet modes.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    fn choice(is_terminal: bool) -> ColorChoice {
        if std::env::var_os("NO_COLOR").is_some() || !is_terminal {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        }
    }

    fn stdout() -> StandardStream {
        StandardStream::stdout(Self::choice(io::stdout().is_terminal()))
    }

    fn stderr() -> StandardStream {
        StandardStream::stderr(Self::choice(io::stderr().is_terminal()))
    }

    fn write_tagged(
        stream: &mut StandardStream,
        color: Color,
        tag: &str,
        message: &str,
    ) -> io::Result<()> {
        stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stream, "{tag}")?;
        stream.reset()?;
        writeln!(stream, " {message}")
    }

    /// Plain line, suppressed in quiet mode.
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(Self::stdout(), "{message}")
    }

    /// Detail shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        let mut stream = Self::stdout();
        stream.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(stream, "  {message}")?;
        stream.reset()
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::write_tagged(&mut Self::stdout(), Color::Cyan, "→", message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::write_tagged(&mut Self::stdout(), Color::Green, "✓", message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::write_tagged(&mut Self::stderr(), Color::Yellow, "⚠", message)
    }

    /// Errors are printed even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        Self::write_tagged(&mut Self::stderr(), Color::Red, "✗", message)
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stream = Self::stdout();
        stream.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(stream, "\n{title}")?;
        stream.reset()
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(Self::stdout(), "  {message}")
    }
}
