//! Progress reporting for directory scans.
//!
//! Keeps the scanning loop free of terminal concerns (crossterm).

use std::io::{self, Write};

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use super::SizeMeasurement;

/// Receives the running total while a scan is in flight.
pub trait ProgressSink {
    /// Called after every file entry with the running total.
    fn update(&mut self, current: &SizeMeasurement) -> io::Result<()>;

    /// Called once with the final total.
    fn finish(&mut self, total: &SizeMeasurement) -> io::Result<()>;
}

/// Single evolving status line on a terminal.
pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl ConsoleProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ProgressSink for ConsoleProgress<W> {
    fn update(&mut self, current: &SizeMeasurement) -> io::Result<()> {
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("Current total size: {current}"))
        )?;
        self.out.flush()
    }

    fn finish(&mut self, total: &SizeMeasurement) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Final total size: {total}")?;
        self.out.flush()
    }
}

/// Discards all progress, for JSON mode and tests.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn update(&mut self, _current: &SizeMeasurement) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self, _total: &SizeMeasurement) -> io::Result<()> {
        Ok(())
    }
}
