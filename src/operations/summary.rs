//! Run summary
//!
//! Counters are only ever incremented; the driver owns one `RunSummary`
//! per run and hands it to each step explicitly.

use core::fmt::Write as _;

/// Something that happened during a run and is worth counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    Copied,
    Overwritten,
    Skipped,
    DockerSkipped,
    WouldCopy,
    WouldOverwrite,
    ProcessRan,
    ProcessFailed,
    ProcessSkipped,
    FileWrite,
    FileWriteSkipped,
}

/// Counters accumulated across a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub copied: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub docker_skipped: usize,
    pub would_copy: usize,
    pub would_overwrite: usize,
    pub processes_ran: usize,
    pub processes_failed: usize,
    pub processes_skipped: usize,
    pub file_writes: usize,
    pub file_writes_skipped: usize,
}

impl RunSummary {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event
    #[inline]
    pub const fn record(&mut self, event: RunEvent) {
        let counter = match event {
            RunEvent::Copied => &mut self.copied,
            RunEvent::Overwritten => &mut self.overwritten,
            RunEvent::Skipped => &mut self.skipped,
            RunEvent::DockerSkipped => &mut self.docker_skipped,
            RunEvent::WouldCopy => &mut self.would_copy,
            RunEvent::WouldOverwrite => &mut self.would_overwrite,
            RunEvent::ProcessRan => &mut self.processes_ran,
            RunEvent::ProcessFailed => &mut self.processes_failed,
            RunEvent::ProcessSkipped => &mut self.processes_skipped,
            RunEvent::FileWrite => &mut self.file_writes,
            RunEvent::FileWriteSkipped => &mut self.file_writes_skipped,
        };
        *counter += 1;
    }

    /// Counters in display order
    #[must_use]
    pub const fn rows(&self) -> [(&'static str, usize); 11] {
        [
            ("Files copied", self.copied),
            ("Files overwritten", self.overwritten),
            ("Files skipped", self.skipped),
            ("Docker files skipped", self.docker_skipped),
            ("Files that would be copied", self.would_copy),
            ("Files that would be overwritten", self.would_overwrite),
            ("Commands run", self.processes_ran),
            ("Commands failed", self.processes_failed),
            ("Commands skipped", self.processes_skipped),
            ("Config files written", self.file_writes),
            ("Config writes skipped", self.file_writes_skipped),
        ]
    }

    /// Fixed-order table of every counter, zeros included
    #[must_use]
    pub fn render(&self) -> String {
        let rows = self.rows();
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        let mut table = String::from("Run summary\n");
        for (label, count) in rows {
            // Writing into a String cannot fail
            let _ = writeln!(table, "  {label:<width$}  {count:>5}");
        }
        table
    }
}
