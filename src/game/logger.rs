//! Battle log capture
//!
//! Centralized logger for battle narration. Lines are written once and
//! either printed, captured in an in-memory buffer for the presentation
//! layer, or both. The engine defaults to Memory so embedding it in a UI
//! never spams stdout; the CLI driver switches to Stdout.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for battle output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output
    Silent = 0,
    /// Minimal - only match outcome
    Minimal = 1,
    /// Normal - rounds, guesses, damage (default)
    #[default]
    Normal = 2,
    /// Verbose - every card grant and modifier change
    Verbose = 3,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Print to stdout only
    Stdout,
    /// Capture to the in-memory buffer only (default)
    #[default]
    Memory,
    /// Both stdout and the buffer
    Both,
}

/// A captured narration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
}

/// Guard providing read-only, slice-like access to captured entries.
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    buffer: RefCell<Vec<LogEntry>>,
}

impl BattleLogger {
    pub fn new() -> Self {
        BattleLogger {
            verbosity: VerbosityLevel::default(),
            output_mode: OutputMode::default(),
            buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        BattleLogger {
            verbosity,
            ..Self::new()
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Log a minimal-level line (match outcomes).
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, message);
    }

    /// Log a normal-level line (rounds, guesses, damage).
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message);
    }

    /// Log a verbose-level line (modifier bookkeeping).
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, message);
    }

    pub fn log(&self, level: VerbosityLevel, message: &str) {
        if level > self.verbosity {
            return;
        }
        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) {
            println!("{message}");
        }
        if matches!(self.output_mode, OutputMode::Memory | OutputMode::Both) {
            self.buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
            });
        }
    }

    /// Read access to captured entries.
    pub fn entries(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.buffer.borrow(),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.borrow_mut().clear();
    }
}

impl Default for BattleLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_capture() {
        let logger = BattleLogger::new();
        logger.normal("first");
        logger.minimal("second");
        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].level, VerbosityLevel::Minimal);
    }

    #[test]
    fn test_verbosity_filtering() {
        let logger = BattleLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.normal("dropped");
        logger.verbose("also dropped");
        logger.minimal("kept");
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn test_silent_drops_everything() {
        let logger = BattleLogger::with_verbosity(VerbosityLevel::Silent);
        logger.minimal("outcome");
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut logger = BattleLogger::new();
        logger.normal("line");
        logger.clear();
        assert!(logger.entries().is_empty());
    }
}
