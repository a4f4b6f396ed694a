//! # Leveled Logger
//!
//! A small severity-gated sink shared by the registry and its pools. It is a
//! diagnostic side channel only: nothing in the allocation path depends on
//! what gets logged.
//!
//! Every call is checked against the configured [`LogLevel`] before the
//! message is formatted, so a suppressed logger costs one comparison.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// `tracing` target used by [`TracingSink`].
pub const LOG_TARGET: &str = "revenant::pool";

/// How much the pool subsystem reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Nothing at all.
    Suppressed,
    /// Warnings and errors (misuse, exhaustion, bad names).
    #[default]
    WarningsAndErrors,
    /// Everything, including pool creation and growth.
    All,
}

impl LogLevel {
    /// Whether a message of `severity` passes this level.
    #[inline]
    #[must_use]
    pub const fn allows(self, severity: Severity) -> bool {
        match severity {
            Severity::Info => matches!(self, Self::All),
            Severity::Warning | Severity::Error => !matches!(self, Self::Suppressed),
        }
    }
}

/// Severity of a single diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Routine events (pool created, pool grew).
    Info,
    /// Misuse or exhaustion the caller should look at.
    Warning,
    /// Configuration mistakes and routing errors.
    Error,
}

/// Destination for diagnostics that passed the level gate.
pub trait LogSink: Send + Sync {
    /// Writes one message.
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>);
}

/// Forwards diagnostics to `tracing` under [`LOG_TARGET`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>) {
        match severity {
            Severity::Info => tracing::info!(target: LOG_TARGET, "{message}"),
            Severity::Warning => tracing::warn!(target: LOG_TARGET, "{message}"),
            Severity::Error => tracing::error!(target: LOG_TARGET, "{message}"),
        }
    }
}

/// A diagnostic captured by [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity it was emitted at.
    pub severity: Severity,
    /// Formatted message.
    pub message: String,
}

/// Keeps every diagnostic in memory.
///
/// Clones share the same buffer, so a caller can keep one clone and hand the
/// other to a [`PoolLogger`].
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Number of records at `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|record| record.severity == severity)
            .count()
    }

    /// True if some record at `severity` contains `needle`.
    #[must_use]
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|record| record.severity == severity && record.message.contains(needle))
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, severity: Severity, message: fmt::Arguments<'_>) {
        self.records.lock().push(LogRecord {
            severity,
            message: message.to_string(),
        });
    }
}

/// Level-gated logger injected into the registry and every pool.
///
/// The level is fixed at construction. Clones share the sink.
#[derive(Clone)]
pub struct PoolLogger {
    level: LogLevel,
    sink: Arc<dyn LogSink>,
}

impl PoolLogger {
    /// Logger writing to `tracing`.
    #[must_use]
    pub fn new(level: LogLevel) -> Self {
        Self::with_sink(level, TracingSink)
    }

    /// Logger writing to a custom sink.
    #[must_use]
    pub fn with_sink(level: LogLevel, sink: impl LogSink + 'static) -> Self {
        Self {
            level,
            sink: Arc::new(sink),
        }
    }

    /// Logger that drops everything.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(LogLevel::Suppressed)
    }

    /// The configured level.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Logs a routine event. Only emitted at [`LogLevel::All`].
    #[inline]
    pub fn info(&self, message: fmt::Arguments<'_>) {
        self.log(Severity::Info, message);
    }

    /// Logs caller misuse or exhaustion.
    #[inline]
    pub fn warn(&self, message: fmt::Arguments<'_>) {
        self.log(Severity::Warning, message);
    }

    /// Logs a configuration or routing error.
    #[inline]
    pub fn error(&self, message: fmt::Arguments<'_>) {
        self.log(Severity::Error, message);
    }

    #[inline]
    fn log(&self, severity: Severity, message: fmt::Arguments<'_>) {
        if self.level.allows(severity) {
            self.sink.emit(severity, message);
        }
    }
}

impl Default for PoolLogger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl fmt::Debug for PoolLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolLogger")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(level: LogLevel) -> (PoolLogger, RecordingSink) {
        let sink = RecordingSink::new();
        (PoolLogger::with_sink(level, sink.clone()), sink)
    }

    fn emit_one_of_each(logger: &PoolLogger) {
        logger.info(format_args!("pool grew"));
        logger.warn(format_args!("pool exhausted"));
        logger.error(format_args!("bad pool name"));
    }

    #[test]
    fn test_suppressed_emits_nothing() {
        let (logger, sink) = recorded(LogLevel::Suppressed);
        emit_one_of_each(&logger);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_warnings_level_drops_info() {
        let (logger, sink) = recorded(LogLevel::WarningsAndErrors);
        emit_one_of_each(&logger);

        assert_eq!(sink.count(Severity::Info), 0);
        assert_eq!(sink.count(Severity::Warning), 1);
        assert_eq!(sink.count(Severity::Error), 1);
    }

    #[test]
    fn test_all_level_emits_everything() {
        let (logger, sink) = recorded(LogLevel::All);
        emit_one_of_each(&logger);

        assert_eq!(sink.len(), 3);
        assert!(sink.contains(Severity::Info, "grew"));
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_clones_share_sink() {
        let (logger, sink) = recorded(LogLevel::All);
        let pool_logger = logger.clone();
        pool_logger.warn(format_args!("from a pool"));
        logger.warn(format_args!("from the registry"));
        assert_eq!(sink.count(Severity::Warning), 2);
    }

    #[test]
    fn test_default_level_matches_warnings() {
        assert_eq!(LogLevel::default(), LogLevel::WarningsAndErrors);
        assert_eq!(PoolLogger::default().level(), LogLevel::WarningsAndErrors);
    }
}
