//! Leveled diagnostics sink handed to every component at construction.
//!
//! Components never reach for a global logger; they receive a
//! [`Diagnostics`] reference and report through it. Reporting cannot fail.

use std::fmt;

/// Verbosity of a diagnostic message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Detail useful only while debugging a floor.
    Debug,
    /// Normal progress reports.
    Info,
    /// Recoverable misuse.
    Warning,
    /// Failures that left a component unusable.
    Error,
}

/// Sink accepting leveled messages tagged with the reporting component.
pub trait Diagnostics {
    /// Records a message. Implementations must not panic.
    fn emit(&self, severity: Severity, source: &str, message: fmt::Arguments<'_>);

    /// Records a [`Severity::Debug`] message.
    fn debug(&self, source: &str, message: fmt::Arguments<'_>) {
        self.emit(Severity::Debug, source, message);
    }

    /// Records a [`Severity::Info`] message.
    fn info(&self, source: &str, message: fmt::Arguments<'_>) {
        self.emit(Severity::Info, source, message);
    }

    /// Records a [`Severity::Warning`] message.
    fn warning(&self, source: &str, message: fmt::Arguments<'_>) {
        self.emit(Severity::Warning, source, message);
    }

    /// Records a [`Severity::Error`] message.
    fn error(&self, source: &str, message: fmt::Arguments<'_>) {
        self.emit(Severity::Error, source, message);
    }
}

/// Forwards diagnostics to `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, severity: Severity, source: &str, message: fmt::Arguments<'_>) {
        match severity {
            Severity::Debug => tracing::debug!(source, "{message}"),
            Severity::Info => tracing::info!(source, "{message}"),
            Severity::Warning => tracing::warn!(source, "{message}"),
            Severity::Error => tracing::error!(source, "{message}"),
        }
    }
}
