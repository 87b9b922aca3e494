// Diagnostics module - on-screen error overlay
//
// Any fault the page can't handle ends up here: panics (via the process panic
// hook) and errors surfaced by the host. Only one report is shown at a time;
// a new one replaces whatever was there.
//
// Rendered format:
//   Error: <message>
//   File: <file>:<line>:<column>
//   <backtrace>

use std::backtrace::Backtrace;
use std::io::{self, Write};
use std::panic::{Location, PanicHookInfo};
use std::sync::{Arc, Mutex, MutexGuard};

/// A captured fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    /// `file:line:column`, when known
    pub location: Option<String>,
    pub stack: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            stack: String::new(),
        }
    }

    #[track_caller]
    pub fn here(message: impl Into<String>) -> Self {
        let mut report = Self::new(message);
        report.location = Some(format_location(Location::caller()));
        report
    }

    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with non-string payload".to_string());
        Self {
            message,
            location: info.location().map(format_location),
            stack: Backtrace::force_capture().to_string(),
        }
    }

    /// Errors keep their context chain as the stack
    pub fn from_error(error: &anyhow::Error) -> Self {
        let stack = error
            .chain()
            .skip(1)
            .map(|cause| format!("caused by: {}", cause))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            message: error.to_string(),
            location: None,
            stack,
        }
    }

    pub fn render_text(&self) -> String {
        let mut text = format!("Error: {}", self.message);
        if let Some(location) = &self.location {
            text.push_str("\nFile: ");
            text.push_str(location);
        }
        text.push('\n');
        text.push_str(&self.stack);
        text
    }
}

fn format_location(location: &Location<'_>) -> String {
    format!(
        "{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    )
}

/// Shared slot holding the report currently on screen
#[derive(Debug, Clone, Default)]
pub struct DiagnosticOverlay {
    current: Arc<Mutex<Option<ErrorReport>>>,
}

impl DiagnosticOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock must not hide later reports
    fn slot(&self) -> MutexGuard<'_, Option<ErrorReport>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show `report`, replacing any existing one
    pub fn report(&self, report: ErrorReport) {
        tracing::error!("Captured error: {}", report.message);
        *self.slot() = Some(report);
    }

    pub fn report_error(&self, error: &anyhow::Error) {
        self.report(ErrorReport::from_error(error));
    }

    pub fn current(&self) -> Option<ErrorReport> {
        self.slot().clone()
    }

    pub fn is_showing(&self) -> bool {
        self.slot().is_some()
    }

    pub fn dismiss(&self) {
        *self.slot() = None;
    }

    /// Print the report on screen, if any, for when the terminal UI is gone
    pub fn write_pending(&self, out: &mut impl Write) -> io::Result<bool> {
        let Some(report) = self.current() else {
            return Ok(false);
        };
        writeln!(out, "{}", report.render_text().trim_end())?;
        out.flush()?;
        Ok(true)
    }

    /// Route every panic into this overlay
    ///
    /// The default hook is replaced: while the terminal UI is up its output
    /// would land on the alternate screen. Panics that escape the UI are
    /// printed by `write_pending` once the terminal is restored.
    pub fn install_panic_hook(&self) {
        let overlay = self.clone();
        std::panic::set_hook(Box::new(move |info| {
            overlay.report(ErrorReport::from_panic(info));
        }));
    }
}
