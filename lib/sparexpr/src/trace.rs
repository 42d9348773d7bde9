//! Diagnostic trace of expression evaluation.
//!
//! The evaluator reports each step it takes (term kind detection, coercion, function lookup,
//! results and errors) to a [`TraceSink`]. Sinks are swappable:
//! [`NoopSink`] drops everything, [`TracingSink`] forwards to the [`tracing`] facade
//! and [`MemorySink`] keeps the events in memory.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// The target used by [`TracingSink`] for its `tracing` events.
pub const TRACE_TARGET: &str = "sparexpr::trace";

/// Severity of a trace event, from the most verbose to the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraceLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// Key-value pairs attached to a trace event.
pub type TraceContext<'a> = &'a [(&'static str, &'a dyn fmt::Display)];

/// Receives evaluation trace events.
///
/// Emitting never fails and never changes the evaluation outcome.
pub trait TraceSink: Send + Sync {
    /// Returns `false` if events of this level would be dropped.
    ///
    /// Callers skip building the event context in that case.
    fn enabled(&self, _level: TraceLevel) -> bool {
        true
    }

    fn emit(&self, level: TraceLevel, message: &str, context: TraceContext<'_>);
}

/// Drops all events. It is the evaluator default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    #[inline]
    fn enabled(&self, _: TraceLevel) -> bool {
        false
    }

    #[inline]
    fn emit(&self, _: TraceLevel, _: &str, _: TraceContext<'_>) {}
}

/// Forwards events to the [`tracing`] facade under the [`TRACE_TARGET`] target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn enabled(&self, level: TraceLevel) -> bool {
        match level {
            TraceLevel::Trace => tracing::enabled!(target: TRACE_TARGET, tracing::Level::TRACE),
            TraceLevel::Debug => tracing::enabled!(target: TRACE_TARGET, tracing::Level::DEBUG),
            TraceLevel::Info => tracing::enabled!(target: TRACE_TARGET, tracing::Level::INFO),
            TraceLevel::Warn => tracing::enabled!(target: TRACE_TARGET, tracing::Level::WARN),
            TraceLevel::Error => tracing::enabled!(target: TRACE_TARGET, tracing::Level::ERROR),
        }
    }

    fn emit(&self, level: TraceLevel, message: &str, context: TraceContext<'_>) {
        let context = DisplayContext(context);
        match level {
            TraceLevel::Trace => {
                tracing::trace!(target: TRACE_TARGET, context = %context, "{message}");
            }
            TraceLevel::Debug => {
                tracing::debug!(target: TRACE_TARGET, context = %context, "{message}");
            }
            TraceLevel::Info => {
                tracing::info!(target: TRACE_TARGET, context = %context, "{message}");
            }
            TraceLevel::Warn => {
                tracing::warn!(target: TRACE_TARGET, context = %context, "{message}");
            }
            TraceLevel::Error => {
                tracing::error!(target: TRACE_TARGET, context = %context, "{message}");
            }
        }
    }
}

struct DisplayContext<'a>(TraceContext<'a>);

impl fmt::Display for DisplayContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// A trace event recorded by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub level: TraceLevel,
    pub message: String,
    pub context: Vec<(&'static str, String)>,
}

impl TraceEvent {
    /// The value recorded under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find_map(|(k, v)| (*k == key).then_some(v.as_str()))
    }
}

/// Keeps every event at or above a minimal level in memory.
///
/// ```
/// use sparexpr::{MemorySink, TraceLevel, TraceSink};
///
/// let sink = MemorySink::new(TraceLevel::Debug);
/// sink.emit(TraceLevel::Trace, "dropped", &[]);
/// sink.emit(TraceLevel::Warn, "kept", &[("function", &"STR")]);
/// let events = sink.events();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].get("function"), Some("STR"));
/// ```
#[derive(Debug)]
pub struct MemorySink {
    min_level: TraceLevel,
    events: Mutex<Vec<TraceEvent>>,
}

impl MemorySink {
    pub fn new(min_level: TraceLevel) -> Self {
        Self {
            min_level,
            events: Mutex::new(Vec::new()),
        }
    }

    /// A copy of the events recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the events recorded so far.
    pub fn take(&self) -> Vec<TraceEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(TraceLevel::Trace)
    }
}

impl TraceSink for MemorySink {
    #[inline]
    fn enabled(&self, level: TraceLevel) -> bool {
        level >= self.min_level
    }

    fn emit(&self, level: TraceLevel, message: &str, context: TraceContext<'_>) {
        if !self.enabled(level) {
            return;
        }
        let event = TraceEvent {
            level,
            message: message.to_owned(),
            context: context
                .iter()
                .map(|(key, value)| (*key, value.to_string()))
                .collect(),
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
