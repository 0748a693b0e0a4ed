use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::ledger::GainRecord;

/// Structured event emitted by the engine while processing trades.
///
/// Replaces the process-wide logger the engine would otherwise need:
/// callers decide whether events end up in a log file, a channel or a
/// report.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineEvent {
    /// A lot was consumed and a gain/loss realized.
    GainRealized(GainRecord),
    /// A non-fatal condition was corrected in place (e.g. a fee charged
    /// in a currency that matches neither trade side was zeroed).
    Warning {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },
}

/// Caller-supplied callback the engine invokes for each [`EngineEvent`].
///
/// Cloneable so the same sink can feed the normalizer and the ledger.
#[derive(Clone, Default)]
pub struct EventSink(Option<Arc<dyn Fn(&EngineEvent) + Send + Sync>>);

impl EventSink {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        EventSink(Some(Arc::new(callback)))
    }

    /// A sink that discards every event.
    pub fn noop() -> Self {
        EventSink(None)
    }

    pub fn emit(&self, event: &EngineEvent) {
        if let Some(callback) = &self.0 {
            callback(event);
        }
    }

    pub fn warn(&self, message: impl Into<String>, timestamp: Option<DateTime<Utc>>) {
        self.emit(&EngineEvent::Warning {
            message: message.into(),
            timestamp,
        });
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventSink")
            .field(&self.0.as_ref().map(|_| "callback"))
            .finish()
    }
}
