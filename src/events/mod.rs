//! Events module - structured engine events and the caller-supplied sink.

mod events_model;

pub use events_model::{EngineEvent, EventSink};
