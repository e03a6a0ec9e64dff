//! Structured logging vocabulary.
//!
//! Library code emits `tracing` events with `event = events::*` and
//! `component = COMPONENT` fields and never installs a subscriber.

pub mod events;
pub mod fields;
