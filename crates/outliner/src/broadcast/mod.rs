//! Broadcasting of job lifecycle events.
//!
//! Events can be streamed to any number of subscribers (a UI, a log sink, a
//! test harness) without the orchestrator knowing who is listening.

pub mod job_events;

pub use job_events::{JobEvent, JobEventBroadcaster, JobEventKind};
