//! Streaming evaluated frames to consumers.

/// Render requests and the chunked evaluation loop.
pub mod job;
/// Frame sink trait and built-in sinks.
pub mod sink;
