//! The generation pipeline: upload, beat analysis, script enhancement, timeline synthesis, and
//! render submission.

/// Upload validation and uploaded-asset records.
pub mod assets;
/// Live providers over HTTP.
pub mod http;
/// Deterministic in-process providers.
pub mod mock;
/// Stage ordering, timeouts, and project bookkeeping.
pub mod orchestrator;
/// Provider traits and provider selection.
pub mod providers;
/// Client retry with backoff.
pub mod retry;
/// Script validation and text heuristics.
pub mod script;
/// Deterministic timeline synthesis.
pub mod synthesis;
