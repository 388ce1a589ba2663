//! The timeline data model and everything that builds, checks, queries, or edits it.

/// Builders for timelines, scenes and layers.
pub mod dsl;
/// Copy-on-write editing.
pub mod edit;
/// Serde boundary types.
pub mod model;
/// Read-only helpers over a timeline.
pub mod query;
/// Structural validation.
pub mod validate;
