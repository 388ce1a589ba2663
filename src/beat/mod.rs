//! Beat analysis results and word-to-beat alignment.

pub mod align;
pub mod analysis;
