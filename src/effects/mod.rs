//! Scene sequencing and transition presentation.
//!
//! The sequencer decides which scenes are on screen at a frame; transitions turn a scene's
//! progress through its transition window into compositing instructions.

pub mod sequencer;
pub mod transitions;
