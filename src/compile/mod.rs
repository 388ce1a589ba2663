//! Derived data computed from evaluated frames.

/// Content fingerprints used for static frame elision.
pub mod fingerprint;
