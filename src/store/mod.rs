//! Project persistence.

pub mod repository;
