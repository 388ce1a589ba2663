//! Time curves: easing functions and the damped spring.

pub mod ease;
pub mod spring;
