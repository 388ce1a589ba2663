//! Closed-form damped spring used for entrance motion.
//!
//! The response is the step response of a mass-spring-damper starting at rest at 0 and pulled
//! toward 1. Values are clamped to `[0, 1 + overshoot_clamp]` and snap to exactly 1 once the
//! 2% settling horizon has passed, so a settled layer never jitters.

/// Damping used by pop-in words and the bold style mode.
pub const DAMPING_POP: f64 = 12.0;
/// Damping used by fade-up words, the premium style mode, and scene opacity.
pub const DAMPING_SOFT: f64 = 14.0;

/// Residual amplitude below which the spring counts as settled.
const SETTLE_THRESHOLD: f64 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    /// Largest allowed overshoot as a fraction of the target.
    pub overshoot_clamp: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
            overshoot_clamp: 0.25,
        }
    }
}

impl SpringConfig {
    pub fn with_damping(damping: f64) -> Self {
        Self {
            damping,
            ..Self::default()
        }
    }

    fn natural_frequency(&self) -> f64 {
        (self.stiffness.max(1e-9) / self.mass.max(1e-9)).sqrt()
    }

    fn damping_ratio(&self) -> f64 {
        self.damping.max(0.0) / (2.0 * (self.stiffness.max(1e-9) * self.mass.max(1e-9)).sqrt())
    }

    /// Exponential decay rate of the slowest mode, in 1/s.
    fn decay_rate(&self) -> f64 {
        let w0 = self.natural_frequency();
        let zeta = self.damping_ratio();
        if zeta > 1.0 {
            w0 * (zeta - (zeta * zeta - 1.0).sqrt())
        } else {
            zeta * w0
        }
    }

    /// First frame at which the spring reports exactly its target.
    ///
    /// An undamped spring never settles and returns `u64::MAX`.
    pub fn settle_frames(&self, fps: f64) -> u64 {
        let rate = self.decay_rate();
        if rate <= 1e-9 || fps <= 0.0 {
            return u64::MAX;
        }
        let mut secs = (1.0 / SETTLE_THRESHOLD).ln() / rate;
        if (self.damping_ratio() - 1.0).abs() < 1e-9 {
            // The critical response carries a (1 + w0*t) factor on top of the envelope.
            let w0 = self.natural_frequency();
            while (-w0 * secs).exp() * (1.0 + w0 * secs) > SETTLE_THRESHOLD {
                secs += 1.0 / fps;
            }
        }
        (secs * fps).ceil() as u64
    }
}

/// Spring progress toward 1 at `frame` (may be fractional or negative).
pub fn spring(frame: f64, fps: f64, cfg: SpringConfig) -> f64 {
    if !frame.is_finite() || frame <= 0.0 {
        return 0.0;
    }
    if fps <= 0.0 || !fps.is_finite() {
        return 1.0;
    }
    let settle = cfg.settle_frames(fps);
    if settle != u64::MAX && frame >= settle as f64 {
        return 1.0;
    }

    let t = frame / fps;
    let w0 = cfg.natural_frequency();
    let zeta = cfg.damping_ratio();
    let raw = if (zeta - 1.0).abs() < 1e-9 {
        1.0 - (-w0 * t).exp() * (1.0 + w0 * t)
    } else if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * w0 * t).exp();
        1.0 - envelope * ((wd * t).cos() + (zeta * w0 / wd) * (wd * t).sin())
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - root);
        let r2 = -w0 * (zeta + root);
        1.0 + (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r1 - r2)
    };

    if !raw.is_finite() {
        return 1.0;
    }
    raw.clamp(0.0, 1.0 + cfg.overshoot_clamp.max(0.0))
}

/// Spring from `from` to `to`.
pub fn spring_between(frame: f64, fps: f64, cfg: SpringConfig, from: f64, to: f64) -> f64 {
    from + (to - from) * spring(frame, fps, cfg)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
