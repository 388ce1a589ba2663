/// Easing curve applied to a normalized progress value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Eased progress of `frame` through an animation lasting `duration` frames.
///
/// A zero-length animation is already complete.
pub fn eased_progress(frame: f64, duration: f64, ease: Ease) -> f64 {
    if duration <= 0.0 {
        return if frame >= 0.0 { 1.0 } else { 0.0 };
    }
    ease.apply(frame / duration)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
