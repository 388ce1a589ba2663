use crate::{
    composition::model::TransitionType,
    foundation::core::{Affine, Canvas},
};

/// Edge a wipe reveals from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WipeDir {
    LeftToRight,
}

/// Region of a scene that stays visible while compositing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SceneClip {
    None,
    /// Linear reveal covering `reveal` of the canvas along `dir`.
    Wipe { dir: WipeDir, reveal: f64 },
    /// Clockwise radial reveal from 12 o'clock covering `sweep_deg` degrees.
    Radial { sweep_deg: f64 },
}

/// How one scene is composited onto the frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneComposite {
    pub opacity: f64,
    /// Pixel-space transform applied to the whole scene.
    pub transform: Affine,
    /// Rotation about the horizontal axis, in degrees. Backfaces are hidden.
    pub rotate_x_deg: f64,
    pub clip: SceneClip,
    /// Paint order within the frame; higher draws on top.
    pub z: i32,
}

impl SceneComposite {
    pub fn identity() -> Self {
        Self {
            opacity: 1.0,
            transform: Affine::IDENTITY,
            rotate_x_deg: 0.0,
            clip: SceneClip::None,
            z: 0,
        }
    }

    /// `false` once a flip has turned the scene's back to the viewer.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.rotate_x_deg.abs() < 90.0
    }
}

impl Default for SceneComposite {
    fn default() -> Self {
        Self::identity()
    }
}

/// Compositing for the exiting and entering scenes at `progress` through a transition.
///
/// `TransitionType::None` keeps the exiting scene on top unchanged.
pub fn present(
    kind: TransitionType,
    progress: f64,
    canvas: Canvas,
) -> (SceneComposite, SceneComposite) {
    let p = progress.clamp(0.0, 1.0);
    let exiting = SceneComposite {
        z: 0,
        ..SceneComposite::identity()
    };
    let entering = SceneComposite {
        z: 1,
        ..SceneComposite::identity()
    };
    let w = f64::from(canvas.width);

    match kind {
        TransitionType::None => (
            SceneComposite { z: 1, ..exiting },
            SceneComposite {
                opacity: 0.0,
                z: 0,
                ..entering
            },
        ),
        TransitionType::Fade => (
            exiting,
            SceneComposite {
                opacity: p,
                ..entering
            },
        ),
        TransitionType::Slide => (
            SceneComposite {
                transform: Affine::translate((-p * w, 0.0)),
                ..exiting
            },
            SceneComposite {
                transform: Affine::translate(((1.0 - p) * w, 0.0)),
                ..entering
            },
        ),
        TransitionType::Flip => (
            SceneComposite {
                rotate_x_deg: 180.0 * p,
                ..exiting
            },
            SceneComposite {
                rotate_x_deg: -180.0 * (1.0 - p),
                ..entering
            },
        ),
        TransitionType::Wipe => (
            exiting,
            SceneComposite {
                clip: SceneClip::Wipe {
                    dir: WipeDir::LeftToRight,
                    reveal: p,
                },
                ..entering
            },
        ),
        TransitionType::ClockWipe => (
            exiting,
            SceneComposite {
                clip: SceneClip::Radial {
                    sweep_deg: 360.0 * p,
                },
                ..entering
            },
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
