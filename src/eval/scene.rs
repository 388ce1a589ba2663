//! Scene-level presentation derived from the theme: entrance motion, typography, layout and
//! the optional full-bleed background.

use crate::{
    animation::spring::{DAMPING_POP, DAMPING_SOFT, SpringConfig, spring},
    composition::model::{
        DEFAULT_BACKGROUND_OPACITY, FontFamily, LayoutAlign, Scene, StyleMode, Theme,
    },
    foundation::math::{Extrapolate, interpolate, interpolate_clamped},
};

/// Edge padding applied when a scene is aligned to the top or bottom, in pixels.
pub const EDGE_PADDING_PX: f64 = 80.0;
/// Ken Burns zoom of a scene background over the scene's duration.
pub const BACKGROUND_ZOOM: [f64; 2] = [1.05, 1.15];

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntrance {
    pub opacity: f64,
    pub scale: f64,
    pub offset_y: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    /// CSS font stack.
    pub font_family: String,
    pub font_size_em: f64,
    pub font_weight: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    FlexStart,
    Center,
    FlexEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutFrame {
    pub justify: Justify,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundFrame {
    pub src: String,
    pub opacity: f64,
    pub scale: f64,
}

pub fn entrance(mode: StyleMode, local: u64, fps: f64) -> SceneEntrance {
    let f = local as f64;
    let soft = spring(f, fps, SpringConfig::with_damping(DAMPING_SOFT));
    SceneEntrance {
        opacity: soft,
        scale: match mode {
            StyleMode::Bold => spring(f, fps, SpringConfig::with_damping(DAMPING_POP)),
            StyleMode::Premium | StyleMode::Minimal => 1.0,
        },
        offset_y: match mode {
            StyleMode::Premium => interpolate(
                soft,
                [0.0, 1.0],
                [50.0, 0.0],
                Extrapolate::Extend,
                Extrapolate::Extend,
            ),
            StyleMode::Bold | StyleMode::Minimal => 0.0,
        },
    }
}

pub fn typography(theme: &Theme) -> Typography {
    let family = match (theme.font_family, theme.style_mode) {
        (FontFamily::Playfair, _) => "\"Playfair Display\", serif",
        (FontFamily::Oswald, _) => "\"Oswald\", sans-serif",
        (FontFamily::Bebas, _) => "\"Bebas Neue\", sans-serif",
        (FontFamily::Inter, StyleMode::Minimal) => "monospace",
        (FontFamily::Inter, _) => "\"Inter\", system-ui, sans-serif",
    };
    Typography {
        font_family: family.to_string(),
        font_size_em: if theme.style_mode == StyleMode::Bold {
            10.0
        } else {
            8.0
        },
        font_weight: if theme.style_mode == StyleMode::Minimal {
            "normal".to_string()
        } else {
            "bold".to_string()
        },
    }
}

pub fn layout(align: LayoutAlign) -> LayoutFrame {
    match align {
        LayoutAlign::Top => LayoutFrame {
            justify: Justify::FlexStart,
            padding_top: EDGE_PADDING_PX,
            padding_bottom: 0.0,
        },
        LayoutAlign::Bottom => LayoutFrame {
            justify: Justify::FlexEnd,
            padding_top: 0.0,
            padding_bottom: EDGE_PADDING_PX,
        },
        LayoutAlign::Center => LayoutFrame {
            justify: Justify::Center,
            padding_top: 0.0,
            padding_bottom: 0.0,
        },
    }
}

/// Background image with a slow zoom across the scene; `None` when the scene has no image.
pub fn background(scene: &Scene, local: u64) -> Option<BackgroundFrame> {
    let src = scene
        .background_image_url
        .as_deref()
        .filter(|s| !s.trim().is_empty())?;
    let opacity = scene
        .background_opacity
        .filter(|o| o.is_finite())
        .unwrap_or(DEFAULT_BACKGROUND_OPACITY)
        .clamp(0.0, 1.0);
    let duration = scene.effective_duration() as f64;
    Some(BackgroundFrame {
        src: src.to_string(),
        opacity,
        scale: interpolate_clamped(local as f64, [0.0, duration], BACKGROUND_ZOOM),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/eval/scene.rs"]
mod tests;
