use crate::{
    composition::model::Theme,
    foundation::math::{Extrapolate, floor_div, interpolate},
};

pub const GRAIN_OPACITY: f64 = 0.06;
/// Grain pattern is re-seeded every this many frames.
pub const GRAIN_HOLD_FRAMES: i64 = 3;
pub const LIGHT_LEAK_INTENSITY: f64 = 0.3;

/// Film grain and light leak drawn over the whole video.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVfx {
    pub grain: Grain,
    pub light_leak: LightLeak,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Grain {
    pub opacity: f64,
    pub seed: i64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightLeak {
    /// Centre of the leak as a percentage of the canvas; drifts past the edges.
    pub x_pct: f64,
    pub y_pct: f64,
    pub opacity: f64,
    pub color: String,
    pub blend_mode: &'static str,
}

/// Overlay state at global `frame`, or `None` when the theme disables it.
pub fn global_vfx(theme: &Theme, frame: u64, total_frames: u64) -> Option<GlobalVfx> {
    if !theme.enable_global_vfx {
        return None;
    }
    let f = frame as f64;
    let span = [0.0, total_frames as f64];
    let extend = Extrapolate::Extend;
    Some(GlobalVfx {
        grain: Grain {
            opacity: GRAIN_OPACITY,
            seed: floor_div(i64::try_from(frame).unwrap_or(i64::MAX), GRAIN_HOLD_FRAMES),
        },
        light_leak: LightLeak {
            x_pct: interpolate(f, span, [-20.0, 120.0], extend, extend),
            y_pct: interpolate(f, span, [120.0, -20.0], extend, extend),
            opacity: (LIGHT_LEAK_INTENSITY + (f / 15.0).sin() * 0.1).clamp(0.0, 1.0),
            color: theme.primary_color.clone(),
            blend_mode: "screen",
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/eval/vfx.rs"]
mod tests;
