use std::collections::HashSet;

use crate::{
    animation::spring::{DAMPING_POP, DAMPING_SOFT, SpringConfig, spring},
    beat::align::align,
    composition::model::{TextAnimation, TextStyle},
    foundation::core::Vec2,
    foundation::math::{floor_div, interpolate_clamped, noise01},
};

/// Frames between consecutive words for `fade`.
pub const FADE_STAGGER: i64 = 2;
/// Frames between consecutive words for `pop-in` and `fade-up`.
pub const SPRING_STAGGER: i64 = 3;
/// Frames per revealed character for `typing`.
pub const TYPING_FRAMES_PER_CHAR: i64 = 2;
/// Glitch noise is resampled every this many frames.
pub const GLITCH_HOLD_FRAMES: i64 = 4;
/// Noise threshold above which a word glitches.
pub const GLITCH_THRESHOLD: f64 = 0.8;
/// Frames over which a beat-bound word's impact decays.
pub const BEAT_IMPACT_FRAMES: i64 = 8;
/// Extra scale applied to a word at the peak of its beat impact.
pub const BEAT_IMPACT_SCALE: f64 = 0.2;

/// Colour of a text fill or stroke.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Paint {
    Inherit,
    Color(String),
    Transparent,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset: Vec2,
    pub blur_px: f64,
    pub color: String,
}

impl Shadow {
    fn glow(blur_px: f64, color: &str) -> Self {
        Self {
            offset: Vec2::ZERO,
            blur_px,
            color: color.to_string(),
        }
    }

    fn hard(dx: f64, color: &str) -> Self {
        Self {
            offset: Vec2::new(dx, 0.0),
            blur_px: 0.0,
            color: color.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub width_px: f64,
    pub paint: Paint,
}

/// One character of a word when characters are revealed individually.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CharFrame {
    pub ch: char,
    pub visible: bool,
}

/// Fully resolved state of one word.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFrame {
    pub index: usize,
    pub text: String,
    pub highlighted: bool,
    pub opacity: f64,
    pub scale: f64,
    /// Pixel offset from the word's laid-out position.
    pub offset: Vec2,
    pub skew_x_deg: f64,
    pub fill: Paint,
    pub stroke: Option<Stroke>,
    pub text_shadows: Vec<Shadow>,
    pub drop_shadow: Option<Shadow>,
    /// Present when characters are revealed one by one.
    pub chars: Option<Vec<CharFrame>>,
    /// Decaying `1 -> 0` emphasis after the beat this word is bound to.
    pub beat_impact: f64,
}

/// Inputs for word-level evaluation of one text layer.
pub(crate) struct TextParams<'a> {
    /// Layer-local frame (never negative here; hidden layers are handled upstream).
    pub frame: i64,
    pub global_frame: i64,
    pub fps: f64,
    pub highlight_color: &'a str,
    pub animation: TextAnimation,
    pub style: TextStyle,
    pub emphasis_words: &'a [String],
    /// Beats to bind emphasis words to, when the layer is beat-synced. Only beats at or after the
    /// layer's start are used.
    pub beats: Option<&'a [i64]>,
    /// Fraction of characters revealed by a `letterByLetter` layer animation.
    pub reveal: Option<f64>,
}

/// Lowercase and keep only ASCII letters and digits.
///
/// `"AI."`, `"ai"` and `"A.I"` all normalize to `"ai"`.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

pub fn emphasis_set<S: AsRef<str>>(words: &[S]) -> HashSet<String> {
    words
        .iter()
        .map(|w| normalize_word(w.as_ref()))
        .filter(|w| !w.is_empty())
        .collect()
}

pub(crate) fn evaluate_words(content: &str, p: &TextParams<'_>) -> Vec<WordFrame> {
    let emphasis = emphasis_set(p.emphasis_words);
    let bound: Vec<(String, i64)> = match p.beats {
        Some(beats) => {
            let layer_start = p.global_frame - p.frame;
            let upcoming: Vec<i64> = beats.iter().copied().filter(|b| *b >= layer_start).collect();
            align(p.emphasis_words, &upcoming)
                .into_iter()
                .map(|a| (normalize_word(&a.word), a.frame))
                .collect()
        }
        None => Vec::new(),
    };

    let total_chars: usize = content.split_whitespace().map(|w| w.chars().count()).sum();
    let revealed_chars = p
        .reveal
        .map(|r| (r.clamp(0.0, 1.0) * total_chars as f64).ceil() as usize);

    let mut char_counter: usize = 0;
    let mut out = Vec::new();
    for (index, word) in content.split_whitespace().enumerate() {
        let clean = normalize_word(word);
        let highlighted = !clean.is_empty() && emphasis.contains(&clean);
        let mut w = styled_word(index, word, highlighted, p);
        animate_word(&mut w, index as i64, p);

        let typing = p.animation == TextAnimation::Typing;
        if typing || revealed_chars.is_some() {
            let chars = word
                .chars()
                .map(|ch| {
                    let global = char_counter;
                    char_counter += 1;
                    let typed = !typing || p.frame > global as i64 * TYPING_FRAMES_PER_CHAR;
                    let revealed = revealed_chars.is_none_or(|n| global < n);
                    CharFrame {
                        ch,
                        visible: typed && revealed,
                    }
                })
                .collect();
            w.chars = Some(chars);
        }

        if highlighted {
            w.beat_impact = beat_impact(&clean, &bound, p.global_frame);
            w.scale *= 1.0 + BEAT_IMPACT_SCALE * w.beat_impact;
        }
        out.push(w);
    }
    out
}

fn styled_word(index: usize, word: &str, highlighted: bool, p: &TextParams<'_>) -> WordFrame {
    let base_paint = if highlighted {
        Paint::Color(p.highlight_color.to_string())
    } else {
        Paint::Inherit
    };
    let mut w = WordFrame {
        index,
        text: word.to_string(),
        highlighted,
        opacity: 1.0,
        scale: 1.0,
        offset: Vec2::ZERO,
        skew_x_deg: 0.0,
        fill: base_paint.clone(),
        stroke: None,
        text_shadows: Vec::new(),
        drop_shadow: None,
        chars: None,
        beat_impact: 0.0,
    };

    match p.style {
        TextStyle::Neon if highlighted => {
            w.text_shadows = [10.0, 20.0, 40.0]
                .into_iter()
                .map(|blur| Shadow::glow(blur, p.highlight_color))
                .collect();
            w.fill = Paint::Color("#fff".to_string());
        }
        TextStyle::Outline => {
            w.stroke = Some(Stroke {
                width_px: if highlighted { 4.0 } else { 2.0 },
                paint: base_paint,
            });
            w.fill = Paint::Transparent;
        }
        TextStyle::Shadow => {
            w.drop_shadow = Some(Shadow {
                offset: Vec2::new(0.0, 10.0),
                blur_px: 15.0,
                color: "rgba(0,0,0,0.8)".to_string(),
            });
        }
        TextStyle::Neon | TextStyle::None => {}
    }
    w
}

fn animate_word(w: &mut WordFrame, index: i64, p: &TextParams<'_>) {
    let f = p.frame;
    match p.animation {
        TextAnimation::Fade => {
            let local = (f - index * FADE_STAGGER) as f64;
            w.opacity = interpolate_clamped(local, [0.0, 10.0], [0.0, 1.0]);
        }
        TextAnimation::PopIn => {
            let local = (f - index * SPRING_STAGGER) as f64;
            w.scale = spring(local, p.fps, SpringConfig::with_damping(DAMPING_POP));
        }
        TextAnimation::FadeUp => {
            let local = (f - index * SPRING_STAGGER) as f64;
            let s = spring(local, p.fps, SpringConfig::with_damping(DAMPING_SOFT));
            w.offset.y = 50.0 * (1.0 - s);
            w.opacity = interpolate_clamped(local, [0.0, 10.0], [0.0, 1.0]);
        }
        TextAnimation::Glitch => {
            let r = noise01(&[index, floor_div(f, GLITCH_HOLD_FRAMES)]);
            if r > GLITCH_THRESHOLD {
                w.offset.x = interpolate_clamped(r, [GLITCH_THRESHOLD, 1.0], [-10.0, 10.0]);
                w.skew_x_deg = interpolate_clamped(r, [GLITCH_THRESHOLD, 1.0], [-20.0, 20.0]);
                if p.style != TextStyle::Outline {
                    w.text_shadows = vec![Shadow::hard(2.0, "red"), Shadow::hard(-2.0, "cyan")];
                }
            }
        }
        TextAnimation::Typing => {}
    }
}

fn beat_impact(clean: &str, bound: &[(String, i64)], global_frame: i64) -> f64 {
    bound
        .iter()
        .filter(|(word, _)| word == clean)
        .map(|(_, beat)| global_frame - beat)
        .filter(|since| (0..BEAT_IMPACT_FRAMES).contains(since))
        .map(|since| 1.0 - since as f64 / BEAT_IMPACT_FRAMES as f64)
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/text.rs"]
mod tests;
