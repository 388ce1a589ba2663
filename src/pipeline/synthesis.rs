//! Deterministic timeline synthesis from an enhanced script, beats, and uploaded assets.
//!
//! Used by the mock synthesizer and as a baseline a live synthesizer can be compared against.

use std::collections::HashSet;

use crate::{
    animation::ease::Ease,
    composition::{
        dsl::{SceneBuilder, TimelineBuilder, animation, image, text},
        model::{
            AnimationKind, AnimationTimeline, Background, FontFamily, MIN_SCENE_FRAMES, Scene,
            StyleMode, TextAnimation, TextStyle, Theme, TransitionType,
        },
    },
    effects::sequencer::TRANSITION_FRAMES,
    eval::text::normalize_word,
    foundation::{core::seconds_to_frame, error::KinetypeResult},
    pipeline::{providers::SynthesisRequest, script::sentences},
};

pub const INTRO_SCENE_ID: &str = "scene_intro";
const INTRO_SECONDS: f64 = 2.0;
const LOGO_IMPACT_FRAMES: i64 = 40;
const IMAGE_FADE_FRAMES: i64 = 45;
/// Reading time per word, in seconds.
const SECONDS_PER_WORD: f64 = 0.4;

const TEXT_ANIMATIONS: [TextAnimation; 5] = [
    TextAnimation::PopIn,
    TextAnimation::FadeUp,
    TextAnimation::Typing,
    TextAnimation::Glitch,
    TextAnimation::Fade,
];

const TRANSITIONS: [TransitionType; 5] = [
    TransitionType::Fade,
    TransitionType::Slide,
    TransitionType::Wipe,
    TransitionType::Flip,
    TransitionType::ClockWipe,
];

/// Theme picked from style-prompt keywords.
pub fn theme_for_prompt(style_prompt: &str) -> Theme {
    let prompt = style_prompt.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| prompt.contains(w));

    let style_mode = if has(&["bold", "loud", "punchy"]) {
        StyleMode::Bold
    } else if has(&["minimal", "clean", "simple"]) {
        StyleMode::Minimal
    } else {
        StyleMode::Premium
    };
    let font_family = if has(&["serif", "elegant", "luxury"]) {
        FontFamily::Playfair
    } else if has(&["condensed", "sport"]) {
        FontFamily::Oswald
    } else if has(&["poster", "loud"]) {
        FontFamily::Bebas
    } else {
        FontFamily::Inter
    };
    Theme {
        style_mode,
        font_family,
        enable_global_vfx: style_mode != StyleMode::Minimal,
        ..Theme::default()
    }
}

fn text_style_for_prompt(style_prompt: &str) -> TextStyle {
    let prompt = style_prompt.to_lowercase();
    if prompt.contains("neon") {
        TextStyle::Neon
    } else if prompt.contains("outline") {
        TextStyle::Outline
    } else if prompt.contains("shadow") || prompt.contains("cinematic") {
        TextStyle::Shadow
    } else {
        TextStyle::None
    }
}

/// Reading-time length of a sentence, before beat snapping.
pub fn sentence_frames(sentence: &str, fps: u32) -> u64 {
    let words = sentence.split_whitespace().count() as f64;
    seconds_to_frame(1.0 + words * SECONDS_PER_WORD, fps).max(MIN_SCENE_FRAMES)
}

/// Move `end` forward onto the first beat at or after it. Past the last beat it stays put.
pub fn snap_to_next_beat(end: u64, beats: &[i64]) -> u64 {
    let end_i = i64::try_from(end).unwrap_or(i64::MAX);
    let idx = beats.partition_point(|b| *b < end_i);
    beats
        .get(idx)
        .and_then(|b| u64::try_from(*b).ok())
        .unwrap_or(end)
}

/// Build a complete, validated timeline.
#[tracing::instrument(skip(request), fields(project = %request.project_id))]
pub fn synthesize_timeline(request: &SynthesisRequest) -> KinetypeResult<AnimationTimeline> {
    let fps = request.fps;
    let script = request.enhanced.enhanced_script.trim();
    let mut lines = sentences(script);
    if lines.is_empty() {
        lines.push(script);
    }
    let beats = &request.beats.beats;
    let text_style = text_style_for_prompt(&request.style_prompt);
    let images = &request.assets.product_images;
    let videos = &request.assets.product_videos;
    let backgrounds = &request.assets.background_assets;

    let mut scenes: Vec<Scene> = Vec::with_capacity(lines.len() + 1);
    let mut cursor = 0u64;

    if let Some(logo) = &request.assets.logo {
        let duration = seconds_to_frame(INTRO_SECONDS, fps).max(MIN_SCENE_FRAMES);
        scenes.push(
            SceneBuilder::new(INTRO_SCENE_ID, duration as i64)
                .transition(TransitionType::Fade)
                .layer(
                    image(logo.url.as_str())
                        .with(|c| {
                            c.animation =
                                animation(AnimationKind::ScaleImpact, LOGO_IMPACT_FRAMES, Ease::EaseOut)
                        })
                        .into_logo(),
                )
                .build(),
        );
        cursor = duration - TRANSITION_FRAMES;
    }

    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        let end = snap_to_next_beat(cursor + sentence_frames(line, fps), beats);
        let duration = end - cursor;
        let transition = if i == last {
            TransitionType::None
        } else {
            TRANSITIONS[i % TRANSITIONS.len()]
        };

        let sentence_words: HashSet<String> = line.split_whitespace().map(normalize_word).collect();
        let emphasis: Vec<&str> = request
            .enhanced
            .emphasized_words
            .iter()
            .map(String::as_str)
            .filter(|w| sentence_words.contains(&normalize_word(w)))
            .collect();
        let beat_sync = !emphasis.is_empty();

        let mut scene = SceneBuilder::new(format!("scene_{}", i + 1), duration as i64)
            .transition(transition)
            .layer(
                text(*line)
                    .emphasis(emphasis)
                    .text_animation(TEXT_ANIMATIONS[i % TEXT_ANIMATIONS.len()])
                    .text_style(text_style)
                    .with(|c| c.beat_sync = beat_sync),
            );
        for img in images.iter().skip(i).step_by(lines.len()) {
            scene = scene.layer(image(img.url.as_str()).with(|c| {
                c.animation = animation(AnimationKind::FadeIn, IMAGE_FADE_FRAMES, Ease::EaseOut)
            }));
        }
        for clip in videos.iter().skip(i).step_by(lines.len()) {
            scene = scene.layer(image(clip.url.as_str()).into_video());
        }
        if !backgrounds.is_empty() {
            scene = scene.background_image(backgrounds[i % backgrounds.len()].url.as_str(), None);
        }
        scenes.push(scene.build());

        cursor = if transition == TransitionType::None {
            end
        } else {
            end - TRANSITION_FRAMES
        };
    }

    let mut builder = TimelineBuilder::new(fps, request.width, request.height)
        .id(request.project_id.as_str())
        .project_name(request.project_name.as_str())
        .background(Background::solid("#000000"))
        .music(
            request.assets.music_file.url.as_str(),
            beats.clone(),
            request.beats.tempo,
        )
        .theme(theme_for_prompt(&request.style_prompt));
    for scene in scenes {
        builder = builder.scene(scene)?;
    }
    let timeline = builder.build()?;
    tracing::debug!(
        scenes = timeline.scenes.len(),
        frames = timeline.video.total_frames,
        "timeline synthesized"
    );
    Ok(timeline)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/synthesis.rs"]
mod tests;
