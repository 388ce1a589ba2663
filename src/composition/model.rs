use crate::{
    animation::ease::Ease,
    foundation::core::Canvas,
    foundation::error::{KinetypeError, KinetypeResult},
};

/// Shortest duration a scene is ever played for, in frames.
pub const MIN_SCENE_FRAMES: u64 = 15;
/// Default music volume when the timeline does not set one.
pub const DEFAULT_AUDIO_VOLUME: f64 = 0.8;
/// Default opacity of a scene background image.
pub const DEFAULT_BACKGROUND_OPACITY: f64 = 0.4;

/// Root of a kinetic-typography video.
///
/// A timeline is replaced whole on every edit (see [`crate::TimelineHandle`]). `video.total_frames`
/// is derived from the scenes and refreshed by [`AnimationTimeline::normalize`]; nothing reads the
/// stored value back.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationTimeline {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub project_name: String,
    pub video: VideoConfig,
    pub audio: AudioConfig,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub total_frames: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
}

impl VideoConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Background {
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Solid,
            color: Some(color.into()),
            gradient_start: None,
            gradient_end: None,
            video_url: None,
            image_url: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundKind {
    Solid,
    Gradient,
    Video,
    Image,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    #[serde(default)]
    pub music_url: String,
    /// Beat positions in global frames, strictly increasing.
    #[serde(default)]
    pub beats: Vec<i64>,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_volume() -> f64 {
    DEFAULT_AUDIO_VOLUME
}

/// One shot of the video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub id: String,
    /// Requested length. Values below [`MIN_SCENE_FRAMES`] are clamped when timing is resolved.
    pub duration_in_frames: i64,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub transition_type: TransitionType,
    #[serde(default)]
    pub layout_align: LayoutAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f64>,
}

impl Scene {
    pub fn effective_duration(&self) -> u64 {
        u64::try_from(self.duration_in_frames)
            .unwrap_or(0)
            .max(MIN_SCENE_FRAMES)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionType {
    #[default]
    None,
    Fade,
    Slide,
    Flip,
    Wipe,
    ClockWipe,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// A visual element inside a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Text(TextLayer),
    Image(MediaLayer),
    Video(MediaLayer),
    Logo(MediaLayer),
}

impl Layer {
    pub fn common(&self) -> &LayerCommon {
        match self {
            Self::Text(t) => &t.common,
            Self::Image(m) | Self::Video(m) | Self::Logo(m) => &m.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut LayerCommon {
        match self {
            Self::Text(t) => &mut t.common,
            Self::Image(m) | Self::Video(m) | Self::Logo(m) => &mut m.common,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Video(_) => "video",
            Self::Logo(_) => "logo",
        }
    }

    /// Layer start relative to its scene, with a missing value meaning 0.
    pub fn start_offset(&self) -> i64 {
        self.common().start_frame.unwrap_or(0)
    }
}

/// Fields shared by every layer kind.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerCommon {
    #[serde(default)]
    pub animation: AnimationSpec,
    #[serde(default)]
    pub style: LayerStyle,
    #[serde(default)]
    pub beat_sync: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    #[serde(flatten)]
    pub common: LayerCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Ordered emphasis words. Membership ignores case and punctuation.
    #[serde(default)]
    pub emphasis_words: Vec<String>,
    #[serde(default)]
    pub text_animation: TextAnimation,
    #[serde(default)]
    pub text_style: TextStyle,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaLayer {
    #[serde(flatten)]
    pub common: LayerCommon,
    #[serde(default)]
    pub src: String,
    /// Source clip length for video layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_frames: Option<i64>,
}

/// Layer-level entrance or exit motion.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSpec {
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    pub duration_in_frames: i64,
    #[serde(default)]
    pub easing: Ease,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            kind: AnimationKind::FadeIn,
            duration_in_frames: 15,
            easing: Ease::EaseOut,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationKind {
    SlideUp,
    FadeIn,
    ScaleImpact,
    LetterByLetter,
    BeatBounce,
    FadeOut,
    SlideDown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnimation {
    #[default]
    Fade,
    PopIn,
    FadeUp,
    Typing,
    Glitch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    None,
    Neon,
    Outline,
    Shadow,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(u16),
    Named(String),
}

/// Timeline-wide look.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub style_mode: StyleMode,
    pub primary_color: String,
    pub background_color: String,
    pub font_family: FontFamily,
    pub enable_global_vfx: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            style_mode: StyleMode::Premium,
            primary_color: "#3b82f6".to_string(),
            background_color: "#0a0a0a".to_string(),
            font_family: FontFamily::Inter,
            enable_global_vfx: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleMode {
    #[default]
    Premium,
    Bold,
    Minimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Inter,
    Playfair,
    Oswald,
    Bebas,
}

impl AnimationTimeline {
    pub fn canvas(&self) -> Canvas {
        self.video.canvas()
    }

    /// Total output length derived from scene durations and transition overlaps.
    pub fn total_frames(&self) -> u64 {
        crate::effects::sequencer::resolve_scene_spans(&self.scenes)
            .last()
            .map(|s| s.range.end.0)
            .unwrap_or(0)
    }

    /// Refresh derived fields. Called after load and after every edit.
    pub fn normalize(&mut self) {
        self.video.total_frames = self.total_frames();
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn scene_index(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == id)
    }

    pub fn from_json_str(s: &str) -> KinetypeResult<Self> {
        let mut timeline: Self = serde_json::from_str(s)
            .map_err(|e| KinetypeError::serde(format!("invalid timeline JSON: {e}")))?;
        timeline.normalize();
        Ok(timeline)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> KinetypeResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            let msg = format!("failed to read '{}': {e}", path.display());
            KinetypeError::Io(std::io::Error::new(e.kind(), msg))
        })?;
        Self::from_json_str(&s)
    }

    pub fn to_json_string_pretty(&self) -> KinetypeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| KinetypeError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
