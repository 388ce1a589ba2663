use crate::{
    animation::ease::Ease,
    composition::model::{
        AnimationKind, AnimationSpec, AnimationTimeline, AudioConfig, Background,
        DEFAULT_AUDIO_VOLUME, Layer, LayerCommon, LayoutAlign, MediaLayer, Scene, TextAnimation,
        TextLayer, TextStyle, Theme, TransitionType, VideoConfig,
    },
    composition::validate::validate,
    foundation::error::{KinetypeError, KinetypeResult},
};

/// Builder for [`AnimationTimeline`].
pub struct TimelineBuilder {
    id: String,
    project_name: String,
    fps: u32,
    width: u32,
    height: u32,
    background: Option<Background>,
    audio: AudioConfig,
    theme: Theme,
    scenes: Vec<Scene>,
}

impl TimelineBuilder {
    pub fn new(fps: u32, width: u32, height: u32) -> Self {
        Self {
            id: String::new(),
            project_name: "Untitled Project".to_string(),
            fps,
            width,
            height,
            background: None,
            audio: AudioConfig {
                music_url: String::new(),
                beats: Vec::new(),
                tempo: 0.0,
                volume: DEFAULT_AUDIO_VOLUME,
            },
            theme: Theme::default(),
            scenes: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    pub fn music(mut self, url: impl Into<String>, beats: Vec<i64>, tempo: f64) -> Self {
        self.audio.music_url = url.into();
        self.audio.beats = beats;
        self.audio.tempo = tempo;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.audio.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Append a scene. Scene ids must be unique.
    pub fn scene(mut self, scene: Scene) -> KinetypeResult<Self> {
        if self.scenes.iter().any(|s| s.id == scene.id) {
            return Err(KinetypeError::validation(format!(
                "duplicate scene id '{}'",
                scene.id
            )));
        }
        self.scenes.push(scene);
        Ok(self)
    }

    /// Assemble, derive `totalFrames`, and validate.
    pub fn build(self) -> KinetypeResult<AnimationTimeline> {
        let mut timeline = AnimationTimeline {
            id: self.id,
            project_name: self.project_name,
            video: VideoConfig {
                fps: self.fps,
                width: self.width,
                height: self.height,
                total_frames: 0,
                background: self.background,
            },
            audio: self.audio,
            scenes: self.scenes,
            theme: self.theme,
        };
        timeline.normalize();
        validate(&timeline).into_result()?;
        Ok(timeline)
    }
}

/// Builder for [`Scene`].
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn new(id: impl Into<String>, duration_in_frames: i64) -> Self {
        Self {
            scene: Scene {
                id: id.into(),
                duration_in_frames,
                layers: Vec::new(),
                transition_type: TransitionType::None,
                layout_align: LayoutAlign::Center,
                background_image_url: None,
                background_opacity: None,
            },
        }
    }

    pub fn transition(mut self, kind: TransitionType) -> Self {
        self.scene.transition_type = kind;
        self
    }

    pub fn align(mut self, align: LayoutAlign) -> Self {
        self.scene.layout_align = align;
        self
    }

    pub fn background_image(mut self, url: impl Into<String>, opacity: Option<f64>) -> Self {
        self.scene.background_image_url = Some(url.into());
        self.scene.background_opacity = opacity;
        self
    }

    pub fn layer(mut self, layer: impl Into<Layer>) -> Self {
        self.scene.layers.push(layer.into());
        self
    }

    pub fn build(self) -> Scene {
        self.scene
    }
}

/// Start a text layer.
pub fn text(content: impl Into<String>) -> TextLayer {
    TextLayer {
        content: Some(content.into()),
        ..TextLayer::default()
    }
}

pub fn image(src: impl Into<String>) -> MediaLayer {
    MediaLayer {
        src: src.into(),
        ..MediaLayer::default()
    }
}

pub fn animation(kind: AnimationKind, duration_in_frames: i64, easing: Ease) -> AnimationSpec {
    AnimationSpec {
        kind,
        duration_in_frames,
        easing,
    }
}

impl TextLayer {
    pub fn emphasis<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emphasis_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn text_animation(mut self, animation: TextAnimation) -> Self {
        self.text_animation = animation;
        self
    }

    pub fn text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    pub fn with(mut self, f: impl FnOnce(&mut LayerCommon)) -> Self {
        f(&mut self.common);
        self
    }
}

impl MediaLayer {
    pub fn with(mut self, f: impl FnOnce(&mut LayerCommon)) -> Self {
        f(&mut self.common);
        self
    }

    pub fn into_logo(self) -> Layer {
        Layer::Logo(self)
    }

    pub fn into_video(self) -> Layer {
        Layer::Video(self)
    }
}

impl From<TextLayer> for Layer {
    fn from(t: TextLayer) -> Self {
        Layer::Text(t)
    }
}

impl From<MediaLayer> for Layer {
    fn from(m: MediaLayer) -> Self {
        Layer::Image(m)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
