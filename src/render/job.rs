use std::{collections::HashMap, sync::Arc};

use rayon::prelude::*;

use crate::{
    compile::fingerprint::{FrameFingerprint, fingerprint_frame},
    composition::model::{AnimationTimeline, MIN_SCENE_FRAMES},
    effects::sequencer::TransitionSequencer,
    eval::evaluator::{Evaluator, FrameState},
    foundation::core::{FrameIndex, FrameRange, Resolution},
    foundation::error::{KinetypeError, KinetypeResult},
    render::sink::{AudioTrack, FrameSink, SinkConfig},
};

/// Threading and chunking controls for multi-frame evaluation.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    /// Frames evaluated per parallel batch.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Report frames identical to an earlier one in the same chunk as repeats.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStats {
    pub frames_total: u64,
    /// Frames pushed with their full state.
    pub frames_rendered: u64,
    /// Frames pushed as repeats of an earlier frame.
    pub frames_elided: u64,
}

/// A request to turn a timeline into a stream of frame states.
#[derive(Clone, Debug)]
pub struct RenderJob {
    timeline: Arc<AnimationTimeline>,
    size: Option<Resolution>,
    duration_in_frames: Option<u64>,
}

impl RenderJob {
    pub fn new(timeline: Arc<AnimationTimeline>) -> Self {
        Self {
            timeline,
            size: None,
            duration_in_frames: None,
        }
    }

    /// Render at `size` instead of the timeline's own size.
    pub fn with_size(mut self, size: Resolution) -> Self {
        self.size = Some(size);
        self
    }

    /// Render exactly this many frames, never fewer than [`MIN_SCENE_FRAMES`].
    pub fn with_duration(mut self, frames: u64) -> Self {
        self.duration_in_frames = Some(frames.max(MIN_SCENE_FRAMES));
        self
    }

    pub fn timeline(&self) -> &AnimationTimeline {
        &self.timeline
    }

    /// Frames this job will emit.
    pub fn output_frames(&self) -> u64 {
        self.duration_in_frames
            .unwrap_or_else(|| self.timeline.total_frames())
    }

    pub fn output_size(&self) -> Resolution {
        self.size
            .unwrap_or(Resolution::new(self.timeline.video.width, self.timeline.video.height))
    }

    pub fn sink_config(&self) -> SinkConfig {
        let Resolution { width, height } = self.output_size();
        let audio = &self.timeline.audio;
        SinkConfig {
            width,
            height,
            fps: self.timeline.video.fps,
            total_frames: self.output_frames(),
            audio: (!audio.music_url.trim().is_empty()).then(|| AudioTrack {
                url: audio.music_url.clone(),
                volume: audio.volume,
            }),
        }
    }

    /// Timeline as rendered: the size override applied.
    fn effective_timeline(&self) -> Arc<AnimationTimeline> {
        let size = self.output_size();
        let video = &self.timeline.video;
        if (size.width, size.height) == (video.width, video.height) {
            return Arc::clone(&self.timeline);
        }
        let mut t = (*self.timeline).clone();
        t.video.width = size.width;
        t.video.height = size.height;
        Arc::new(t)
    }

    /// Evaluate every output frame and push it to `sink` in order.
    #[tracing::instrument(skip(self, sink), fields(timeline = %self.timeline.id))]
    pub fn run(
        &self,
        sink: &mut dyn FrameSink,
        threading: &RenderThreading,
    ) -> KinetypeResult<RenderStats> {
        let Resolution { width, height } = self.output_size();
        if width == 0 || height == 0 {
            return Err(KinetypeError::validation(
                "render size must be positive in both dimensions",
            ));
        }
        if self.timeline.video.fps == 0 {
            return Err(KinetypeError::validation("render fps must be greater than 0"));
        }

        let total = self.output_frames();
        let timeline = self.effective_timeline();
        let sequencer = TransitionSequencer::new(&timeline);
        let range = FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(total),
        };

        tracing::info!(frames = total, parallel = threading.parallel, "render started");
        sink.begin(self.sink_config())?;

        let mut stats = RenderStats::default();
        if threading.parallel {
            let pool = build_thread_pool(threading.threads)?;
            let chunk_size = normalized_chunk_size(threading.chunk_size);
            let mut chunk_start = range.start.0;
            while chunk_start < range.end.0 {
                let chunk_end = (chunk_start + chunk_size).min(range.end.0);
                let frames: Vec<FrameState> = pool.install(|| {
                    (chunk_start..chunk_end)
                        .into_par_iter()
                        .map(|f| Evaluator::eval_frame_with(&timeline, &sequencer, FrameIndex(f)))
                        .collect()
                });
                push_chunk(sink, &frames, threading.static_frame_elision, &mut stats)?;
                chunk_start = chunk_end;
            }
        } else {
            for f in range.start.0..range.end.0 {
                let state = Evaluator::eval_frame_with(&timeline, &sequencer, FrameIndex(f));
                push_chunk(sink, std::slice::from_ref(&state), false, &mut stats)?;
            }
        }

        sink.end()?;
        tracing::info!(
            rendered = stats.frames_rendered,
            elided = stats.frames_elided,
            "render finished"
        );
        Ok(stats)
    }
}

fn push_chunk(
    sink: &mut dyn FrameSink,
    frames: &[FrameState],
    elide: bool,
    stats: &mut RenderStats,
) -> KinetypeResult<()> {
    let mut first = HashMap::<FrameFingerprint, FrameIndex>::new();
    for state in frames {
        stats.frames_total += 1;
        if elide {
            let fingerprint = fingerprint_frame(state)?;
            if let Some(of) = first.get(&fingerprint).copied() {
                sink.push_repeat(state.frame, of, state)?;
                stats.frames_elided += 1;
                continue;
            }
            first.insert(fingerprint, state.frame);
        }
        sink.push_frame(state.frame, state)?;
        stats.frames_rendered += 1;
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> KinetypeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(KinetypeError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| KinetypeError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/job.rs"]
mod tests;
