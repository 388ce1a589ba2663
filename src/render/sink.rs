use std::io::Write;

use crate::{
    eval::evaluator::FrameState,
    foundation::core::FrameIndex,
    foundation::error::{KinetypeError, KinetypeResult},
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub total_frames: u64,
    pub audio: Option<AudioTrack>,
}

/// Music to mux under the video.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrack {
    pub url: String,
    pub volume: f64,
}

/// Consumer of evaluated frames.
///
/// Ordering contract: frames arrive in strictly increasing [`FrameIndex`] order, each exactly
/// once, through either [`FrameSink::push_frame`] or [`FrameSink::push_repeat`].
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> KinetypeResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameState) -> KinetypeResult<()>;
    /// Frame `idx` looks exactly like the earlier frame `of`.
    ///
    /// The default forwards the full state to [`FrameSink::push_frame`].
    fn push_repeat(
        &mut self,
        idx: FrameIndex,
        of: FrameIndex,
        frame: &FrameState,
    ) -> KinetypeResult<()> {
        let _ = of;
        self.push_frame(idx, frame)
    }
    fn end(&mut self) -> KinetypeResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameState)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(FrameIndex, FrameState)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> KinetypeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameState) -> KinetypeResult<()> {
        if self.frames.last().is_some_and(|(last, _)| *last >= idx) {
            return Err(KinetypeError::evaluation(format!(
                "frame {} pushed out of order",
                idx.0
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> KinetypeResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes one JSON document per line: a header, then one line per frame.
///
/// Repeated frames are written as `{"frame":N,"repeat":M}` so a downstream encoder can reuse
/// the picture it drew for frame `M`.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line<T: serde::Serialize>(&mut self, value: &T) -> KinetypeResult<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct Header<'a> {
    config: &'a SinkConfig,
}

#[derive(serde::Serialize)]
struct Repeat {
    frame: u64,
    repeat: u64,
}

impl<W: Write + Send> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> KinetypeResult<()> {
        self.line(&Header { config: &cfg })
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameState) -> KinetypeResult<()> {
        self.line(frame)
    }

    fn push_repeat(
        &mut self,
        idx: FrameIndex,
        of: FrameIndex,
        _frame: &FrameState,
    ) -> KinetypeResult<()> {
        self.line(&Repeat {
            frame: idx.0,
            repeat: of.0,
        })
    }

    fn end(&mut self) -> KinetypeResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
