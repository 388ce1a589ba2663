use xxhash_rust::xxh3::Xxh3;

use crate::{
    effects::{sequencer::SequencerState, transitions::SceneComposite},
    eval::{
        evaluator::{FrameState, SceneFrame},
        layer::LayerFrame,
        scene::{BackgroundFrame, LayoutFrame, SceneEntrance, Typography},
        vfx::GlobalVfx,
    },
    foundation::core::Canvas,
    foundation::error::KinetypeResult,
};

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// 128-bit identity of a frame's visual content.
///
/// Two frames with equal fingerprints draw the same picture, whatever their index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Everything in a [`FrameState`] except frame counters.
#[derive(serde::Serialize)]
struct Visual<'a> {
    canvas: &'a Canvas,
    total_frames: u64,
    background_color: &'a str,
    sequencer: &'a SequencerState,
    scenes: Vec<SceneVisual<'a>>,
    vfx: &'a Option<GlobalVfx>,
}

#[derive(serde::Serialize)]
struct SceneVisual<'a> {
    index: usize,
    composite: &'a SceneComposite,
    entrance: &'a SceneEntrance,
    typography: &'a Typography,
    layout: &'a LayoutFrame,
    background: &'a Option<BackgroundFrame>,
    layers: &'a [LayerFrame],
}

impl<'a> From<&'a SceneFrame> for SceneVisual<'a> {
    fn from(s: &'a SceneFrame) -> Self {
        Self {
            index: s.index,
            composite: &s.composite,
            entrance: &s.entrance,
            typography: &s.typography,
            layout: &s.layout,
            background: &s.background,
            layers: &s.layers,
        }
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl std::io::Write for StableHasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn fingerprint_frame(state: &FrameState) -> KinetypeResult<FrameFingerprint> {
    let mut h = StableHasher {
        inner: Xxh3::with_seed(XXH3_SEED),
    };
    let visual = Visual {
        canvas: &state.canvas,
        total_frames: state.total_frames,
        background_color: &state.background_color,
        sequencer: &state.sequencer,
        scenes: state.scenes.iter().map(SceneVisual::from).collect(),
        vfx: &state.vfx,
    };
    serde_json::to_writer(&mut h, &visual)?;
    let v = h.inner.digest128();
    Ok(FrameFingerprint {
        hi: (v >> 64) as u64,
        lo: v as u64,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
