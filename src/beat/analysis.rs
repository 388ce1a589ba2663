use crate::foundation::core::{FrameIndex, FrameRange};

/// Result of a beat-analysis provider, in frames at the requested fps.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatAnalysisResult {
    pub tempo: f64,
    pub beats: Vec<i64>,
    #[serde(default)]
    pub energy_levels: Vec<EnergyLevel>,
    #[serde(default)]
    pub peak_frames: Vec<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnergyLevel {
    pub frame: i64,
    pub energy: Energy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Low,
    Medium,
    High,
}

impl BeatAnalysisResult {
    /// Every way this result breaks the provider contract. Empty means usable.
    pub fn contract_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !(self.tempo.is_finite() && self.tempo > 0.0) {
            out.push(format!("tempo must be positive (got {})", self.tempo));
        }
        if let Some(b) = self.beats.iter().find(|b| **b < 0) {
            out.push(format!("beat frames must be non-negative (got {b})"));
        }
        if let Some(w) = self.beats.windows(2).find(|w| w[0] >= w[1]) {
            out.push(format!(
                "beat frames must be strictly increasing ({} then {})",
                w[0], w[1]
            ));
        }
        for peak in &self.peak_frames {
            if self.beats.binary_search(peak).is_err() {
                out.push(format!("peak frame {peak} is not a beat"));
            }
        }
        out
    }

    /// Energy in effect at `frame`: the last level sampled at or before it.
    pub fn energy_at(&self, frame: i64) -> Option<Energy> {
        self.energy_levels
            .iter()
            .filter(|e| e.frame <= frame)
            .max_by_key(|e| e.frame)
            .map(|e| e.energy)
    }

    pub fn is_peak(&self, frame: i64) -> bool {
        self.peak_frames.contains(&frame)
    }
}

/// Latest beat at or before `frame` in a sorted beat list.
pub fn last_beat_at_or_before(beats: &[i64], frame: i64) -> Option<i64> {
    let idx = beats.partition_point(|b| *b <= frame);
    idx.checked_sub(1).map(|i| beats[i])
}

/// Convert beat frames between frame rates.
pub fn retime_beats(beats: &[i64], from_fps: u32, to_fps: u32) -> Vec<i64> {
    if from_fps == 0 {
        return beats.to_vec();
    }
    let ratio = f64::from(to_fps) / f64::from(from_fps);
    beats
        .iter()
        .map(|b| (*b as f64 * ratio).round() as i64)
        .collect()
}

/// Animation windows `[max(0, b - window), b + window)` around each non-negative beat.
pub fn beat_windows(beats: &[i64], window: u64) -> Vec<FrameRange> {
    beats
        .iter()
        .filter_map(|b| u64::try_from(*b).ok())
        .map(|b| FrameRange {
            start: FrameIndex(b.saturating_sub(window)),
            end: FrameIndex(b + window),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/beat/analysis.rs"]
mod tests;
