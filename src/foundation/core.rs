use crate::foundation::error::{KinetypeError, KinetypeResult};

pub use kurbo::{Affine, Vec2};

/// Global frame position on the output timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> KinetypeResult<Self> {
        if start.0 > end.0 {
            return Err(KinetypeError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// `true` when the two ranges share at least one frame.
    pub fn overlaps(self, other: FrameRange) -> bool {
        self.start.0 < other.end.0 && other.start.0 < self.end.0
    }
}

/// Output canvas in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> KinetypeResult<Self> {
        if width == 0 || height == 0 {
            return Err(KinetypeError::validation(
                "canvas width and height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// A `WxH` resolution string as exchanged with the form layer and render requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Output presets offered to users.
    pub const PRESETS: [Resolution; 8] = [
        Resolution::new(1080, 1080),
        Resolution::new(1080, 1350),
        Resolution::new(1080, 1920),
        Resolution::new(1920, 1080),
        Resolution::new(3840, 2160),
        Resolution::new(3840, 1600),
        Resolution::new(1080, 1620),
        Resolution::new(1080, 1440),
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn parse(s: &str) -> KinetypeResult<Self> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| KinetypeError::validation(format!("invalid resolution '{s}'")))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| KinetypeError::validation(format!("invalid resolution width in '{s}'")))?;
        let height: u32 = h.trim().parse().map_err(|_| {
            KinetypeError::validation(format!("invalid resolution height in '{s}'"))
        })?;
        if width == 0 || height == 0 {
            return Err(KinetypeError::validation(format!(
                "resolution '{s}' must have positive dimensions"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn is_preset(self) -> bool {
        Self::PRESETS.contains(&self)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1080, 1920)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = KinetypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Convert seconds to the nearest frame at `fps`.
pub fn seconds_to_frame(seconds: f64, fps: u32) -> u64 {
    (seconds * f64::from(fps)).round().max(0.0) as u64
}

pub fn frame_to_seconds(frame: u64, fps: u32) -> f64 {
    if fps == 0 {
        return 0.0;
    }
    frame as f64 / f64::from(fps)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
