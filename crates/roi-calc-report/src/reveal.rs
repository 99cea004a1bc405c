use serde::Serialize;

/// When a figure on the result page starts animating and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealCue {
    pub key: &'static str,
    pub delay_ms: u32,
    pub duration_ms: u32,
    /// Gap between consecutive items sharing this cue, 0 for a single item.
    pub stagger_ms: u32,
}

static SCHEDULE: [RevealCue; 5] = [
    RevealCue {
        key: "totalLoss",
        delay_ms: 300,
        duration_ms: 2500,
        stagger_ms: 0,
    },
    RevealCue {
        key: "salaryCost",
        delay_ms: 800,
        duration_ms: 2000,
        stagger_ms: 0,
    },
    RevealCue {
        key: "missedRevenue",
        delay_ms: 1000,
        duration_ms: 2000,
        stagger_ms: 0,
    },
    RevealCue {
        key: "hoursWasted",
        delay_ms: 1200,
        duration_ms: 2000,
        stagger_ms: 0,
    },
    RevealCue {
        key: "cards",
        delay_ms: 1400,
        duration_ms: 600,
        stagger_ms: 200,
    },
];

pub fn reveal_schedule() -> &'static [RevealCue] {
    &SCHEDULE
}

pub fn reveal_cue(key: &str) -> Option<&'static RevealCue> {
    SCHEDULE.iter().find(|cue| cue.key == key)
}

/// Quadratic ease-out: fast start, settles on 1.
pub fn ease_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Whole-number frames counting from 0 up to a target.
///
/// The last frame is always exactly the target.
#[derive(Debug, Clone)]
pub struct CountUp {
    target: f64,
    frames: u32,
    frame: u32,
}

impl CountUp {
    pub fn new(target: f64, frames: u32) -> Self {
        Self {
            target,
            frames: frames.max(1),
            frame: 0,
        }
    }

    /// Frame count for `duration_ms` at `fps`, at least one.
    pub fn over(target: f64, duration_ms: u32, fps: u32) -> Self {
        let frames = u64::from(duration_ms) * u64::from(fps) / 1000;
        Self::new(target, u32::try_from(frames).unwrap_or(u32::MAX))
    }
}

impl Iterator for CountUp {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.frame >= self.frames {
            return None;
        }
        self.frame += 1;
        if self.frame == self.frames {
            return Some(self.target.round());
        }
        let t = f64::from(self.frame) / f64::from(self.frames);
        Some((self.target * ease_out_quad(t)).round())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.frames - self.frame).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl ExactSizeIterator for CountUp {}
