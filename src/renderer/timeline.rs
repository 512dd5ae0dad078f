use crate::config::CompositionConfig;
use crate::narration::NarrationCache;
use crate::reel::{ClipId, ReelState};
use crate::renderer::duration::DurationResolver;
use serde::Serialize;

/// Start frames and total length for a sequence of clip durations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub starts: Vec<u32>,
    pub total_frames: u32,
}

/// Lay clips end to end, each one starting `transition_frames` before
/// the previous one ends. The total is at least `min_total_frames`.
///
/// Every duration must be at least `transition_frames`; `DurationResolver`
/// guarantees this for clips it resolves.
pub fn layout(durations: &[u32], transition_frames: u32, min_total_frames: u32) -> Layout {
    debug_assert!(
        durations.iter().all(|&d| d >= transition_frames),
        "clip shorter than the {}-frame transition window",
        transition_frames
    );
    let mut starts: Vec<u32> = Vec::with_capacity(durations.len());
    for (i, _) in durations.iter().enumerate() {
        let start = match i {
            0 => 0,
            _ => (starts[i - 1] + durations[i - 1]).saturating_sub(transition_frames),
        };
        starts.push(start);
    }

    let end = match (starts.last(), durations.last()) {
        (Some(start), Some(duration)) => start + duration,
        _ => 0,
    };

    Layout {
        starts,
        total_frames: end.max(min_total_frames),
    }
}

/// Timeline for managing clip playback
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    fps: u32,
    total_frames: u32,
    transition_frames: u32,
    segments: Vec<ClipSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipSegment {
    pub clip_id: ClipId,
    pub index: usize,
    pub start_frame: u32,
    pub duration_frames: u32,
}

impl ClipSegment {
    pub fn end_frame(&self) -> u32 {
        self.start_frame + self.duration_frames
    }

    pub fn contains(&self, frame: u32) -> bool {
        frame >= self.start_frame && frame < self.end_frame()
    }
}

impl Timeline {
    /// Create timeline from a reel and whatever narration lengths are known
    pub fn from_reel(reel: &ReelState, cache: &NarrationCache, config: &CompositionConfig) -> Self {
        let resolver = DurationResolver::new(*config);
        let durations = resolver.resolve_all(&reel.clips, |clip| cache.seconds_for(clip));
        let ids: Vec<ClipId> = reel.clips.iter().map(|c| c.id).collect();
        Self::from_durations(&ids, &durations, config)
    }

    pub fn from_durations(ids: &[ClipId], durations: &[u32], config: &CompositionConfig) -> Self {
        let Layout {
            starts,
            total_frames,
        } = layout(durations, config.transition_duration, config.min_total_frames());

        let segments = ids
            .iter()
            .zip(starts.iter().zip(durations))
            .enumerate()
            .map(|(index, (id, (start, duration)))| ClipSegment {
                clip_id: *id,
                index,
                start_frame: *start,
                duration_frames: *duration,
            })
            .collect();

        Self {
            fps: config.fps,
            total_frames,
            transition_frames: config.transition_duration,
            segments,
        }
    }

    /// Segments visible at `frame`, in clip order
    pub fn segments_at(&self, frame: u32) -> impl Iterator<Item = &ClipSegment> {
        self.segments.iter().filter(move |s| s.contains(frame))
    }

    pub fn segment(&self, index: usize) -> Option<&ClipSegment> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[ClipSegment] {
        &self.segments
    }

    /// Frame position relative to the start of clip `index`
    pub fn relative_frame(&self, index: usize, frame: u32) -> Option<i64> {
        self.segments
            .get(index)
            .map(|s| frame as i64 - s.start_frame as i64)
    }

    /// Get total frame count
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Get FPS
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn transition_frames(&self) -> u32 {
        self.transition_frames
    }

    /// Convert frame number to time in seconds
    pub fn frame_to_time(&self, frame: u32) -> f32 {
        frame as f32 / self.fps as f32
    }
}
