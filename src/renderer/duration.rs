use crate::config::CompositionConfig;
use crate::reel::Clip;

/// Frames for a clip whose narration lasts `measured_seconds`, if known.
///
/// Values that are not finite or not positive count as unknown.
pub fn resolve_duration(
    measured_seconds: Option<f64>,
    fps: u32,
    spacing_frames: u32,
    default_seconds: u32,
) -> u32 {
    match measured_seconds.filter(|s| s.is_finite() && *s > 0.0) {
        Some(seconds) => (seconds * fps as f64).round() as u32 + spacing_frames,
        None => default_seconds * fps + spacing_frames,
    }
}

/// Turns clips and measured narration lengths into clip lengths in frames
#[derive(Debug, Clone, Copy)]
pub struct DurationResolver {
    config: CompositionConfig,
}

impl DurationResolver {
    pub fn new(config: CompositionConfig) -> Self {
        Self { config }
    }

    /// Length of one clip; never shorter than the transition window
    pub fn resolve(&self, clip: &Clip, measured_seconds: Option<f64>) -> u32 {
        // A measurement only counts while the clip still has narration
        let measured = clip.voice_audio.as_ref().and(measured_seconds);
        resolve_duration(
            measured,
            self.config.fps,
            self.config.min_clip_spacing,
            self.config.default_clip_seconds,
        )
        .max(self.config.transition_duration)
    }

    pub fn resolve_all<F>(&self, clips: &[Clip], measured: F) -> Vec<u32>
    where
        F: Fn(&Clip) -> Option<f64>,
    {
        clips
            .iter()
            .map(|clip| self.resolve(clip, measured(clip)))
            .collect()
    }
}
