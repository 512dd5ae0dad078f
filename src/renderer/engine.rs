use crate::config::CompositionConfig;
use crate::narration::{Completion, DurationProvider, NarrationLoader};
use crate::reel::ReelState;
use crate::renderer::{Compositor, FrameComposition, Timeline};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};

/// Drives a reel preview: narration lengths, timeline and frame composition
pub struct PreviewEngine {
    reel: ReelState,
    config: CompositionConfig,
    loader: Arc<NarrationLoader>,
    compositor: Compositor,
    timeline: Timeline,
}

/// What a full render wrote
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub frames: u32,
    pub clips: usize,
    pub measured_narrations: usize,
}

impl PreviewEngine {
    pub fn new(
        reel: ReelState,
        config: CompositionConfig,
        provider: Arc<dyn DurationProvider>,
    ) -> Self {
        let loader = Arc::new(NarrationLoader::new(provider));
        let timeline = Timeline::from_reel(&reel, loader.cache(), &config);
        Self {
            reel,
            config,
            loader,
            compositor: Compositor::new(&config),
            timeline,
        }
    }

    /// Measure any narration not yet in the cache, then rebuild the timeline
    pub fn refresh_narration(&mut self) -> Vec<Completion> {
        let outcomes = self.loader.refresh(&self.reel.clips);
        self.rebuild_timeline();
        outcomes
    }

    /// Start narration lookups on the rayon pool and return at once.
    ///
    /// The timeline keeps its current lengths until [`sync_timeline`](Self::sync_timeline)
    /// is called after completions arrive.
    pub fn refresh_narration_in_background(&self) -> mpsc::Receiver<Completion> {
        self.loader.refresh_in_background(&self.reel.clips)
    }

    /// Rebuild the timeline from the lengths cached so far
    pub fn sync_timeline(&mut self) {
        self.rebuild_timeline();
    }

    /// Swap in an edited reel; stale narration lookups are cancelled
    pub fn set_reel(&mut self, reel: ReelState) {
        self.reel = reel;
        self.loader.reconcile(&self.reel.clips);
        self.rebuild_timeline();
    }

    fn rebuild_timeline(&mut self) {
        self.timeline = Timeline::from_reel(&self.reel, self.loader.cache(), &self.config);
        log::debug!(
            "timeline rebuilt: {} clips, {} frames",
            self.reel.clips.len(),
            self.timeline.total_frames()
        );
    }

    pub fn reel(&self) -> &ReelState {
        &self.reel
    }

    pub fn loader(&self) -> &NarrationLoader {
        &self.loader
    }

    /// Get timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn compose(&self, frame: u32) -> FrameComposition {
        self.compositor.compose(&self.reel, &self.timeline, frame)
    }

    /// Write `timeline.json` and one composed frame per line to `frames.jsonl`
    pub fn render(&self, output_dir: &Path) -> Result<RenderSummary> {
        std::fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;

        let timeline_path = output_dir.join("timeline.json");
        std::fs::write(&timeline_path, serde_json::to_string_pretty(&self.timeline)?)
            .with_context(|| format!("Failed to write {}", timeline_path.display()))?;

        let frames_path = output_dir.join("frames.jsonl");
        let file = File::create(&frames_path)
            .with_context(|| format!("Failed to create {}", frames_path.display()))?;
        let mut writer = BufWriter::new(file);

        let total_frames = self.timeline.total_frames();
        let fps = self.timeline.fps().max(1);
        for frame in 0..total_frames {
            if frame % fps == 0 {
                println!("  Composing frame {}/{}", frame, total_frames);
            }
            serde_json::to_writer(&mut writer, &self.compose(frame))?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(RenderSummary {
            frames: total_frames,
            clips: self.reel.clips.len(),
            measured_narrations: self.loader.cache().len(),
        })
    }
}
