use crate::error::ReelError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub composition: CompositionConfig,
    pub store: StoreConfig,
    pub render: RenderConfig,
}

/// Frame grid and timing constants shared by the timeline and the compositor
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CompositionConfig {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub preview_width: u32,
    pub preview_height: u32,
    /// Frames added after every clip's narration
    pub min_clip_spacing: u32,
    /// Frames two adjacent clips overlap
    pub transition_duration: u32,
    /// Length of a clip whose narration length is unknown
    pub default_clip_seconds: u32,
    /// Shortest composition the timeline will produce
    pub min_total_seconds: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub state_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 1080,
            height: 1920,
            preview_width: 390,
            preview_height: 844,
            min_clip_spacing: 60,
            transition_duration: 30,
            default_clip_seconds: 5,
            min_total_seconds: 3,
        }
    }
}

impl CompositionConfig {
    pub fn min_total_frames(&self) -> u32 {
        self.min_total_seconds * self.fps
    }

    pub fn validate(&self) -> Result<(), ReelError> {
        if self.fps == 0 {
            return Err(ReelError::InvalidConfig("fps must be greater than 0".into()));
        }
        if self.transition_duration == 0 {
            return Err(ReelError::InvalidConfig(
                "transition_duration must be greater than 0".into(),
            ));
        }
        if self.min_clip_spacing < self.transition_duration {
            return Err(ReelError::InvalidConfig(format!(
                "min_clip_spacing ({}) must be at least transition_duration ({})",
                self.min_clip_spacing, self.transition_duration
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            composition: CompositionConfig::default(),
            store: StoreConfig {
                state_path: PathBuf::from("reel_state.json"),
            },
            render: RenderConfig {
                output_dir: PathBuf::from("output"),
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("reelsmith")
    }

    /// Load defaults, then the named config file if present, then `REELSMITH__*` env overrides
    pub fn load_from(file_stem: &str) -> anyhow::Result<Self> {
        Self::load_layered(file_stem, "REELSMITH")
    }

    fn load_layered(file_stem: &str, env_prefix: &str) -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .set_default("composition.fps", 30)?
            .set_default("composition.width", 1080)?
            .set_default("composition.height", 1920)?
            .set_default("composition.preview_width", 390)?
            .set_default("composition.preview_height", 844)?
            .set_default("composition.min_clip_spacing", 60)?
            .set_default("composition.transition_duration", 30)?
            .set_default("composition.default_clip_seconds", 5)?
            .set_default("composition.min_total_seconds", 3)?
            .set_default("store.state_path", "reel_state.json")?
            .set_default("render.output_dir", "output")?
            .add_source(config::File::with_name(file_stem).required(false))
            // e.g. REELSMITH__COMPOSITION__FPS=60
            .add_source(config::Environment::with_prefix(env_prefix).separator("__"));

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.composition.validate()?;
        Ok(config)
    }
}
