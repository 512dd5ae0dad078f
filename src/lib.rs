pub mod audio;
pub mod config;
pub mod error;
pub mod narration;
pub mod parser;
pub mod reel;
pub mod renderer;
pub mod state;
pub mod templates;

pub use audio::{NarrationSource, SymphoniaProbe};
pub use config::{AppConfig, CompositionConfig};
pub use error::ReelError;
pub use narration::{DurationProvider, NarrationCache, NarrationLoader};
pub use parser::ReelParser;
pub use reel::{Clip, ClipId, ReelState, TransitionKind};
pub use renderer::{Compositor, PreviewEngine, Timeline, TransitionCalculator};
pub use state::{reduce, JsonFileStore, ReelAction, ReelSession};
