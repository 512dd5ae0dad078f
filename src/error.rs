use thiserror::Error;

/// Validation failures raised where reel data enters the system
#[derive(Debug, Error)]
pub enum ReelError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid color '{value}' in {location}")]
    InvalidColor { location: String, value: String },

    #[error("{item} '{id}' position ({x}, {y}) is outside the frame")]
    PositionOutOfFrame { item: String, id: String, x: f32, y: f32 },

    #[error("clip id {0} appears more than once")]
    DuplicateClipId(String),

    #[error("malformed narration reference: {0}")]
    MalformedNarration(String),

    #[error("invalid reel content: {0}")]
    InvalidContent(String),
}
