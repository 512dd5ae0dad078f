use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a clip, independent of its position in the reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(Uuid);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The whole reel document being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReelState {
    pub prompt: String,
    pub selected_video: Option<String>,
    pub script: String,
    pub voice_settings: VoiceSettings,
    pub bg_music: Option<String>,
    pub bg_music_keywords: Vec<String>,
    pub style: Option<ReelStyle>,
    pub clips: Vec<Clip>,
    pub show_text: bool,
    pub text_style: TextStyle,
    pub saved_templates: Vec<StyleTemplate>,
    pub overlay_text: Vec<OverlayText>,
    pub logo: Option<Logo>,
    pub transition: TransitionKind,
}

impl Default for ReelState {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            selected_video: None,
            script: String::new(),
            voice_settings: VoiceSettings::default(),
            bg_music: None,
            bg_music_keywords: Vec::new(),
            style: None,
            clips: Vec::new(),
            show_text: true,
            text_style: TextStyle::default(),
            saved_templates: crate::templates::stock_style_templates(),
            overlay_text: Vec::new(),
            logo: None,
            transition: TransitionKind::Fade,
        }
    }
}

impl ReelState {
    pub fn clip_index(&self, id: ClipId) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }
}

/// One segment of the reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    #[serde(default)]
    pub id: ClipId,
    #[serde(default)]
    pub text: String,
    /// Suggested length in seconds from the content plan
    #[serde(default = "default_clip_duration")]
    pub duration: f32,
    #[serde(default)]
    pub video_keywords: Vec<String>,
    #[serde(default)]
    pub video: Option<VideoRef>,
    /// Narration asset: a `data:` URI or a file path
    #[serde(default)]
    pub voice_audio: Option<String>,
}

fn default_clip_duration() -> f32 {
    5.0
}

impl Clip {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ClipId::new(),
            text: text.into(),
            duration: default_clip_duration(),
            video_keywords: Vec::new(),
            video: None,
            voice_audio: None,
        }
    }

    pub fn from_text_clip(clip: TextClip) -> Self {
        Self {
            id: ClipId::new(),
            text: clip.text,
            duration: clip.duration,
            video_keywords: clip.video_keywords,
            video: None,
            voice_audio: None,
        }
    }
}

/// Background video selected for a clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub duration: Option<f32>,
}

/// Transition applied between every pair of adjacent clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransitionKind {
    #[default]
    Fade,
    Slide,
    Zoom,
    Wipe,
    Dissolve,
    Blur,
    /// No effect; every zone renders the identity style
    Cut,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 6] = [
        TransitionKind::Fade,
        TransitionKind::Slide,
        TransitionKind::Zoom,
        TransitionKind::Wipe,
        TransitionKind::Dissolve,
        TransitionKind::Blur,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "fade",
            TransitionKind::Slide => "slide",
            TransitionKind::Zoom => "zoom",
            TransitionKind::Wipe => "wipe",
            TransitionKind::Dissolve => "dissolve",
            TransitionKind::Blur => "blur",
            TransitionKind::Cut => "cut",
        }
    }

    /// Parse a transition name; names outside the known set become `Cut`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "fade" => TransitionKind::Fade,
            "slide" => TransitionKind::Slide,
            "zoom" => TransitionKind::Zoom,
            "wipe" => TransitionKind::Wipe,
            "dissolve" => TransitionKind::Dissolve,
            "blur" => TransitionKind::Blur,
            "cut" | "none" => TransitionKind::Cut,
            other => {
                log::warn!("unknown transition '{}', rendering without effect", other);
                TransitionKind::Cut
            }
        }
    }
}

impl From<String> for TransitionKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<TransitionKind> for String {
    fn from(kind: TransitionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caption and overlay text styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub size: TextSize,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub decoration: TextDecoration,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_font_family() -> String {
    "var(--font-inter)".to_string()
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_weight: FontWeight::default(),
            color: default_text_color(),
            underline: false,
            size: TextSize::default(),
            align: TextAlign::default(),
            decoration: TextDecoration::default(),
            font_family: default_font_family(),
        }
    }
}

/// Partial update to a [`TextStyle`]; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStylePatch {
    pub font_weight: Option<FontWeight>,
    pub color: Option<String>,
    pub underline: Option<bool>,
    pub size: Option<TextSize>,
    pub align: Option<TextAlign>,
    pub decoration: Option<TextDecoration>,
    pub font_family: Option<String>,
}

impl TextStyle {
    pub fn patched(&self, patch: &TextStylePatch) -> Self {
        Self {
            font_weight: patch.font_weight.unwrap_or(self.font_weight),
            color: patch.color.clone().unwrap_or_else(|| self.color.clone()),
            underline: patch.underline.unwrap_or(self.underline),
            size: patch.size.unwrap_or(self.size),
            align: patch.align.unwrap_or(self.align),
            decoration: patch.decoration.unwrap_or(self.decoration),
            font_family: patch
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Shadow1,
    Shadow2,
    Shadow3,
    Shadow4,
}

/// A named text style preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTemplate {
    pub id: String,
    pub name: String,
    pub style: TextStyle,
}

/// Position in percent of the output frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Free text placed over every clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayText {
    pub id: String,
    pub text: String,
    pub position: Position,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub url: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    pub voice_id: String,
    pub engine: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice_id: "Joanna".to_string(),
            engine: "neural".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelStyle {
    pub tone: String,
    pub pacing: Pacing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    Slow,
    #[default]
    Medium,
    Fast,
}

/// Content category of a reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ReelTheme {
    Tutorial,
    BehindTheScenes,
    Travel,
    ProductShowcase,
    Facts,
    Motivational,
    Educational,
    Storytelling,
    Aesthetic,
    TimeLapse,
    Memes,
    #[default]
    Custom,
}

/// Clip plan produced by the script generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextClip {
    pub text: String,
    pub duration: f32,
    #[serde(default)]
    pub video_keywords: Vec<String>,
}

/// Reel plan produced by the script generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelContent {
    pub theme: ReelTheme,
    pub clips: Vec<TextClip>,
    #[serde(default)]
    pub bg_music_keywords: Vec<String>,
    pub style: ReelStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reel_defaults_from_empty_document() {
        let reel: ReelState = serde_json::from_str("{}").unwrap();
        assert_eq!(reel.transition, TransitionKind::Fade);
        assert!(reel.show_text);
        assert_eq!(reel.text_style.color, "#ffffff");
        assert_eq!(reel.text_style.size, TextSize::Medium);
        assert_eq!(reel.saved_templates.len(), 2);
        assert_eq!(reel.voice_settings.voice_id, "Joanna");
    }

    #[test]
    fn test_clip_deserialization_assigns_ids() {
        let json = r#"{
            "clips": [
                {"text": "First", "duration": 3, "videoKeywords": ["sea"]},
                {"text": "Second", "voiceAudio": "narration.mp3"}
            ]
        }"#;
        let reel: ReelState = serde_json::from_str(json).unwrap();
        assert_eq!(reel.clips.len(), 2);
        assert_ne!(reel.clips[0].id, reel.clips[1].id);
        assert_eq!(reel.clips[0].video_keywords, vec!["sea".to_string()]);
        assert_eq!(reel.clips[1].duration, 5.0);
        assert_eq!(reel.clips[1].voice_audio.as_deref(), Some("narration.mp3"));
    }

    #[test]
    fn test_transition_names() {
        for kind in TransitionKind::ALL {
            assert_eq!(TransitionKind::from_name(kind.as_str()), kind);
        }
        assert_eq!(TransitionKind::from_name("Slide"), TransitionKind::Slide);
        assert_eq!(TransitionKind::from_name("spin"), TransitionKind::Cut);
    }

    #[test]
    fn test_unknown_transition_in_document() {
        let reel: ReelState = serde_json::from_str(r#"{"transition": "spiral"}"#).unwrap();
        assert_eq!(reel.transition, TransitionKind::Cut);

        let out = serde_json::to_value(&reel).unwrap();
        assert_eq!(out["transition"], "cut");
    }

    #[test]
    fn test_text_style_patch() {
        let style = TextStyle::default();
        let patch = TextStylePatch {
            color: Some("#FFD700".into()),
            size: Some(TextSize::Large),
            ..Default::default()
        };
        let patched = style.patched(&patch);
        assert_eq!(patched.color, "#FFD700");
        assert_eq!(patched.size, TextSize::Large);
        assert_eq!(patched.align, style.align);
        assert_eq!(patched.font_family, style.font_family);
    }

    #[test]
    fn test_reel_content_deserialization() {
        let json = r#"{
            "theme": "behindTheScenes",
            "clips": [{"text": "Hi", "duration": 3, "videoKeywords": ["studio"]}],
            "bgMusicKeywords": ["calm"],
            "style": {"tone": "casual", "pacing": "fast"}
        }"#;
        let content: ReelContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.theme, ReelTheme::BehindTheScenes);
        assert_eq!(content.style.pacing, Pacing::Fast);
        assert_eq!(content.clips[0].video_keywords, vec!["studio".to_string()]);
    }
}
