use crate::error::ReelError;
use crate::reel::{Position, ReelContent, ReelState, ReelTheme, TextStyle};
use crate::templates::ReelTemplate;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

fn hex_color() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex")
    })
}

/// A generated content plan, or the fallback plan and why it was used
#[derive(Debug, Clone)]
pub struct ContentOutcome {
    pub content: ReelContent,
    pub error: Option<String>,
}

/// Parser that handles reel documents and generated content plans
pub struct ReelParser;

impl ReelParser {
    /// Parse a JSON reel document
    pub fn parse_json(path: &Path) -> Result<ReelState> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reel file: {}", path.display()))?;

        Self::parse_str(&content)
            .with_context(|| format!("Failed to parse reel: {}", path.display()))
    }

    pub fn parse_str(content: &str) -> Result<ReelState> {
        let reel: ReelState = serde_json::from_str(content).context("Invalid reel JSON")?;
        Self::validate_reel(&reel)?;
        Ok(reel)
    }

    /// Validate the reel structure
    pub fn validate_reel(reel: &ReelState) -> Result<(), ReelError> {
        Self::validate_style("textStyle", &reel.text_style)?;
        for template in &reel.saved_templates {
            Self::validate_style(&format!("template '{}'", template.id), &template.style)?;
        }

        for overlay in &reel.overlay_text {
            Self::validate_style(&format!("overlay '{}'", overlay.id), &overlay.style)?;
            Self::validate_position("overlay", &overlay.id, overlay.position)?;
        }
        if let Some(logo) = &reel.logo {
            Self::validate_position("logo", &logo.url, logo.position)?;
        }

        let mut seen = HashSet::new();
        for clip in &reel.clips {
            if !seen.insert(clip.id) {
                return Err(ReelError::DuplicateClipId(clip.id.to_string()));
            }
        }

        let without_video = reel.clips.iter().filter(|c| c.video.is_none()).count();
        if without_video > 0 {
            log::warn!(
                "{} of {} clips have no video and will not be drawn",
                without_video,
                reel.clips.len()
            );
        }

        Ok(())
    }

    fn validate_style(location: &str, style: &TextStyle) -> Result<(), ReelError> {
        if !hex_color().is_match(&style.color) {
            return Err(ReelError::InvalidColor {
                location: location.to_string(),
                value: style.color.clone(),
            });
        }
        Ok(())
    }

    fn validate_position(item: &str, id: &str, position: Position) -> Result<(), ReelError> {
        let inside = |v: f32| v.is_finite() && (0.0..=100.0).contains(&v);
        if !inside(position.x) || !inside(position.y) {
            return Err(ReelError::PositionOutOfFrame {
                item: item.to_string(),
                id: id.to_string(),
                x: position.x,
                y: position.y,
            });
        }
        Ok(())
    }

    /// Read a content plan from the script generator, falling back to the
    /// template plan when the answer is unusable
    pub fn parse_content(
        raw: &str,
        prompt: &str,
        theme: Option<ReelTheme>,
        number_of_clips: usize,
    ) -> ContentOutcome {
        let parsed = serde_json::from_str::<ReelContent>(raw)
            .map_err(|e| ReelError::InvalidContent(e.to_string()))
            .and_then(|content| Self::validate_content(&content).map(|_| content));

        match parsed {
            Ok(content) => ContentOutcome {
                content,
                error: None,
            },
            Err(e) => {
                log::warn!("using fallback reel content: {}", e);
                ContentOutcome {
                    content: ReelTemplate::fallback(prompt, theme, number_of_clips),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn validate_content(content: &ReelContent) -> Result<(), ReelError> {
        if content.clips.is_empty() {
            return Err(ReelError::InvalidContent("plan has no clips".into()));
        }
        Ok(())
    }

    /// Get a summary of the reel structure
    pub fn summarize(reel: &ReelState) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("Prompt: {}\n", reel.prompt));
        summary.push_str(&format!("Transition: {}\n", reel.transition));
        summary.push_str(&format!(
            "Captions: {}\n",
            if reel.show_text { "on" } else { "off" }
        ));
        summary.push_str(&format!("Clips: {}\n", reel.clips.len()));

        for (idx, clip) in reel.clips.iter().enumerate() {
            summary.push_str(&format!(
                "  Clip {}: '{}' (video: {}, narration: {})\n",
                idx + 1,
                clip.text,
                if clip.video.is_some() { "yes" } else { "no" },
                if clip.voice_audio.is_some() { "yes" } else { "no" }
            ));
        }

        if !reel.overlay_text.is_empty() {
            summary.push_str(&format!("Overlays: {}\n", reel.overlay_text.len()));
        }
        if reel.bg_music.is_some() {
            summary.push_str("Background music: yes\n");
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_valid_json() {
        let json = r##"
        {
            "prompt": "deep sea creatures",
            "transition": "zoom",
            "clips": [
                {
                    "text": "The ocean hides giants",
                    "duration": 3,
                    "videoKeywords": ["ocean"],
                    "video": {"url": "https://videos.example/ocean.mp4"}
                }
            ],
            "textStyle": {"color": "#ff0000", "size": "large"}
        }
        "##;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let reel = ReelParser::parse_json(file.path()).unwrap();
        assert_eq!(reel.clips.len(), 1);
        assert_eq!(reel.text_style.color, "#ff0000");
    }

    #[test]
    fn test_parse_invalid_color() {
        let json = r#"{"textStyle": {"color": "red"}}"#;
        let err = ReelParser::parse_str(json).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid color 'red'"));
    }

    #[test]
    fn test_overlay_outside_frame() {
        let json = r##"{
            "overlayText": [
                {"id": "o1", "text": "hi", "position": {"x": 120, "y": 50}}
            ]
        }"##;
        let err = ReelParser::parse_str(json).unwrap_err();
        assert!(format!("{:#}", err).contains("outside the frame"));
    }

    #[test]
    fn test_duplicate_clip_ids() {
        let json = r#"{
            "clips": [
                {"id": "4a8f5c2e-8f4b-4d7e-9a57-2b8f0d6c1e11", "text": "a"},
                {"id": "4a8f5c2e-8f4b-4d7e-9a57-2b8f0d6c1e11", "text": "b"}
            ]
        }"#;
        let err = ReelParser::parse_str(json).unwrap_err();
        assert!(format!("{:#}", err).contains("more than once"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = ReelParser::parse_json(Path::new("/nonexistent/reel.json"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read reel file"));
    }

    #[test]
    fn test_parse_content_accepts_valid_plan() {
        let raw = r#"{
            "theme": "travel",
            "clips": [{"text": "Kyoto at dawn", "duration": 4, "videoKeywords": ["kyoto"]}],
            "bgMusicKeywords": ["lofi"],
            "style": {"tone": "calm", "pacing": "slow"}
        }"#;
        let outcome = ReelParser::parse_content(raw, "kyoto", None, 5);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.content.theme, ReelTheme::Travel);
        assert_eq!(outcome.content.clips.len(), 1);
    }

    #[test]
    fn test_parse_content_falls_back() {
        let outcome = ReelParser::parse_content("not json", "kyoto", Some(ReelTheme::Travel), 4);
        assert!(outcome.error.is_some());
        assert_eq!(outcome.content.clips.len(), 4);
        assert_eq!(outcome.content.theme, ReelTheme::Travel);

        let empty = r#"{"theme": "facts", "clips": [], "style": {"tone": "x", "pacing": "fast"}}"#;
        let outcome = ReelParser::parse_content(empty, "kyoto", None, 3);
        assert!(outcome.error.unwrap().contains("no clips"));
        assert_eq!(outcome.content.theme, ReelTheme::Custom);
    }

    #[test]
    fn test_summarize() {
        let json = r#"{
            "prompt": "My Reel",
            "transition": "wipe",
            "clips": [{"text": "Hello", "voiceAudio": "a.mp3"}],
            "bgMusic": "music.mp3"
        }"#;
        let reel = ReelParser::parse_str(json).unwrap();
        let summary = ReelParser::summarize(&reel);
        assert!(summary.contains("My Reel"));
        assert!(summary.contains("Transition: wipe"));
        assert!(summary.contains("narration: yes"));
        assert!(summary.contains("Background music: yes"));
    }
}
