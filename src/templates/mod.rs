use crate::reel::{
    FontWeight, Pacing, ReelContent, ReelStyle, ReelTheme, StyleTemplate, TextAlign, TextClip,
    TextDecoration, TextSize, TextStyle,
};

pub const DEFAULT_CLIP_COUNT: usize = 5;

/// Text style presets every new reel starts with
pub fn stock_style_templates() -> Vec<StyleTemplate> {
    vec![
        StyleTemplate {
            id: "template-1".into(),
            name: "Default".into(),
            style: TextStyle::default(),
        },
        StyleTemplate {
            id: "template-2".into(),
            name: "Bold Yellow".into(),
            style: TextStyle {
                font_weight: FontWeight::Bold,
                color: "#FFD700".into(),
                underline: false,
                size: TextSize::Large,
                align: TextAlign::Center,
                decoration: TextDecoration::Shadow1,
                font_family: "var(--font-roboto)".into(),
            },
        },
    ]
}

pub struct ReelTemplate;

impl ReelTemplate {
    /// Content plan used when the script generator is unavailable or its
    /// answer cannot be used: an intro, `number_of_clips - 2` facts and an outro
    pub fn fallback(prompt: &str, theme: Option<ReelTheme>, number_of_clips: usize) -> ReelContent {
        let facts = number_of_clips.max(2) - 2;

        let mut clips = Vec::with_capacity(facts + 2);
        clips.push(TextClip {
            text: format!("🔥 Discover amazing {}!", prompt),
            duration: 3.0,
            video_keywords: vec![prompt.into(), "intro".into(), "attention-grabbing".into()],
        });
        clips.extend((0..facts).map(|i| TextClip {
            text: format!("Interesting fact #{} about {}", i + 1, prompt),
            duration: 5.0,
            video_keywords: vec![prompt.into(), "background".into(), "generic".into()],
        }));
        clips.push(TextClip {
            text: "👉 Follow for more amazing content!".into(),
            duration: 3.0,
            video_keywords: vec!["outro".into(), "call-to-action".into(), "engaging".into()],
        });

        ReelContent {
            theme: theme.unwrap_or_default(),
            clips,
            bg_music_keywords: vec!["upbeat".into(), "energetic".into(), "background".into()],
            style: ReelStyle {
                tone: "casual".into(),
                pacing: Pacing::Medium,
            },
        }
    }
}
