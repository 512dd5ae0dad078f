use crate::reel::{FontWeight, TextAlign, TextDecoration, TextSize, TextStyle};
use crate::renderer::spring::{Spring, SpringConfig};
use serde::Serialize;

/// Caption reveal rate
pub const WORDS_PER_SECOND: f64 = 2.0;
const WORD_SPRING_FRAMES: u32 = 8;
const OVERLAY_SPRING_FRAMES: u32 = 20;
const WORD_START_SCALE: f64 = 1.2;

const SHADOW_SOFT: &str = "2px 2px 4px rgba(0,0,0,0.5)";
const SHADOW_GLOW: &str = "0 0 10px rgba(255,255,255,0.8), 0 0 20px rgba(255,255,255,0.8)";
const SHADOW_OUTLINE: &str = "-2px -2px 0 #000, 2px -2px 0 #000, -2px 2px 0 #000, 2px 2px 0 #000";

/// One caption word on one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatedWord {
    pub word: String,
    pub start_frame: f64,
    pub opacity: f64,
    pub scale: f64,
}

/// Word-by-word caption reveal and overlay fade-in
#[derive(Debug, Clone)]
pub struct TextAnimator {
    fps: u32,
    word_spring: Spring,
    overlay_spring: Spring,
}

impl TextAnimator {
    pub fn new(fps: u32) -> Self {
        let smooth = SpringConfig::with_damping(200.0);
        Self {
            fps,
            word_spring: Spring::new(smooth, fps).with_duration(WORD_SPRING_FRAMES),
            overlay_spring: Spring::new(smooth, fps).with_duration(OVERLAY_SPRING_FRAMES),
        }
    }

    pub fn frames_per_word(&self) -> f64 {
        self.fps as f64 / WORDS_PER_SECOND
    }

    /// Caption words as they appear `relative_frame` frames into a clip
    pub fn words(&self, text: &str, relative_frame: i64) -> Vec<AnimatedWord> {
        let per_word = self.frames_per_word();
        text.split(' ')
            .filter(|w| !w.is_empty())
            .enumerate()
            .map(|(i, word)| {
                let start_frame = i as f64 * per_word;
                let local = relative_frame as f64 - start_frame;
                AnimatedWord {
                    word: word.to_string(),
                    start_frame,
                    opacity: self.word_spring.progress(local),
                    scale: self.word_spring.value(local, WORD_START_SCALE, 1.0),
                }
            })
            .collect()
    }

    /// Opacity of overlay text and the logo
    pub fn overlay_opacity(&self, relative_frame: i64) -> f64 {
        self.overlay_spring.progress(relative_frame as f64)
    }
}

pub fn font_size(size: TextSize) -> &'static str {
    match size {
        TextSize::Small => "3rem",
        TextSize::Medium => "4rem",
        TextSize::Large => "5rem",
    }
}

pub fn text_shadow(decoration: TextDecoration) -> &'static str {
    match decoration {
        TextDecoration::Shadow1 => SHADOW_SOFT,
        TextDecoration::Shadow2 => SHADOW_GLOW,
        TextDecoration::Shadow3 => SHADOW_OUTLINE,
        TextDecoration::None | TextDecoration::Shadow4 => "none",
    }
}

/// Flex alignment of the caption row
pub fn justify_content(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "flex-start",
        TextAlign::Center => "center",
        TextAlign::Right => "flex-end",
    }
}

/// CSS declarations for caption and overlay text
pub fn text_css(style: &TextStyle) -> Vec<(&'static str, String)> {
    let weight = match style.font_weight {
        FontWeight::Normal => "normal",
        FontWeight::Bold => "bold",
    };
    vec![
        ("color", style.color.clone()),
        ("font-size", font_size(style.size).to_string()),
        ("font-weight", weight.to_string()),
        ("font-family", style.font_family.clone()),
        (
            "text-decoration",
            if style.underline { "underline" } else { "none" }.to_string(),
        ),
        ("text-shadow", text_shadow(style.decoration).to_string()),
    ]
}
