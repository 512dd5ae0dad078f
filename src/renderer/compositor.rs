use crate::config::CompositionConfig;
use crate::reel::{ClipId, Position, ReelState, TransitionKind};
use crate::renderer::text::{self, AnimatedWord, TextAnimator};
use crate::renderer::transition::{TransitionCalculator, TransitionStyle};
use crate::renderer::Timeline;
use serde::Serialize;
use std::collections::BTreeMap;

/// CSS property name to value
pub type CssStyle = BTreeMap<&'static str, String>;

/// Background music plays under the whole reel at this volume
pub const BACKGROUND_MUSIC_VOLUME: f32 = 0.3;

/// Everything the render surface draws on one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameComposition {
    pub frame: u32,
    pub time: f32,
    pub transition: TransitionKind,
    /// Bottom layer first
    pub layers: Vec<ClipLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_music: Option<AudioCue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioCue {
    pub src: String,
    pub volume: f32,
}

/// One clip's video, narration and text on one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipLayer {
    pub clip_index: usize,
    pub clip_id: ClipId,
    pub relative_frame: i64,
    pub video_url: String,
    pub style: TransitionStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<AudioCue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<Caption>,
    pub overlays: Vec<OverlayLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub justify_content: &'static str,
    /// Applied to every word
    pub style: CssStyle,
    pub words: Vec<AnimatedWord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayer {
    pub id: String,
    pub text: String,
    pub position: Position,
    pub style: CssStyle,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoLayer {
    pub url: String,
    pub position: Position,
    pub opacity: f64,
}

/// Layer compositor
#[derive(Debug, Clone)]
pub struct Compositor {
    transitions: TransitionCalculator,
    text: TextAnimator,
}

impl Compositor {
    pub fn new(config: &CompositionConfig) -> Self {
        Self {
            transitions: TransitionCalculator::new(config),
            text: TextAnimator::new(config.fps),
        }
    }

    pub fn transitions(&self) -> &TransitionCalculator {
        &self.transitions
    }

    /// Compose frame `frame` of `reel` laid out on `timeline`
    pub fn compose(&self, reel: &ReelState, timeline: &Timeline, frame: u32) -> FrameComposition {
        let layers = timeline
            .segments_at(frame)
            .filter_map(|segment| {
                let clip = reel.clips.get(segment.index)?;
                // Clips without footage are not drawn
                let video = clip.video.as_ref()?;
                let relative_frame = frame as i64 - segment.start_frame as i64;

                let style = self.transitions.style_for(
                    reel.transition,
                    segment.index,
                    relative_frame,
                    segment.duration_frames,
                );

                let caption = (reel.show_text && !clip.text.is_empty()).then(|| Caption {
                    justify_content: text::justify_content(reel.text_style.align),
                    style: text::text_css(&reel.text_style).into_iter().collect(),
                    words: self.text.words(&clip.text, relative_frame),
                });

                let fade_in = self.text.overlay_opacity(relative_frame);
                let overlays = reel
                    .overlay_text
                    .iter()
                    .map(|overlay| OverlayLayer {
                        id: overlay.id.clone(),
                        text: overlay.text.clone(),
                        position: overlay.position,
                        style: text::text_css(&overlay.style).into_iter().collect(),
                        opacity: fade_in,
                    })
                    .collect();

                let logo = reel.logo.as_ref().map(|logo| LogoLayer {
                    url: logo.url.clone(),
                    position: logo.position,
                    opacity: fade_in,
                });

                Some(ClipLayer {
                    clip_index: segment.index,
                    clip_id: clip.id,
                    relative_frame,
                    video_url: video.url.clone(),
                    style,
                    narration: clip.voice_audio.as_ref().map(|src| AudioCue {
                        src: src.clone(),
                        volume: 1.0,
                    }),
                    caption,
                    overlays,
                    logo,
                })
            })
            .collect();

        FrameComposition {
            frame,
            time: timeline.frame_to_time(frame),
            transition: reel.transition,
            layers,
            background_music: reel.bg_music.as_ref().map(|src| AudioCue {
                src: src.clone(),
                volume: BACKGROUND_MUSIC_VOLUME,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::NarrationCache;
    use crate::reel::{Clip, Logo, OverlayText, TextSize, TextStyle, VideoRef};

    fn video(url: &str) -> Option<VideoRef> {
        Some(VideoRef {
            url: url.into(),
            width: None,
            height: None,
            duration: None,
        })
    }

    fn test_reel() -> ReelState {
        let mut first = Clip::new("Did you know");
        first.video = video("https://videos.example/1.mp4");
        let mut second = Clip::new("");
        second.video = video("https://videos.example/2.mp4");
        second.voice_audio = Some("voice2.mp3".into());
        let third = Clip::new("No footage yet");

        ReelState {
            prompt: "octopus facts".into(),
            clips: vec![first, second, third],
            bg_music: Some("https://music.example/upbeat.mp3".into()),
            ..Default::default()
        }
    }

    fn compose(reel: &ReelState, frame: u32) -> FrameComposition {
        let config = CompositionConfig::default();
        let timeline = Timeline::from_reel(reel, &NarrationCache::new(), &config);
        Compositor::new(&config).compose(reel, &timeline, frame)
    }

    #[test]
    fn test_single_clip_frame() {
        let reel = test_reel();
        let frame = compose(&reel, 100);
        assert_eq!(frame.layers.len(), 1);

        let layer = &frame.layers[0];
        assert_eq!(layer.clip_index, 0);
        assert_eq!(layer.relative_frame, 100);
        assert!(layer.style.is_identity());
        assert_eq!(layer.caption.as_ref().unwrap().words.len(), 3);
        assert_eq!(
            frame.background_music,
            Some(AudioCue {
                src: "https://music.example/upbeat.mp3".into(),
                volume: BACKGROUND_MUSIC_VOLUME,
            })
        );
    }

    #[test]
    fn test_overlap_frame_has_both_clips() {
        let reel = test_reel();
        // Clip 0 runs 0..210, clip 1 starts at 180
        let frame = compose(&reel, 180);
        assert_eq!(frame.layers.len(), 2);

        let outgoing = &frame.layers[0];
        let incoming = &frame.layers[1];
        assert_eq!(outgoing.style.opacity, 1.0);
        assert_eq!(incoming.relative_frame, 0);
        assert_eq!(incoming.style.opacity, 0.0);
        assert!(incoming.caption.is_none());
        assert_eq!(incoming.narration.as_ref().unwrap().src, "voice2.mp3");
    }

    #[test]
    fn test_clip_without_video_is_skipped() {
        let reel = test_reel();
        // Clip 2 starts at 360 and has no footage
        let frame = compose(&reel, 400);
        assert!(frame.layers.is_empty());
    }

    #[test]
    fn test_captions_hidden() {
        let mut reel = test_reel();
        reel.show_text = false;
        let frame = compose(&reel, 50);
        assert!(frame.layers[0].caption.is_none());
    }

    #[test]
    fn test_text_styles_reach_the_frame() {
        let mut reel = test_reel();
        reel.text_style.color = "#FFD700".into();
        reel.overlay_text.push(OverlayText {
            id: "o1".into(),
            text: "@octo".into(),
            position: Position { x: 50.0, y: 10.0 },
            style: TextStyle {
                color: "#00ff00".into(),
                size: TextSize::Small,
                ..Default::default()
            },
        });

        let frame = compose(&reel, 50);
        let layer = &frame.layers[0];
        let caption = layer.caption.as_ref().unwrap();
        assert_eq!(caption.style["color"], "#FFD700");
        assert_eq!(caption.style["font-size"], "4rem");
        assert_eq!(layer.overlays[0].style["color"], "#00ff00");
        assert_eq!(layer.overlays[0].style["font-size"], "3rem");

        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("#FFD700"));
        assert!(json.contains("#00ff00"));
    }

    #[test]
    fn test_overlays_and_logo_fade_in_per_clip() {
        let mut reel = test_reel();
        reel.overlay_text.push(OverlayText {
            id: "o1".into(),
            text: "@octo".into(),
            position: Position { x: 50.0, y: 10.0 },
            style: Default::default(),
        });
        reel.logo = Some(Logo {
            url: "logo.png".into(),
            position: Position { x: 90.0, y: 90.0 },
        });

        let frame = compose(&reel, 0);
        assert_eq!(frame.layers[0].overlays[0].opacity, 0.0);
        assert_eq!(frame.layers[0].logo.as_ref().unwrap().opacity, 0.0);

        let frame = compose(&reel, 100);
        assert_eq!(frame.layers[0].overlays[0].opacity, 1.0);
        assert_eq!(frame.layers[0].logo.as_ref().unwrap().opacity, 1.0);
    }
}
