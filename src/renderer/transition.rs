use crate::config::CompositionConfig;
use crate::reel::TransitionKind;
use crate::renderer::spring::{Spring, SpringConfig};
use serde::Serialize;

/// Spring used for every clip-to-clip handoff
pub const TRANSITION_SPRING: SpringConfig = SpringConfig {
    damping: 100.0,
    mass: 0.5,
    stiffness: 100.0,
};

/// Which part of its visible window a clip is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionZone {
    Entering,
    Steady,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerTransform {
    /// Horizontal offset in percent of the layer width
    TranslateX { percent: f64 },
    Scale { factor: f64 },
}

/// Visual effect applied to a clip's video layer on one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionStyle {
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<LayerTransform>,
    /// Right inset of the visible rectangle, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_inset_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_px: Option<f64>,
}

impl TransitionStyle {
    pub fn identity() -> Self {
        Self {
            opacity: 1.0,
            transform: None,
            clip_inset_right: None,
            blur_px: None,
        }
    }

    fn with_opacity(opacity: f64) -> Self {
        Self {
            opacity,
            ..Self::identity()
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// CSS declarations for the layer, in a stable order
    pub fn css(&self) -> Vec<(&'static str, String)> {
        let mut decls = vec![("opacity", format!("{}", self.opacity))];
        match self.transform {
            Some(LayerTransform::TranslateX { percent }) => {
                decls.push(("transform", format!("translateX({}%)", percent)))
            }
            Some(LayerTransform::Scale { factor }) => {
                decls.push(("transform", format!("scale({})", factor)))
            }
            None => {}
        }
        if let Some(right) = self.clip_inset_right {
            decls.push(("clip-path", format!("inset(0 {}% 0 0)", right)));
        }
        if let Some(blur) = self.blur_px {
            decls.push(("filter", format!("blur({}px)", blur)));
        }
        decls
    }
}

/// Computes per-frame transition styles for clips on a timeline
#[derive(Debug, Clone)]
pub struct TransitionCalculator {
    transition_frames: u32,
    spring: Spring,
}

impl TransitionCalculator {
    pub fn new(config: &CompositionConfig) -> Self {
        Self::with_window(config.transition_duration, config.fps)
    }

    pub fn with_window(transition_frames: u32, fps: u32) -> Self {
        Self {
            transition_frames,
            spring: Spring::new(TRANSITION_SPRING, fps).with_duration(transition_frames),
        }
    }

    pub fn transition_frames(&self) -> u32 {
        self.transition_frames
    }

    pub fn zone(&self, relative_frame: i64, clip_duration: u32) -> TransitionZone {
        let window = self.transition_frames as i64;
        if relative_frame < window {
            TransitionZone::Entering
        } else if relative_frame > clip_duration as i64 - window {
            TransitionZone::Exiting
        } else {
            TransitionZone::Steady
        }
    }

    /// Style for a clip `relative_frame` frames after its start.
    ///
    /// Only an entering clip animates its opacity. An exiting clip keeps
    /// opacity 1 while its transform, clip region or blur still animate.
    pub fn style_for(
        &self,
        kind: TransitionKind,
        _clip_index: usize,
        relative_frame: i64,
        clip_duration: u32,
    ) -> TransitionStyle {
        let zone = self.zone(relative_frame, clip_duration);
        let entering = match zone {
            TransitionZone::Steady => return TransitionStyle::identity(),
            TransitionZone::Entering => true,
            TransitionZone::Exiting => false,
        };

        let spring_frame = if entering {
            relative_frame
        } else {
            clip_duration as i64 - relative_frame
        };
        let p = self.spring.progress(spring_frame as f64);
        let opacity = if entering { p } else { 1.0 };

        match kind {
            TransitionKind::Fade => TransitionStyle::with_opacity(opacity),
            TransitionKind::Slide => TransitionStyle {
                transform: Some(LayerTransform::TranslateX {
                    percent: if entering {
                        (1.0 - p) * 100.0
                    } else {
                        (1.0 - p) * -100.0
                    },
                }),
                ..TransitionStyle::identity()
            },
            TransitionKind::Zoom => TransitionStyle {
                transform: Some(LayerTransform::Scale {
                    factor: if entering { p } else { 2.0 - p },
                }),
                ..TransitionStyle::with_opacity(opacity)
            },
            TransitionKind::Wipe => TransitionStyle {
                clip_inset_right: Some(if entering {
                    (1.0 - p) * 100.0
                } else {
                    p * 100.0
                }),
                ..TransitionStyle::identity()
            },
            TransitionKind::Dissolve => TransitionStyle {
                blur_px: Some((1.0 - p) * 10.0),
                ..TransitionStyle::with_opacity(opacity)
            },
            TransitionKind::Blur => TransitionStyle {
                blur_px: Some((1.0 - p) * 20.0),
                ..TransitionStyle::with_opacity(opacity)
            },
            TransitionKind::Cut => TransitionStyle::identity(),
        }
    }

    /// Same as [`style_for`](Self::style_for) for a transition given by name
    pub fn style_for_name(
        &self,
        name: &str,
        clip_index: usize,
        relative_frame: i64,
        clip_duration: u32,
    ) -> TransitionStyle {
        self.style_for(
            TransitionKind::from_name(name),
            clip_index,
            relative_frame,
            clip_duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u32 = 30;

    fn calculator() -> TransitionCalculator {
        TransitionCalculator::with_window(T, 30)
    }

    #[test]
    fn test_fade_entry_and_settle() {
        let calc = calculator();
        let start = calc.style_for(TransitionKind::Fade, 0, 0, 180);
        assert_eq!(start.opacity, 0.0);

        let settled = calc.style_for(TransitionKind::Fade, 0, T as i64, 180);
        assert_eq!(settled.opacity, 1.0);
        assert!(settled.is_identity());
    }

    #[test]
    fn test_steady_zone_is_identity_for_every_kind() {
        let calc = calculator();
        let duration = 10 * T;
        for kind in TransitionKind::ALL {
            let style = calc.style_for(kind, 2, (duration / 2) as i64, duration);
            assert!(style.is_identity(), "{} not identity in steady zone", kind);
        }
    }

    #[test]
    fn test_zones() {
        let calc = calculator();
        assert_eq!(calc.zone(0, 180), TransitionZone::Entering);
        assert_eq!(calc.zone(29, 180), TransitionZone::Entering);
        assert_eq!(calc.zone(30, 180), TransitionZone::Steady);
        assert_eq!(calc.zone(150, 180), TransitionZone::Steady);
        assert_eq!(calc.zone(151, 180), TransitionZone::Exiting);
    }

    #[test]
    fn test_exiting_clip_keeps_full_opacity() {
        let calc = calculator();
        for kind in TransitionKind::ALL {
            for frame in 151..180 {
                let style = calc.style_for(kind, 0, frame, 180);
                assert_eq!(style.opacity, 1.0, "{} faded while exiting", kind);
            }
        }
    }

    #[test]
    fn test_exiting_effects_still_animate() {
        let calc = calculator();
        let style = calc.style_for(TransitionKind::Blur, 0, 179, 180);
        assert_eq!(style.opacity, 1.0);
        assert!(style.blur_px.unwrap() > 15.0);

        let style = calc.style_for(TransitionKind::Zoom, 0, 179, 180);
        match style.transform {
            Some(LayerTransform::Scale { factor }) => assert!(factor > 1.5),
            other => panic!("expected scale, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_descriptors_at_first_frame() {
        let calc = calculator();

        let slide = calc.style_for(TransitionKind::Slide, 1, 0, 180);
        assert_eq!(slide.opacity, 1.0);
        assert_eq!(
            slide.transform,
            Some(LayerTransform::TranslateX { percent: 100.0 })
        );

        let zoom = calc.style_for(TransitionKind::Zoom, 1, 0, 180);
        assert_eq!(zoom.opacity, 0.0);
        assert_eq!(zoom.transform, Some(LayerTransform::Scale { factor: 0.0 }));

        let wipe = calc.style_for(TransitionKind::Wipe, 1, 0, 180);
        assert_eq!(wipe.opacity, 1.0);
        assert_eq!(wipe.clip_inset_right, Some(100.0));

        let dissolve = calc.style_for(TransitionKind::Dissolve, 1, 0, 180);
        assert_eq!(dissolve.blur_px, Some(10.0));

        let blur = calc.style_for(TransitionKind::Blur, 1, 0, 180);
        assert_eq!(blur.blur_px, Some(20.0));
    }

    #[test]
    fn test_slide_exits_to_the_left() {
        let calc = calculator();
        let style = calc.style_for(TransitionKind::Slide, 0, 175, 180);
        match style.transform {
            Some(LayerTransform::TranslateX { percent }) => assert!(percent < 0.0),
            other => panic!("expected translate, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_identity() {
        let calc = calculator();
        let style = calc.style_for_name("kaleidoscope", 0, 0, 180);
        assert!(style.is_identity());
        assert!(calc.style_for(TransitionKind::Cut, 0, 5, 180).is_identity());
    }

    #[test]
    fn test_css_declarations() {
        let style = TransitionStyle {
            opacity: 0.5,
            transform: Some(LayerTransform::TranslateX { percent: 50.0 }),
            clip_inset_right: Some(25.0),
            blur_px: Some(4.0),
        };
        let css = style.css();
        assert_eq!(css[0], ("opacity", "0.5".to_string()));
        assert_eq!(css[1], ("transform", "translateX(50%)".to_string()));
        assert_eq!(css[2], ("clip-path", "inset(0 25% 0 0)".to_string()));
        assert_eq!(css[3], ("filter", "blur(4px)".to_string()));

        assert_eq!(TransitionStyle::identity().css().len(), 1);
    }
}
