pub mod compositor;
pub mod duration;
pub mod engine;
pub mod spring;
pub mod text;
pub mod timeline;
pub mod transition;

pub use compositor::{Compositor, FrameComposition};
pub use duration::{resolve_duration, DurationResolver};
pub use engine::PreviewEngine;
pub use spring::{Spring, SpringConfig};
pub use timeline::{layout, Layout, Timeline};
pub use transition::{TransitionCalculator, TransitionStyle};
