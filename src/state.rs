//! Editing actions over a [`ReelState`] and their persistence.
//!
//! [`reduce`] never touches storage. [`ReelSession`] applies an action and
//! then saves or clears the store as a separate step.

use crate::reel::{
    Clip, ClipId, Logo, OverlayText, Position, ReelContent, ReelState, StyleTemplate, TextStyle,
    TextStylePatch, TransitionKind, VideoRef, VoiceSettings,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One edit to a reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReelAction {
    /// Start a session from a generated content plan
    SubmitPrompt {
        prompt: String,
        content: ReelContent,
        #[serde(default)]
        bg_music: Option<String>,
    },
    SetClipText {
        clip_id: ClipId,
        text: String,
    },
    SetClipVideo {
        clip_id: ClipId,
        video: Option<VideoRef>,
    },
    SetClipVoice {
        clip_id: ClipId,
        voice_audio: Option<String>,
    },
    SetVoiceSettings {
        settings: VoiceSettings,
    },
    SetBackgroundMusic {
        bg_music: Option<String>,
    },
    SetTransition {
        transition: TransitionKind,
    },
    SetShowText {
        show_text: bool,
    },
    UpdateTextStyle {
        patch: TextStylePatch,
    },
    /// Store the current text style as a named template
    SaveTemplate {
        name: String,
    },
    ApplyTemplate {
        id: String,
    },
    AddOverlay {
        text: String,
    },
    MoveOverlay {
        id: String,
        position: Position,
    },
    RemoveOverlay {
        id: String,
    },
    SetLogo {
        logo: Option<Logo>,
    },
    /// Drop the session; the store is cleared
    NewReel,
}

/// Apply `action` to `state`, returning the next state
pub fn reduce(state: &ReelState, action: ReelAction) -> ReelState {
    let mut next = state.clone();

    match action {
        ReelAction::SubmitPrompt {
            prompt,
            content,
            bg_music,
        } => {
            next.prompt = prompt;
            next.clips = content
                .clips
                .into_iter()
                .map(Clip::from_text_clip)
                .collect();
            next.style = Some(content.style);
            next.bg_music_keywords = content.bg_music_keywords;
            next.bg_music = bg_music;
            next.voice_settings = VoiceSettings {
                voice_id: "Joey".to_string(),
                engine: "neural".to_string(),
            };
        }
        ReelAction::SetClipText { clip_id, text } => {
            if let Some(clip) = clip_mut(&mut next, clip_id) {
                clip.text = text;
            }
        }
        ReelAction::SetClipVideo { clip_id, video } => {
            if let Some(clip) = clip_mut(&mut next, clip_id) {
                clip.video = video;
            }
        }
        ReelAction::SetClipVoice {
            clip_id,
            voice_audio,
        } => {
            if let Some(clip) = clip_mut(&mut next, clip_id) {
                clip.voice_audio = voice_audio;
            }
        }
        ReelAction::SetVoiceSettings { settings } => next.voice_settings = settings,
        ReelAction::SetBackgroundMusic { bg_music } => next.bg_music = bg_music,
        ReelAction::SetTransition { transition } => next.transition = transition,
        ReelAction::SetShowText { show_text } => next.show_text = show_text,
        ReelAction::UpdateTextStyle { patch } => {
            next.text_style = next.text_style.patched(&patch);
        }
        ReelAction::SaveTemplate { name } => {
            let id = next_id("template", next.saved_templates.iter().map(|t| t.id.as_str()));
            next.saved_templates.push(StyleTemplate {
                id,
                name,
                style: next.text_style.clone(),
            });
        }
        ReelAction::ApplyTemplate { id } => {
            match next.saved_templates.iter().find(|t| t.id == id) {
                Some(template) => next.text_style = template.style.clone(),
                None => log::warn!("no saved template with id '{}'", id),
            }
        }
        ReelAction::AddOverlay { text } => {
            let text = text.trim();
            if !text.is_empty() {
                let id = next_id("text", next.overlay_text.iter().map(|o| o.id.as_str()));
                next.overlay_text.push(OverlayText {
                    id,
                    text: text.to_string(),
                    position: Position { x: 50.0, y: 50.0 },
                    style: TextStyle::default(),
                });
            }
        }
        ReelAction::MoveOverlay { id, position } => {
            if let Some(overlay) = next.overlay_text.iter_mut().find(|o| o.id == id) {
                overlay.position = Position {
                    x: position.x.clamp(0.0, 100.0),
                    y: position.y.clamp(0.0, 100.0),
                };
            }
        }
        ReelAction::RemoveOverlay { id } => next.overlay_text.retain(|o| o.id != id),
        ReelAction::SetLogo { logo } => next.logo = logo,
        ReelAction::NewReel => next.prompt.clear(),
    }

    next
}

fn clip_mut(state: &mut ReelState, id: ClipId) -> Option<&mut Clip> {
    let clip = state.clips.iter_mut().find(|c| c.id == id);
    if clip.is_none() {
        log::warn!("no clip with id {}", id);
    }
    clip
}

/// `{prefix}-{n}` with `n` one past the largest numeric suffix already taken
fn next_id<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let taken = existing
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{}", prefix, taken + 1)
}

/// Where a session's reel is kept between runs
pub trait StateStore {
    fn load(&self) -> Result<Option<ReelState>>;
    fn save(&self, state: &ReelState) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Pretty-printed JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<ReelState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        // Missing fields fall back to ReelState defaults
        let state = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;
        Ok(Some(state))
    }

    fn save(&self, state: &ReelState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(state)?)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove state file: {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// A reel being edited, persisted after every action
pub struct ReelSession<S: StateStore> {
    state: ReelState,
    store: S,
}

impl<S: StateStore> ReelSession<S> {
    /// Resume the stored reel, or start from defaults when there is none or
    /// it cannot be read
    pub fn open(store: S) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => ReelState::default(),
            Err(e) => {
                log::warn!("discarding saved reel: {:#}", e);
                ReelState::default()
            }
        };
        Self { state, store }
    }

    pub fn state(&self) -> &ReelState {
        &self.state
    }

    pub fn dispatch(&mut self, action: ReelAction) -> Result<&ReelState> {
        let clears = matches!(action, ReelAction::NewReel);
        self.state = reduce(&self.state, action);

        if clears {
            self.store.clear()?;
        } else if !self.state.prompt.is_empty() {
            self.store.save(&self.state)?;
        }
        Ok(&self.state)
    }
}
