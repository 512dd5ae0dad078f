//! Narration length lookups.
//!
//! Each lookup is tracked by a [`LoadTicket`] keyed by clip identity. When the
//! clip list changes, tickets for removed clips or replaced narration are
//! cancelled, and a completion that arrives with a cancelled ticket is dropped
//! instead of landing in the cache.

use crate::audio::NarrationSource;
use crate::reel::{Clip, ClipId};
use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

/// Yields the playable length of a narration asset
pub trait DurationProvider: Send + Sync {
    fn measure(&self, source: &NarrationSource) -> Result<f64>;
}

#[derive(Debug, Clone, PartialEq)]
struct CachedDuration {
    reference: String,
    seconds: f64,
}

/// Measured narration lengths keyed by clip
#[derive(Debug, Default)]
pub struct NarrationCache {
    entries: DashMap<ClipId, CachedDuration>,
}

impl NarrationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of narration for `clip`, if measured for its current reference
    pub fn seconds_for(&self, clip: &Clip) -> Option<f64> {
        let reference = clip.voice_audio.as_deref()?;
        self.entries
            .get(&clip.id)
            .filter(|entry| entry.reference == reference)
            .map(|entry| entry.seconds)
    }

    pub fn insert(&self, clip_id: ClipId, reference: impl Into<String>, seconds: f64) {
        self.entries.insert(
            clip_id,
            CachedDuration {
                reference: reference.into(),
                seconds,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose clip is gone or whose narration changed
    fn retain_current(&self, current: &HashMap<ClipId, &str>) {
        self.entries.retain(|id, entry| {
            current
                .get(id)
                .is_some_and(|reference| *reference == entry.reference)
        });
    }
}

/// Handle for one in-flight lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub clip_id: ClipId,
    generation: u64,
}

#[derive(Debug, Clone)]
struct PendingLoad {
    generation: u64,
    reference: String,
}

/// Result of delivering a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Stored { clip_id: ClipId, seconds: f64 },
    Failed { clip_id: ClipId, reason: String },
    /// The ticket was cancelled before the lookup finished
    Stale { clip_id: ClipId },
}

/// Starts narration lookups and files their results in a [`NarrationCache`]
pub struct NarrationLoader {
    provider: Arc<dyn DurationProvider>,
    cache: Arc<NarrationCache>,
    pending: DashMap<ClipId, PendingLoad>,
    next_generation: AtomicU64,
}

impl NarrationLoader {
    pub fn new(provider: Arc<dyn DurationProvider>) -> Self {
        Self::with_cache(provider, Arc::new(NarrationCache::new()))
    }

    pub fn with_cache(provider: Arc<dyn DurationProvider>, cache: Arc<NarrationCache>) -> Self {
        Self {
            provider,
            cache,
            pending: DashMap::new(),
            next_generation: AtomicU64::new(1),
        }
    }

    pub fn cache(&self) -> &Arc<NarrationCache> {
        &self.cache
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn is_live(&self, ticket: &LoadTicket) -> bool {
        self.pending
            .get(&ticket.clip_id)
            .is_some_and(|p| p.generation == ticket.generation)
    }

    /// Cancel lookups and evict lengths for clips that were removed or
    /// whose narration reference changed
    pub fn reconcile(&self, clips: &[Clip]) {
        let current: HashMap<ClipId, &str> = clips
            .iter()
            .filter_map(|c| c.voice_audio.as_deref().map(|r| (c.id, r)))
            .collect();

        let before = self.pending.len();
        self.pending.retain(|id, load| {
            current
                .get(id)
                .is_some_and(|reference| *reference == load.reference)
        });
        let cancelled = before.saturating_sub(self.pending.len());
        if cancelled > 0 {
            log::debug!("cancelled {} stale narration lookups", cancelled);
        }
        self.cache.retain_current(&current);
    }

    /// Reconcile with the current clip list and issue tickets for clips
    /// whose narration length still has to be measured
    pub fn plan(&self, clips: &[Clip]) -> Vec<(LoadTicket, String)> {
        self.reconcile(clips);

        let mut tickets = Vec::new();
        for clip in clips {
            let Some(reference) = clip.voice_audio.as_deref() else {
                continue;
            };
            if self.cache.seconds_for(clip).is_some() {
                continue;
            }
            if let Entry::Vacant(slot) = self.pending.entry(clip.id) {
                let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                slot.insert(PendingLoad {
                    generation,
                    reference: reference.to_string(),
                });
                tickets.push((
                    LoadTicket {
                        clip_id: clip.id,
                        generation,
                    },
                    reference.to_string(),
                ));
            }
        }
        tickets
    }

    /// Deliver a lookup result; results for cancelled tickets are dropped
    pub fn complete(&self, ticket: LoadTicket, result: Result<f64>) -> Completion {
        let clip_id = ticket.clip_id;
        let Entry::Occupied(slot) = self.pending.entry(clip_id) else {
            log::debug!("dropping narration length for clip {}: cancelled", clip_id);
            return Completion::Stale { clip_id };
        };
        if slot.get().generation != ticket.generation {
            log::debug!("dropping narration length for clip {}: superseded", clip_id);
            return Completion::Stale { clip_id };
        }

        let outcome = match result {
            Ok(seconds) => {
                self.cache.insert(clip_id, slot.get().reference.clone(), seconds);
                Completion::Stored { clip_id, seconds }
            }
            Err(e) => {
                log::warn!("narration length unavailable for clip {}: {:#}", clip_id, e);
                Completion::Failed {
                    clip_id,
                    reason: e.to_string(),
                }
            }
        };
        slot.remove();
        outcome
    }

    fn measure(&self, reference: &str) -> Result<f64> {
        let source = NarrationSource::parse(reference)?;
        self.provider.measure(&source)
    }

    /// Measure every missing narration in parallel and wait for the results
    pub fn refresh(&self, clips: &[Clip]) -> Vec<Completion> {
        self.plan(clips)
            .into_par_iter()
            .map(|(ticket, reference)| self.complete(ticket, self.measure(&reference)))
            .collect()
    }

    /// Start lookups on the rayon pool; completions arrive on the returned channel
    pub fn refresh_in_background(self: &Arc<Self>, clips: &[Clip]) -> mpsc::Receiver<Completion> {
        let (tx, rx) = mpsc::channel();
        for (ticket, reference) in self.plan(clips) {
            let loader = Arc::clone(self);
            let tx = tx.clone();
            rayon::spawn(move || {
                // Skip the probe when the clip changed while this job waited
                let outcome = if loader.is_live(&ticket) {
                    loader.complete(ticket, loader.measure(&reference))
                } else {
                    Completion::Stale {
                        clip_id: ticket.clip_id,
                    }
                };
                let _ = tx.send(outcome);
            });
        }
        rx
    }
}
