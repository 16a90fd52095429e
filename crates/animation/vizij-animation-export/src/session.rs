//! Export session: settings, encoder, remap and cache for one export run.
//!
//! Methods:
//! - new, begin (new session id, cache cleared), needs_baking, keyframes, sampler, finish

use std::sync::Arc;

use tracing::{debug, trace};

use crate::analyze::bake_reason;
use crate::assemble::{assemble_sampler, resolve_interpolation, AnimationSampler};
use crate::cache::{CacheKey, SamplerCache};
use crate::config::ExportSettings;
use crate::data::ChannelGroup;
use crate::encode::BufferEncoder;
use crate::error::{ExportError, Result};
use crate::extract::extract_keyframes;
use crate::ids::{SessionId, SessionIdAllocator};
use crate::keyframe::Keyframe;
use crate::remap::{remap_keyframes, CoordinateRemap, StandardRemap};

/// One export run.
///
/// Requests go through `&mut self`, so a group is computed at most once per
/// session and a cached result is always complete.
#[derive(Debug)]
pub struct ExportSession<E: BufferEncoder, R: CoordinateRemap = StandardRemap> {
    // Owned data
    id: SessionId,
    ids: SessionIdAllocator,
    settings: ExportSettings,

    // Collaborators
    encoder: E,
    remap: R,

    cache: SamplerCache<E::Handle>,
}

impl<E: BufferEncoder> ExportSession<E> {
    /// Start a session with the standard Z-up to Y-up remap.
    pub fn new(settings: ExportSettings, encoder: E) -> Result<Self> {
        Self::with_remap(settings, encoder, StandardRemap)
    }
}

impl<E: BufferEncoder, R: CoordinateRemap> ExportSession<E, R> {
    pub fn with_remap(settings: ExportSettings, encoder: E, remap: R) -> Result<Self> {
        settings.validate()?;
        let mut ids = SessionIdAllocator::new();
        let id = ids.alloc();
        debug!("session: begin {id}");
        Ok(Self {
            id,
            ids,
            settings,
            encoder,
            remap,
            cache: SamplerCache::new(),
        })
    }

    /// Start a new export run on the same encoder. Earlier cached results are dropped.
    pub fn begin(&mut self, settings: ExportSettings) -> Result<SessionId> {
        settings.validate()?;
        self.settings = settings;
        self.id = self.ids.alloc();
        self.cache.clear();
        debug!("session: begin {}", self.id);
        Ok(self.id)
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    #[inline]
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    #[inline]
    pub fn cache(&self) -> &SamplerCache<E::Handle> {
        &self.cache
    }

    /// Whether `group` will be densely resampled under this session's settings.
    pub fn needs_baking(&self, group: &ChannelGroup) -> bool {
        bake_reason(group, self.settings.force_sampling).is_some()
    }

    /// Keyframes for `group`, before coordinate remapping.
    pub fn keyframes(&mut self, group: &ChannelGroup) -> Result<Arc<[Keyframe]>> {
        let key = self.key_for(group)?;
        if let Some(hit) = self.cache.keyframes(&key) {
            trace!("session: keyframe cache hit for {}", group.id());
            return Ok(hit);
        }

        let reason = bake_reason(group, self.settings.force_sampling);
        if let Some(reason) = reason {
            debug!(
                "session: baking {} '{}' ({reason:?})",
                group.id(),
                group.data_path()
            );
        }
        let keyframes = extract_keyframes(group, &self.settings, reason.is_some())?;
        self.cache.claim(key, group.data_path());
        Ok(self.cache.insert_keyframes(key, keyframes))
    }

    /// Assembled sampler for `group`. Buffers are encoded once per group and session.
    pub fn sampler(&mut self, group: &ChannelGroup) -> Result<Arc<AnimationSampler<E::Handle>>> {
        let key = self.key_for(group)?;
        if let Some(hit) = self.cache.sampler(&key) {
            trace!("session: sampler cache hit for {}", group.id());
            return Ok(hit);
        }

        let keyframes = self.keyframes(group)?;
        let interpolation = resolve_interpolation(group, self.needs_baking(group));
        let remapped = remap_keyframes(
            &keyframes,
            group.property(),
            &self.remap,
            self.settings.y_up,
        );
        let sampler = assemble_sampler(group.id(), &remapped, interpolation, &mut self.encoder)?;
        Ok(self.cache.insert_sampler(key, sampler))
    }

    /// Cache key for `group`. Group ids must be unique within a session; an id
    /// already used by a different data path is rejected.
    fn key_for(&self, group: &ChannelGroup) -> Result<CacheKey> {
        let key = CacheKey::new(group.id(), self.id);
        match self.cache.owner(&key) {
            Some(owner) if owner != group.data_path() => Err(ExportError::invalid_group(
                group.id(),
                format!(
                    "id already exported for '{owner}' in {}, cannot reuse it for '{}'",
                    self.id,
                    group.data_path()
                ),
            )),
            _ => Ok(key),
        }
    }

    /// End the run and hand the encoder back to the caller.
    pub fn finish(self) -> E {
        debug!("session: finish {} with {} samplers", self.id, self.cache.len());
        self.encoder
    }
}
