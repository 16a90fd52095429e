//! Per-session memoization of extracted keyframes and assembled samplers.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::assemble::AnimationSampler;
use crate::ids::{GroupId, SessionId};
use crate::keyframe::Keyframe;

/// Cache key. Entries from one session are never served to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub group: GroupId,
    pub session: SessionId,
}

impl CacheKey {
    pub fn new(group: GroupId, session: SessionId) -> Self {
        Self { group, session }
    }
}

/// Keyframe and sampler results keyed by (group, session).
///
/// Only successful computations are stored. Each key also records the data path
/// of the group that produced it, so a reused group id can be detected.
#[derive(Debug)]
pub struct SamplerCache<H> {
    owners: HashMap<CacheKey, String>,
    keyframes: HashMap<CacheKey, Arc<[Keyframe]>>,
    samplers: HashMap<CacheKey, Arc<AnimationSampler<H>>>,
}

impl<H> Default for SamplerCache<H> {
    fn default() -> Self {
        Self {
            owners: HashMap::new(),
            keyframes: HashMap::new(),
            samplers: HashMap::new(),
        }
    }
}

impl<H> SamplerCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data path of the group whose results are stored under `key`.
    pub fn owner(&self, key: &CacheKey) -> Option<&str> {
        self.owners.get(key).map(String::as_str)
    }

    /// Record the group that owns `key`; the first owner wins.
    pub fn claim(&mut self, key: CacheKey, data_path: &str) {
        self.owners
            .entry(key)
            .or_insert_with(|| data_path.to_string());
    }

    pub fn keyframes(&self, key: &CacheKey) -> Option<Arc<[Keyframe]>> {
        self.keyframes.get(key).cloned()
    }

    pub fn insert_keyframes(&mut self, key: CacheKey, keyframes: Vec<Keyframe>) -> Arc<[Keyframe]> {
        let shared: Arc<[Keyframe]> = keyframes.into();
        self.keyframes.insert(key, Arc::clone(&shared));
        shared
    }

    pub fn sampler(&self, key: &CacheKey) -> Option<Arc<AnimationSampler<H>>> {
        self.samplers.get(key).cloned()
    }

    pub fn insert_sampler(
        &mut self,
        key: CacheKey,
        sampler: AnimationSampler<H>,
    ) -> Arc<AnimationSampler<H>> {
        let shared = Arc::new(sampler);
        self.samplers.insert(key, Arc::clone(&shared));
        shared
    }

    /// Drop every entry of every session.
    pub fn clear(&mut self) {
        self.owners.clear();
        self.keyframes.clear();
        self.samplers.clear();
    }

    /// Number of cached samplers.
    #[inline]
    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty() && self.keyframes.is_empty() && self.samplers.is_empty()
    }
}
