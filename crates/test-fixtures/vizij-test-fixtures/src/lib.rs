use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "channel-groups")]
    channel_groups: HashMap<String, ChannelGroupEntry>,
    #[serde(default)]
    settings: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChannelGroupEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        expect: Option<String>,
    },
}

impl ChannelGroupEntry {
    fn as_path(&self) -> &str {
        match self {
            ChannelGroupEntry::Path(path) => path,
            ChannelGroupEntry::Detailed { path, .. } => path,
        }
    }

    fn expect(&self) -> Option<&str> {
        match self {
            ChannelGroupEntry::Path(_) => None,
            ChannelGroupEntry::Detailed { expect, .. } => expect.as_deref(),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Authoring-tool channel groups (F-curve layout).
pub mod channel_groups {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.channel_groups.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.channel_groups, "channel group", name)?;
        read_to_string(entry.as_path())
    }

    /// Expected sampler interpolation recorded next to the fixture, if any.
    pub fn expected_interpolation(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.channel_groups, "channel group", name)?;
        Ok(entry.expect().map(str::to_string))
    }
}

/// Export settings documents.
pub mod settings {
    use super::*;

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.settings, "settings", name)?;
        super::load_json(rel)
    }
}
