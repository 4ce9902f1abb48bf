//! TOML configuration for sound lookup and playback.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use crate::backend::MAX_TIMEOUT;

#[derive(Debug, Clone, Deserialize)]
pub struct SoundConfig {
    /// Directory holding one subdirectory per category.
    pub base_dir: Option<PathBuf>,
    /// Recognized audio file extensions, without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Players tried in order on Linux and other Unix hosts.
    #[serde(default = "default_linux_players")]
    pub linux_players: Vec<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            timeout_secs: default_timeout_secs(),
            linux_players: default_linux_players(),
        }
    }
}

impl PlaybackConfig {
    /// Configured timeout, clamped to `MAX_TIMEOUT`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs).min(MAX_TIMEOUT)
    }
}

impl SoundConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        toml::from_str(&content).map_err(|e| format!("parse {}: {e}", path.display()))
    }

    /// Load config with fallback chain:
    /// 1. explicit path (`--config`)
    /// 2. $SOUND_DISPATCH_CONFIG env var
    /// 3. {root}/sounds.toml
    /// 4. Built-in defaults
    pub fn find_and_load(explicit: Option<&Path>, root: &Path) -> Self {
        let candidates: Vec<PathBuf> = vec![
            explicit.map(Path::to_path_buf),
            std::env::var("SOUND_DISPATCH_CONFIG").ok().map(PathBuf::from),
            Some(root.join("sounds.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in &candidates {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        info!("Loaded sound config from {}", path.display());
                        return config;
                    }
                    Err(e) => warn!("Failed to load {}: {e}", path.display()),
                }
            } else if Some(path.as_path()) == explicit {
                warn!("Config file {} does not exist", path.display());
            }
        }

        info!("Using built-in default sound config");
        Self::builtin_default()
    }

    fn builtin_default() -> Self {
        SoundConfig {
            base_dir: None,
            extensions: default_extensions(),
            playback: PlaybackConfig::default(),
        }
    }

    /// Base directory from config, or `{root}/audio`.
    pub fn resolve_base_dir(&self, root: &Path) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| root.join("audio"))
    }
}

fn default_extensions() -> Vec<String> { vec!["wav".into()] }
fn default_timeout_secs() -> u64 { 10 }
fn default_linux_players() -> Vec<String> {
    vec!["paplay".into(), "aplay".into(), "play".into()]
}

/// Walk up from the binary's location to find the sound root (has audio/).
pub fn find_sound_root() -> PathBuf {
    if let Ok(root) = std::env::var("SOUND_DISPATCH_ROOT") {
        return PathBuf::from(root);
    }

    if let Ok(exe) = std::env::current_exe() {
        let mut dir = exe.parent().map(|p| p.to_path_buf());
        while let Some(d) = dir {
            if d.join("audio").is_dir() {
                return d;
            }
            dir = d.parent().map(|p| p.to_path_buf());
        }
    }

    PathBuf::from(".")
}
