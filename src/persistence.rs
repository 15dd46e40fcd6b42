//! Best-score persistence
//!
//! The core treats storage as an injected port: `load` falls back to 0
//! on absence or corruption, `save` is best-effort. Neither can stall a
//! tick or surface an error to gameplay.

use log::{info, warn};

/// Port for the single persisted best-score scalar.
pub trait ScoreStore {
    /// Best score from a previous session; 0 on absence or failure.
    fn load(&mut self) -> u64;
    /// Persist a new best. Failures are logged and swallowed.
    fn save(&mut self, best: u64);
}

/// In-process store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u64) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> u64 {
        self.best
    }

    fn save(&mut self, best: u64) {
        self.best = best;
    }
}

/// File-backed store: a single integer under the user config dir.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Store at `$XDG_CONFIG_HOME/grapple-run/best_score` (HOME fallback).
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn default_path() -> std::path::PathBuf {
        use std::path::PathBuf;

        let base = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
            _ => std::env::var("HOME")
                .map(|h| PathBuf::from(h).join(".config"))
                .unwrap_or_else(|_| PathBuf::from(".")),
        };
        base.join("grapple-run").join("best_score")
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn load(&mut self) -> u64 {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => match raw.trim().parse() {
                Ok(best) => {
                    info!("Loaded best score {}", best);
                    best
                }
                Err(_) => {
                    warn!("Best score file is corrupt, starting fresh");
                    0
                }
            },
            Err(_) => {
                info!("No best score found, starting fresh");
                0
            }
        }
    }

    fn save(&mut self, best: u64) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Could not create config dir: {}", e);
                return;
            }
        }
        match std::fs::write(&self.path, best.to_string()) {
            Ok(()) => info!("Best score saved ({})", best),
            Err(e) => warn!("Could not save best score: {}", e),
        }
    }
}

/// LocalStorage-backed store for browser builds.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    const STORAGE_KEY: &'static str = "grapple_run_best";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn load(&mut self) -> u64 {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = raw.parse() {
                    info!("Loaded best score {}", best);
                    return best;
                }
            }
        }
        info!("No best score found, starting fresh");
        0
    }

    fn save(&mut self, best: u64) {
        match Self::storage() {
            Some(storage) => {
                let _ = storage.set_item(Self::STORAGE_KEY, &best.to_string());
            }
            None => warn!("LocalStorage unavailable, best score not saved"),
        }
    }
}
