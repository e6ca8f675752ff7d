// src/config/valuation.rs
//! Engine configuration (TOML), hot-reloaded on mtime change.
//!
//! TOML shape:
//! ```toml
//! [defaults]
//! overall = 7.0
//! professional_score = 6.0
//!
//! [server]
//! debug_routes = false
//! ```
//!
//! Lookup order: `$VALUATION_CONFIG_PATH` → `config/valuation.toml` → built-in.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};
use tracing::{info, warn};

use crate::signal::SignalDefaults;

pub const DEFAULT_VALUATION_CONFIG_PATH: &str = "config/valuation.toml";
pub const ENV_VALUATION_CONFIG_PATH: &str = "VALUATION_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub defaults: SignalDefaults,
    pub server: ServerSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Mount `/debug/*` routes.
    pub debug_routes: bool,
}

impl ValuationConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading valuation config from {}", path.display()))?;
        Self::from_toml_str(&data)
            .with_context(|| format!("parsing valuation config {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let mut cfg: ValuationConfig = toml::from_str(data)?;

        // Sanitize numeric defaults
        let reset = cfg.defaults.sanitize();
        if !reset.is_empty() {
            warn!(target: "valuation", fields = ?reset, "invalid defaults replaced with built-in values");
        }
        Ok(cfg)
    }

    /// Resolve the config path from env + fallbacks. `Ok(None)` means no file
    /// exists and the built-in config applies.
    pub fn locate() -> Result<Option<PathBuf>> {
        if let Ok(p) = std::env::var(ENV_VALUATION_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Ok(Some(pb));
            }
            return Err(anyhow!(
                "{ENV_VALUATION_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        let default = PathBuf::from(DEFAULT_VALUATION_CONFIG_PATH);
        Ok(default.exists().then_some(default))
    }

    pub fn load_default() -> Result<Self> {
        match Self::locate()? {
            Some(path) => {
                let cfg = Self::load_from_file(&path)?;
                info!(target: "valuation", path = %path.display(), "valuation config loaded");
                Ok(cfg)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
/// Without a path it always serves the config it was built with.
#[derive(Debug)]
pub struct HotReloadConfig {
    path: Option<PathBuf>,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: ValuationConfig,
    last_modified: Option<SystemTime>,
}

impl HotReloadConfig {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            inner: RwLock::new(State {
                config: ValuationConfig::default(),
                last_modified: None,
            }),
        }
    }

    /// Fixed config, never reloaded.
    pub fn fixed(config: ValuationConfig) -> Self {
        Self {
            path: None,
            inner: RwLock::new(State {
                config,
                last_modified: None,
            }),
        }
    }

    /// Load `path` now and watch it afterwards. A missing or malformed file
    /// is an error here; later reload failures only keep the previous values.
    pub fn load(path: &Path) -> Result<Self> {
        let last_modified = fs::metadata(path).and_then(|m| m.modified()).ok();
        let config = ValuationConfig::load_from_file(path)?;
        info!(target: "valuation", path = %path.display(), "valuation config loaded");
        Ok(Self {
            path: Some(path.to_path_buf()),
            inner: RwLock::new(State {
                config,
                last_modified,
            }),
        })
    }

    /// Env + fallbacks, same lookup and startup errors as
    /// `ValuationConfig::load_default`.
    pub fn from_env() -> Result<Self> {
        match ValuationConfig::locate()? {
            Some(path) => Self::load(&path),
            None => Ok(Self::fixed(ValuationConfig::default())),
        }
    }

    /// Latest config, reloading if the file changed. A failed reload keeps
    /// the previous values.
    pub fn current(&self) -> ValuationConfig {
        let Some(path) = self.path.as_deref() else {
            return self.read_state().config.clone();
        };

        let mtime = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(_) => return self.read_state().config.clone(),
        };

        if self.read_state().last_modified == Some(mtime) {
            return self.read_state().config.clone();
        }

        let mut guard = self.inner.write().expect("config lock poisoned");
        // Double-check in case of races.
        if guard.last_modified != Some(mtime) {
            match ValuationConfig::load_from_file(path) {
                Ok(cfg) => {
                    guard.config = cfg;
                    info!(target: "valuation", path = %path.display(), "valuation config reloaded");
                }
                Err(e) => {
                    warn!(target: "valuation", error = ?e, "valuation config reload failed; keeping previous");
                }
            }
            guard.last_modified = Some(mtime);
        }
        guard.config.clone()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().expect("config lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, thread, time::Duration};

    /// Create a unique temporary directory in std::env::temp_dir().
    fn unique_tmp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("valuation_cfg_test_{}", nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn partial_toml_keeps_builtin_defaults() {
        let cfg = ValuationConfig::from_toml_str("[defaults]\noverall = 8.0\n").unwrap();
        assert_eq!(cfg.defaults.overall, 8.0);
        assert_eq!(cfg.defaults.editing, 6.0);
        assert_eq!(cfg.defaults.content_tone, "neutral");
        assert!(!cfg.server.debug_routes);
    }

    #[test]
    fn negative_defaults_are_sanitized() {
        let cfg = ValuationConfig::from_toml_str(
            "[defaults]\nprofessional_multiplier = -2.0\n[server]\ndebug_routes = true\n",
        )
        .unwrap();
        assert_eq!(cfg.defaults.professional_multiplier, 1.0);
        assert!(cfg.server.debug_routes);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ValuationConfig::from_toml_str("[defaults\noverall = ").is_err());
        assert!(ValuationConfig::load_from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn fixed_config_is_served_as_is() {
        let mut cfg = ValuationConfig::default();
        cfg.server.debug_routes = true;
        let hot = HotReloadConfig::fixed(cfg.clone());
        assert_eq!(hot.current(), cfg);
    }

    #[test]
    fn eager_load_rejects_malformed_file() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("eager.toml");
        fs::write(&path, "[defaults\n").unwrap();
        assert!(HotReloadConfig::load(&path).is_err());

        fs::write(&path, "[defaults]\nediting = 7.5\n").unwrap();
        let hot = HotReloadConfig::load(&path).unwrap();
        assert_eq!(hot.current().defaults.editing, 7.5);

        let _ = fs::remove_dir_all(&tmpdir);
    }

    #[test]
    fn loads_and_hot_reloads() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("valuation.toml");

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "[defaults]\noverall = 8.0\n").unwrap();
            f.sync_all().unwrap();
        }

        let hot = HotReloadConfig::new(Some(&path));
        assert_eq!(hot.current().defaults.overall, 8.0);

        // Ensure different mtime (Windows granularity can be coarse).
        thread::sleep(Duration::from_millis(1100));

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "[defaults]\noverall = 9.0\n").unwrap();
            f.sync_all().unwrap();
        }
        assert_eq!(hot.current().defaults.overall, 9.0);

        thread::sleep(Duration::from_millis(1100));

        // Broken file: previous values survive
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "[defaults\n").unwrap();
            f.sync_all().unwrap();
        }
        assert_eq!(hot.current().defaults.overall, 9.0);

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&tmpdir);
    }
}
