//! Configuration Vault – reads/writes `~/.streamsel/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use streamsel_types::ParamValue;

/// Persisted user configuration stored in `~/.streamsel/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Simulated device preset used when no catalog file is configured
    /// (`d435`, `d435i`, `d455`, `t265`).
    #[serde(default = "default_device")]
    pub device: String,

    /// Device description file (TOML) to negotiate against instead of a
    /// preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// Startup values for dynamic parameters, e.g. `enable_infra1 = false`
    /// or `"stereo_module.width" = 848`.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

fn default_device() -> String {
    "d435i".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: default_device(),
            catalog_path: None,
            parameters: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parameter overrides in the form the parameter server consumes.
    pub fn overrides(&self) -> HashMap<String, ParamValue> {
        self.parameters
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// Return the path to `~/.streamsel/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".streamsel").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `STREAMSEL_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `STREAMSEL_DEVICE` | `device` |
/// | `STREAMSEL_CATALOG` | `catalog_path` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("STREAMSEL_DEVICE") {
        cfg.device = v;
    }
    if let Ok(v) = std::env::var("STREAMSEL_CATALOG")
        && !v.is_empty()
    {
        cfg.catalog_path = Some(PathBuf::from(v));
    }
}

/// Save the config to disk, creating `~/.streamsel/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
