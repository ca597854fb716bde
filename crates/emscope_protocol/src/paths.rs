//! Filesystem path resolution for emscope state.

use std::path::PathBuf;
use std::sync::Once;

static CREATE_DIR_WARNED: Once = Once::new();

/// Resolve the emscope home directory.
///
/// Priority:
/// 1) EMSCOPE_HOME
/// 2) HOME/USERPROFILE
/// 3) ./.emscope
pub fn emscope_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("EMSCOPE_HOME") {
        return PathBuf::from(override_path);
    }
    if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        return PathBuf::from(home).join(".emscope");
    }
    PathBuf::from(".").join(".emscope")
}

fn ensure_dir(dir: &PathBuf) {
    if let Err(err) = std::fs::create_dir_all(dir) {
        CREATE_DIR_WARNED.call_once(|| {
            eprintln!(
                "Warning: failed to create emscope directory {}: {}. Set EMSCOPE_HOME to a writable location.",
                dir.display(),
                err
            );
        });
    }
}

/// Default catalog cache path: ~/.emscope/cache.sqlite3
pub fn default_cache_db_path() -> PathBuf {
    let home = emscope_home();
    ensure_dir(&home);
    home.join("cache.sqlite3")
}

/// Configuration directory: ~/.emscope/conf
pub fn conf_dir() -> PathBuf {
    let conf = emscope_home().join("conf");
    ensure_dir(&conf);
    conf
}

/// OEM endpoint definitions: ~/.emscope/conf/endpoints.yaml
pub fn default_endpoints_path() -> PathBuf {
    conf_dir().join("endpoints.yaml")
}

/// Per-site selected targets: ~/.emscope/conf/targets.yaml
pub fn default_targets_config_path() -> PathBuf {
    conf_dir().join("targets.yaml")
}

/// Metric definitions per target type: ~/.emscope/conf/metrics.yaml
pub fn default_metrics_config_path() -> PathBuf {
    conf_dir().join("metrics.yaml")
}

/// Default logs directory: ~/.emscope/logs
pub fn default_logs_dir() -> PathBuf {
    let logs = emscope_home().join("logs");
    ensure_dir(&logs);
    logs
}
