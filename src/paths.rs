use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Overrides the data directory (useful for portable installs and tests).
pub const DATA_DIR_ENV: &str = "TOWER_STATS_HOME";

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the data directory: `$TOWER_STATS_HOME`, else
/// `<local data dir>/tower-stats/`, else the executable directory.
pub fn get_data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(default_data_dir)
}

#[cfg(not(test))]
fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("tower-stats"))
        .unwrap_or_else(|| get_exe_dir().clone())
}

/// Unit tests never read or write the user's data directory.
#[cfg(test)]
fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("tower-stats-test-{}", std::process::id()))
}

/// Returns the logs directory: `<data_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_data_dir().join("logs")
}

/// Returns the config file: `<exe_dir>/config.json` if present, else
/// `<data_dir>/config.json`.
pub fn get_config_path() -> PathBuf {
    let beside_exe = get_exe_dir().join("config.json");
    if beside_exe.exists() {
        beside_exe
    } else {
        get_data_dir().join("config.json")
    }
}

/// Resolves a configured file name against the data directory.
/// Absolute paths are returned unchanged.
pub fn resolve_data_path(name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        get_data_dir().join(path)
    }
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_data_dir())?;
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}
