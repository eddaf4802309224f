use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::content::PostRepository;
use crate::db::LeadDb;
use crate::store::RecordStore;
use crate::types::Config;

pub const CONFIG_ENV: &str = "LEADSITE_CONFIG";
const BIND_ADDR_ENV: &str = "LEADSITE_BIND_ADDR";
const DATABASE_PATH_ENV: &str = "LEADSITE_DATABASE_PATH";
const CONTENT_DIR_ENV: &str = "LEADSITE_CONTENT_DIR";

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecordStore>,
    pub posts: PostRepository,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let posts = PostRepository::new(config.content_dir.clone());
        Self {
            config: Arc::new(config),
            store,
            posts,
        }
    }
}

/// Get the leadsite state directory (~/.leadsite)
pub fn get_state_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".leadsite"))
}

/// Resolve the config file: `$LEADSITE_CONFIG`, else `~/.leadsite/config.json`.
pub fn config_path() -> Result<PathBuf, String> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(get_state_dir()?.join("config.json"))
}

/// Load configuration from disk and apply environment overrides.
pub fn load_config() -> Result<Config, String> {
    let path = config_path()?;
    let mut config = load_config_from(&path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Parse a config file. A missing file yields defaults.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, String> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Overlay `LEADSITE_*` variables onto a loaded config. Blank values are ignored.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(addr) = get(BIND_ADDR_ENV) {
        config.bind_addr = addr;
    }
    if let Some(path) = get(DATABASE_PATH_ENV) {
        config.database_path = Some(PathBuf::from(path));
    }
    if let Some(dir) = get(CONTENT_DIR_ENV) {
        config.content_dir = PathBuf::from(dir);
    }
}

/// Database location from config, else `~/.leadsite/leadsite.db`.
pub fn database_path(config: &Config) -> Result<PathBuf, String> {
    match &config.database_path {
        Some(path) => Ok(path.clone()),
        None => LeadDb::default_path().map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_config_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_config_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse config"), "{}", err);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LEADSITE_BIND_ADDR", "0.0.0.0:9000"),
            ("LEADSITE_DATABASE_PATH", "/tmp/leads.db"),
            ("LEADSITE_CONTENT_DIR", "  "),
        ]);
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(database_path(&config).unwrap(), PathBuf::from("/tmp/leads.db"));
        assert_eq!(config.content_dir, PathBuf::from("content/blog"));
    }

    #[test]
    fn test_default_database_path_is_under_state_dir() {
        if dirs::home_dir().is_none() {
            return;
        }
        let path = database_path(&Config::default()).unwrap();
        assert_eq!(path, get_state_dir().unwrap().join("leadsite.db"));
    }
}
