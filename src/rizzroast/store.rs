use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use super::config::Config;

const STORAGE_SUFFIX: &str = ".json";

fn config_file_path() -> PathBuf {
    data_dir().join("config.yaml")
}

pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "rizzroast", "rizzroast")
        .map(|dirs| dirs.data_dir().to_owned())
        .unwrap_or_else(|| PathBuf::from(".rizzroast"))
}

pub fn load_config() -> Result<Config> {
    info!("Config file: {}", config_file_path().to_string_lossy());
    if !config_file_path().exists() {
        info!("Config file does not exist, creating.");
        store_default_config()?;
    }
    let config_file = File::open(config_file_path())?;
    Ok(serde_yaml::from_reader(config_file)?)
}

pub fn store_default_config() -> Result<()> {
    ensure_dir_created(&config_file_path())?;
    let config_file = File::create(config_file_path())?;
    Ok(serde_yaml::to_writer(config_file, &Config::default())?)
}

/// String key-value persistence, the local storage of the app.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key. Previous content is kept as `<key>.json.bak`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        info!("Favorites dir: {}", dir.to_string_lossy());
        FileStorage { dir }
    }

    /// Percent-encoded, so distinct keys never share a file.
    fn key_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{STORAGE_SUFFIX}", urlencoding::encode(key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read {}", path.to_string_lossy()))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        ensure_dir_created(&path)?;
        store_file_with_backup(&path, value)
            .with_context(|| format!("Cannot write {}", path.to_string_lossy()))
    }
}

/// Replaces `path` only once the new content is fully written.
fn store_file_with_backup(path: &Path, content: &str) -> Result<()> {
    if path.is_file() {
        if fs::read_to_string(path).ok().as_deref() == Some(content) {
            // No need to change anything
            return Ok(());
        }
        let backup_path = with_suffix(path, ".bak");
        debug!("Backing up {}", backup_path.to_string_lossy());
        fs::copy(path, backup_path)?;
    }
    let tmp_path = with_suffix(path, ".tmp");
    if let Err(e) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let orig_filename = path
        .file_name()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    path.with_file_name(format!("{orig_filename}{suffix}"))
}

fn ensure_dir_created(path: &Path) -> Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create {}", &dir.to_string_lossy()))?;
    }
    Ok(())
}

#[cfg(test)]
pub use memory::MemoryStorage;


#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn file_storage_missing_key() {
        let dir = TempDir::new("rizzroast").unwrap();
        let storage = FileStorage::new(dir.path().join("favorites"));
        assert_eq!(storage.get("roastFavorites").unwrap(), None);
    }

    #[test]
    fn file_storage_overwrites_with_backup() {
        let dir = TempDir::new("rizzroast").unwrap();
        let favorites_dir = dir.path().join("favorites");
        let mut storage = FileStorage::new(favorites_dir.clone());

        storage.set("roastFavorites", r#"["A"]"#).unwrap();
        storage.set("roastFavorites", r#"["A","B"]"#).unwrap();

        assert_eq!(
            storage.get("roastFavorites").unwrap().as_deref(),
            Some(r#"["A","B"]"#)
        );
        assert_eq!(
            fs::read_to_string(favorites_dir.join("roastFavorites.json.bak")).unwrap(),
            r#"["A"]"#
        );
    }

    #[test]
    fn failed_write_keeps_previous_file() {
        let dir = TempDir::new("rizzroast").unwrap();
        let favorites_dir = dir.path().join("favorites");
        let mut storage = FileStorage::new(favorites_dir.clone());
        storage.set("roastFavorites", r#"["A"]"#).unwrap();

        fs::create_dir(favorites_dir.join("roastFavorites.json.tmp")).unwrap();
        assert!(storage.set("roastFavorites", r#"["A","B"]"#).is_err());

        let reopened = FileStorage::new(favorites_dir);
        assert_eq!(
            reopened.get("roastFavorites").unwrap().as_deref(),
            Some(r#"["A"]"#)
        );
    }

    #[test]
    fn file_storage_keys_never_collide() {
        let dir = TempDir::new("rizzroast").unwrap();
        let mut storage = FileStorage::new(dir.path().to_owned());
        storage.set("a.b", r#"["dot"]"#).unwrap();
        storage.set("a_b", r#"["underscore"]"#).unwrap();
        assert_eq!(storage.get("a.b").unwrap().as_deref(), Some(r#"["dot"]"#));
        assert_eq!(
            storage.get("a_b").unwrap().as_deref(),
            Some(r#"["underscore"]"#)
        );
    }

    #[test]
    fn file_storage_keys_are_separate_and_sanitized() {
        let dir = TempDir::new("rizzroast").unwrap();
        let mut storage = FileStorage::new(dir.path().to_owned());
        storage.set("pickup/../favorites", "[]").unwrap();
        storage.set("roastFavorites", r#"["x"]"#).unwrap();
        assert!(dir.path().join("pickup%2F..%2Ffavorites.json").is_file());
        assert_eq!(storage.get("pickup/../favorites").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.get("roastFavorites").unwrap().as_deref(), Some(r#"["x"]"#));
    }

    #[test]
    fn memory_storage_failing_writes() {
        let mut storage = MemoryStorage::default();
        storage.set_fail_writes(true);
        assert!(storage.set("k", "v").is_err());
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
