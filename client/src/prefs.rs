// Small persisted key/value store for per-user state: the selected
// language, the auth token and the saved list views. Stored as one JSON
// object on disk; an in-memory store is used when no path is configured.
use crate::error::ClientError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const LANGUAGE_KEY: &str = "selectedLanguage";
pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "authUser";

#[derive(Debug, Default)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Preferences {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), entries = values.len(), "Preferences loaded");
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), ClientError> {
        self.values.insert(key.to_string(), value.into());
        self.persist()
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<String>, ClientError> {
        let old = self.values.remove(key);
        if old.is_some() {
            self.persist()?;
        }
        Ok(old)
    }

    /// Keys starting with `prefix`, in key order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .keys()
            .filter(move |k| k.starts_with(prefix))
            .map(String::as_str)
    }

    fn persist(&self) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}
