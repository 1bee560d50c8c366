use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{MsglocError, Result};

const LOCALES_DIR: &str = "_locales";
const CATALOG_FILE: &str = "messages.json";

/// One entry of a `messages.json` catalog.
///
/// Only `message` is translated; every other field (`description`, `placeholders`, ...)
/// is carried over as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
            extra: Map::new(),
        }
    }
}

/// A single locale's message catalog at `<base>/_locales/<locale>/messages.json`
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    path: PathBuf,
    base_dir: PathBuf,
    locale: String,
    messages: IndexMap<String, Message>,
}

impl Catalog {
    /// Read and validate a catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (base_dir, locale) = split_catalog_path(path)?;

        let content = std::fs::read(path)?;
        let messages: IndexMap<String, Message> = serde_json::from_slice(&content).map_err(|e| {
            MsglocError::Format(format!("Invalid catalog {}: {}", path.display(), e))
        })?;

        debug!("Loaded {} messages for locale {} from {}", messages.len(), locale, path.display());

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            locale,
            messages,
        })
    }

    /// Build an in-memory catalog; the path must follow the catalog layout
    pub fn from_messages<P: AsRef<Path>>(path: P, messages: IndexMap<String, Message>) -> Result<Self> {
        let path = path.as_ref();
        let (base_dir, locale) = split_catalog_path(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            locale,
            messages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn messages(&self) -> &IndexMap<String, Message> {
        &self.messages
    }

    pub fn get(&self, key: &str) -> Option<&Message> {
        self.messages.get(key)
    }

    /// The `message` text for a key
    pub fn text(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|m| m.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Replace the text of an existing key, returning false if the key is absent
    pub fn set_text(&mut self, key: &str, text: String) -> bool {
        match self.messages.get_mut(key) {
            Some(entry) => {
                entry.message = text;
                true
            }
            None => false,
        }
    }

    /// Deep copy of this catalog re-homed under another locale directory
    pub fn with_locale(&self, locale: &str) -> Self {
        Self {
            path: catalog_path(&self.base_dir, locale),
            base_dir: self.base_dir.clone(),
            locale: locale.to_string(),
            messages: self.messages.clone(),
        }
    }

    /// Two-space indented JSON with non-ASCII kept literal and a trailing newline
    pub fn to_json_string(&self) -> Result<String> {
        let mut content = serde_json::to_string_pretty(&self.messages)?;
        content.push('\n');
        Ok(content)
    }

    /// Write the catalog to its path, creating parent directories as needed.
    ///
    /// Content goes to a sibling temp file first and is renamed into place,
    /// so readers never observe a partially written catalog.
    pub fn write(&self) -> Result<()> {
        let content = self.to_json_string()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        if let Err(e) = std::fs::write(&temp_path, content)
            .and_then(|()| std::fs::rename(&temp_path, &self.path))
        {
            let _ = std::fs::remove_file(&temp_path);
            return Err(MsglocError::Io(e));
        }

        info!("Wrote {} messages for locale {} to {}", self.messages.len(), self.locale, self.path.display());
        Ok(())
    }
}

/// Locale names compare ASCII case-insensitively: `zh_CN` and `zh_cn` are one locale
pub fn same_locale(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn locale_key(locale: &str) -> String {
    locale.to_ascii_lowercase()
}

/// `<base>/_locales/<locale>/messages.json`
pub fn catalog_path(base_dir: &Path, locale: &str) -> PathBuf {
    base_dir.join(LOCALES_DIR).join(locale).join(CATALOG_FILE)
}

/// Split a catalog path into its base directory and locale
fn split_catalog_path(path: &Path) -> Result<(PathBuf, String)> {
    let invalid = || {
        MsglocError::Format(format!(
            "{} does not match <base>/{}/<locale>/{}",
            path.display(),
            LOCALES_DIR,
            CATALOG_FILE
        ))
    };

    if path.file_name().and_then(|n| n.to_str()) != Some(CATALOG_FILE) {
        return Err(invalid());
    }
    let locale_dir = path.parent().ok_or_else(invalid)?;
    let locale = locale_dir
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|l| !l.is_empty())
        .ok_or_else(invalid)?;
    let locales_dir = locale_dir.parent().ok_or_else(invalid)?;
    if locales_dir.file_name().and_then(|n| n.to_str()) != Some(LOCALES_DIR) {
        return Err(invalid());
    }
    let base_dir = locales_dir.parent().unwrap_or_else(|| Path::new(""));

    Ok((base_dir.to_path_buf(), locale.to_string()))
}

/// Catalogs translated in an earlier run, keyed by locale.
///
/// Read-only during translation; any key found here is reused verbatim.
/// Locales match the same way as [`same_locale`].
#[derive(Debug, Clone, Default)]
pub struct PreTranslatedIndex {
    catalogs: HashMap<String, Catalog>,
}

impl PreTranslatedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every given catalog; a later file for the same locale replaces an earlier one
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut index = Self::new();
        for path in paths {
            let catalog = Catalog::load(path)?;
            info!("Pre-translated catalog for {}: {} messages", catalog.locale(), catalog.len());
            index.insert(catalog);
        }
        Ok(index)
    }

    pub fn insert(&mut self, catalog: Catalog) -> Option<Catalog> {
        self.catalogs.insert(locale_key(catalog.locale()), catalog)
    }

    pub fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs.get(&locale_key(locale)).and_then(|c| c.text(key))
    }

    /// Known locales, sorted
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.catalogs.values().map(|c| c.locale().to_string()).collect();
        locales.sort();
        locales
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
