//! History file persistence.
//!
//! The whole store is one JSON document. Every save rewrites it in full
//! through a temp file in the same directory, renamed over the original.

use crate::{Error, Result, Store};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Indentation of the history document
const INDENT: &[u8] = b"    ";

impl Store {
    /// Load the store from a history file
    ///
    /// Returns an empty store if the file doesn't exist.
    /// A file that exists but is not a valid store is `Error::CorruptData`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No history file at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let store: Store =
            serde_json::from_str(&contents).map_err(|e| Error::corrupt(path, e))?;

        for (user, records) in store.users() {
            if let Some(bad) = records.iter().find(|r| !(r.bmi.is_finite() && r.bmi > 0.0)) {
                return Err(Error::corrupt(
                    path,
                    format!("user {:?} has a non-positive bmi {}", user, bad.bmi),
                ));
            }
        }

        tracing::info!(
            "Loaded {} records for {} users from {:?}",
            store.record_count(),
            store.user_count(),
            path
        );
        Ok(store)
    }

    /// Render the store as the history document
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only emits valid UTF-8
        String::from_utf8(buf).map_err(|e| Error::Io(std::io::Error::other(e)))
    }

    /// Save the store to a history file, replacing its contents
    ///
    /// Atomically writes the store by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let contents = self.to_json()?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!(
            "Saved {} records for {} users to {:?}",
            self.record_count(),
            self.user_count(),
            path
        );
        Ok(())
    }
}
