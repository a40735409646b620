//! File-backed append-only entity logs for the Godseed simulation.
//!
//! Persistence is the source of truth for resume: every actor and the
//! reserved `world` entity own one ordered log of tagged records, stored
//! as one JSON line per record under the data directory. The store only
//! ever appends; existing records are never mutated or deleted.
//!
//! Both the engine and the oracle card tooling consume this one capability
//! surface, so file-path construction lives here and nowhere else.
//!
//! # Failure policy
//!
//! - A missing or unreadable log file means "no prior history": the entity
//!   log opens empty, with a warning, and nothing is fabricated beyond
//!   absence.
//! - A corrupt individual line is skipped with a warning; the surrounding
//!   records still load.
//! - A failed append is surfaced as an error, never swallowed -- resume
//!   correctness depends on every accepted write being durable.

mod entity_log;
mod error;

pub use entity_log::EntityLog;
pub use error::StoreError;

use std::fs;
use std::path::{Path, PathBuf};

/// The reserved entity name for the world's own log.
pub const WORLD_ENTITY: &str = "world";

/// Filename prefix for entity log files.
const FILE_PREFIX: &str = "memory_";

/// Filename extension for entity log files (JSON lines).
const FILE_EXT: &str = "jsonl";

/// A directory of per-entity append-only logs.
#[derive(Debug, Clone)]
pub struct LogStore {
    data_dir: PathBuf,
}

impl LogStore {
    /// Open (creating if necessary) a log store rooted at `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::CreateDir {
            path: data_dir.clone(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    /// The directory this store reads and writes under.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Open the log for one named entity, loading its existing records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if the name sanitizes to an
    /// empty filename. Read problems are not errors: an unreadable file
    /// yields an empty log and a warning.
    pub fn entity_log(&self, name: &str) -> Result<EntityLog, StoreError> {
        let path = self.log_path(name)?;
        Ok(EntityLog::load(name, path))
    }

    /// Open the reserved world log.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::InvalidName`] (cannot happen for the
    /// fixed world name, but the signature stays uniform).
    pub fn world_log(&self) -> Result<EntityLog, StoreError> {
        self.entity_log(WORLD_ENTITY)
    }

    /// Enumerate the names of all entities with an existing log, excluding
    /// the reserved world entity, sorted for stable iteration.
    ///
    /// Only log names are touched here; record contents are not read
    /// until the caller opens each log for reconstruction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Discover`] if the data directory cannot be
    /// listed.
    pub fn entity_names(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.data_dir).map_err(|source| StoreError::Discover {
            path: self.data_dir.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Discover {
                path: self.data_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(name) = stem.strip_prefix(FILE_PREFIX) else {
                continue;
            };
            if name.is_empty() || name == WORLD_ENTITY {
                continue;
            }
            names.push(name.to_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Compute the log file path for an entity name.
    fn log_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let safe = sanitize(name);
        if safe.is_empty() {
            return Err(StoreError::InvalidName(name.to_owned()));
        }
        Ok(self.data_dir.join(format!("{FILE_PREFIX}{safe}.{FILE_EXT}")))
    }
}

/// Reduce an entity name to filesystem-safe characters.
///
/// Keeps alphanumerics, spaces, dashes, and underscores; everything else
/// is dropped. Surrounding whitespace is trimmed. The result is also the
/// name recovered at discovery time, so spawn names should already be
/// filesystem-safe.
fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use godseed_types::LogPayload;

    use super::*;

    #[test]
    fn store_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("data");
        let store = LogStore::open(&nested).unwrap();
        assert!(store.data_dir().is_dir());
    }

    #[test]
    fn entity_names_excludes_world_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();

        for name in ["Korr the Smith", "Eyla the Herbalist", WORLD_ENTITY] {
            let mut log = store.entity_log(name).unwrap();
            log.append(LogPayload::Identity {
                archetype: String::from("keeper"),
            })
            .unwrap();
        }

        let names = store.entity_names().unwrap();
        assert_eq!(names, vec!["Eyla the Herbalist", "Korr the Smith"]);
    }

    #[test]
    fn discovery_sees_logs_without_reading_them() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();

        // A log whose content is garbage is still discoverable by name.
        std::fs::write(dir.path().join("memory_Fractal-1234.jsonl"), "not json\n").unwrap();
        let names = store.entity_names().unwrap();
        assert_eq!(names, vec!["Fractal-1234"]);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.entity_log("///"),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn sanitize_keeps_spaces_and_dashes() {
        assert_eq!(sanitize("Eyla the Herbalist"), "Eyla the Herbalist");
        assert_eq!(sanitize("Fractal-1234"), "Fractal-1234");
        assert_eq!(sanitize("  a/b  "), "ab");
    }
}
