//! One entity's append-only log.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use godseed_types::{LogKind, LogPayload, LogRecord};
use tracing::warn;

use crate::StoreError;

/// An open handle on one entity's log: the in-memory record history plus
/// the file path appends go to.
///
/// Loading reads the whole file once; appends go to both the in-memory
/// vector and the file, so queries after an append see the new record
/// without re-reading disk.
#[derive(Debug)]
pub struct EntityLog {
    name: String,
    path: PathBuf,
    records: Vec<LogRecord>,
}

impl EntityLog {
    /// Load an entity log from its file.
    ///
    /// A missing file is a fresh entity. An unreadable file or a corrupt
    /// line is logged and treated as absent history -- never fatal, and
    /// nothing beyond absence is fabricated.
    pub(crate) fn load(name: &str, path: PathBuf) -> Self {
        let records = match std::fs::read_to_string(&path) {
            Ok(contents) => parse_lines(name, &contents),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                warn!(entity = name, error = %source, "log unreadable, treating as empty");
                Vec::new()
            }
        };
        Self {
            name: name.to_owned(),
            path,
            records,
        }
    }

    /// The entity name this log belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Append one record, stamped with the current wall-clock time.
    ///
    /// The record is durable before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] or [`StoreError::Write`] if the
    /// record cannot be encoded or written. Callers must treat this as
    /// fatal for the operation that produced the record: an unpersisted
    /// entry would silently falsify history on the next resume.
    pub fn append(&mut self, payload: LogPayload) -> Result<(), StoreError> {
        let record = LogRecord::now(payload);
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StoreError::Write {
                entity: self.name.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .map_err(|source| StoreError::Write {
                entity: self.name.clone(),
                source,
            })?;

        self.records.push(record);
        Ok(())
    }

    /// The most recent value a projection extracts from any record,
    /// scanning newest first.
    pub fn latest<T>(&self, pick: impl Fn(&LogPayload) -> Option<T>) -> Option<T> {
        self.records.iter().rev().find_map(|r| pick(&r.payload))
    }

    /// Like [`latest`](Self::latest), with a caller-supplied default when
    /// no record matches.
    pub fn latest_or<T>(&self, pick: impl Fn(&LogPayload) -> Option<T>, default: T) -> T {
        self.latest(pick).unwrap_or(default)
    }

    /// The `limit` most recent records of one kind, newest first.
    pub fn recent(&self, kind: LogKind, limit: usize) -> Vec<&LogRecord> {
        self.records
            .iter()
            .rev()
            .filter(|r| r.payload.kind() == kind)
            .take(limit)
            .collect()
    }
}

/// Parse one record per line, skipping lines that fail to parse.
fn parse_lines(name: &str, contents: &str) -> Vec<LogRecord> {
    let mut records = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LogRecord>(line) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(
                    entity = name,
                    line = idx.saturating_add(1),
                    %error,
                    "skipping corrupt log line"
                );
            }
        }
    }
    records
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use godseed_types::WorldRules;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::LogStore;

    fn store() -> (tempfile::TempDir, LogStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn append_then_reopen_round_trips() {
        let (_dir, store) = store();

        let mut log = store.entity_log("Eyla the Herbalist").unwrap();
        log.append(LogPayload::Identity {
            archetype: String::from("keeper"),
        })
        .unwrap();
        log.append(LogPayload::Action {
            tick: 1,
            action: String::from("remembers things for other people"),
        })
        .unwrap();

        let reopened = store.entity_log("Eyla the Herbalist").unwrap();
        assert_eq!(reopened.records().len(), 2);
        assert_eq!(
            reopened.latest(|p| match p {
                LogPayload::Identity { archetype } => Some(archetype.clone()),
                _ => None,
            }),
            Some(String::from("keeper"))
        );
    }

    #[test]
    fn latest_or_uses_default_when_absent() {
        let (_dir, store) = store();
        let log = store.entity_log("fresh").unwrap();
        let awakened = log.latest_or(
            |p| match p {
                LogPayload::Awakening { awakened } => Some(*awakened),
                _ => None,
            },
            false,
        );
        assert!(!awakened);
    }

    #[test]
    fn latest_scans_newest_first() {
        let (_dir, store) = store();
        let mut log = store.world_log().unwrap();
        for tick in 1..=3 {
            log.append(LogPayload::Tick {
                tick,
                rules: WorldRules::default(),
                entity_count: 3,
            })
            .unwrap();
        }
        let tick = log.latest(|p| match p {
            LogPayload::Tick { tick, .. } => Some(*tick),
            _ => None,
        });
        assert_eq!(tick, Some(3));
    }

    #[test]
    fn recent_filters_by_kind_newest_first() {
        let (_dir, store) = store();
        let mut log = store.entity_log("Korr the Smith").unwrap();
        log.append(LogPayload::Identity {
            archetype: String::from("trickster"),
        })
        .unwrap();
        for tick in 1..=5 {
            log.append(LogPayload::Action {
                tick,
                action: format!("action {tick}"),
            })
            .unwrap();
        }

        let recent = log.recent(godseed_types::LogKind::Action, 3);
        let ticks: Vec<u64> = recent
            .iter()
            .map(|r| match &r.payload {
                LogPayload::Action { tick, .. } => *tick,
                _ => 0,
            })
            .collect();
        assert_eq!(ticks, vec![5, 4, 3]);
    }

    #[test]
    fn corrupt_lines_are_skipped_not_fatal() {
        let (dir, store) = store();
        let mut log = store.entity_log("glitched").unwrap();
        log.append(LogPayload::Awakening { awakened: true }).unwrap();

        // Damage the file in place, then add another good record by hand.
        let path = dir.path().join("memory_glitched.jsonl");
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{ this is not json\n");
        std::fs::write(&path, contents).unwrap();

        let reopened = store.entity_log("glitched").unwrap();
        assert_eq!(reopened.records().len(), 1);
        assert_eq!(
            reopened.latest(|p| match p {
                LogPayload::Awakening { awakened } => Some(*awakened),
                _ => None,
            }),
            Some(true)
        );
    }

    #[test]
    fn write_failure_is_surfaced_not_swallowed() {
        let (dir, store) = store();
        // A directory squatting on the log path makes every append fail.
        std::fs::create_dir(dir.path().join("memory_blocked.jsonl")).unwrap();

        let mut log = store.entity_log("blocked").unwrap();
        let result = log.append(LogPayload::Awakening { awakened: true });
        assert!(matches!(result, Err(StoreError::Write { .. })));
        assert!(log.records().is_empty());
    }

    #[test]
    fn world_tick_snapshot_preserves_rules() {
        let (_dir, store) = store();
        let mut log = store.world_log().unwrap();
        let mut rules = WorldRules::default();
        rules.gravity = dec!(3.2);
        rules.magic_enabled = false;
        log.append(LogPayload::Tick {
            tick: 9,
            rules: rules.clone(),
            entity_count: 4,
        })
        .unwrap();

        let reopened = store.world_log().unwrap();
        let persisted = reopened.latest(|p| match p {
            LogPayload::Tick { rules, .. } => Some(rules.clone()),
            _ => None,
        });
        assert_eq!(persisted, Some(rules));
    }
}
