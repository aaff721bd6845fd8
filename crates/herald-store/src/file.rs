use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use herald_types::LogRecord;
use tracing::{debug, info, warn};

use crate::codec::{decode_line, encode_line};
use crate::{LogStore, StoreError};

/// Flat-file [`LogStore`]: one encoded record per line at a fixed path.
///
/// The file is created by the first append. All operations take the same
/// lock, so appends never interleave and a clear never races a read within
/// this process.
pub struct FileLogStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Notification log at {}", path.display());
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The lock protects no data, so a poisoned guard is still usable.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unavailable(&self, source: io::Error) -> StoreError {
        StoreError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }

    fn not_found_or_unavailable(&self, source: io::Error) -> StoreError {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: self.path.clone(),
            }
        } else {
            self.unavailable(source)
        }
    }
}

impl LogStore for FileLogStore {
    fn append(&self, record: &LogRecord) -> Result<(), StoreError> {
        let _guard = self.guard();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;

        let mut line = encode_line(record);
        line.push('\n');
        file.write_all(line.as_bytes())
            .map_err(|e| self.unavailable(e))?;

        debug!(id = %record.id, user_id = record.user_id, "Appended log record");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<LogRecord>, StoreError> {
        let _guard = self.guard();

        let file = File::open(&self.path).map_err(|e| self.not_found_or_unavailable(e))?;

        let mut records = Vec::new();
        for (index, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let mut raw = raw.map_err(|e| self.unavailable(e))?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            // Undecodable bytes only spoil their own line.
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Skipping log line {}: {}", index + 1, e);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match decode_line(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping log line {}: {}", index + 1, e),
            }
        }

        // Newest first; among equal timestamps the later line wins.
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(records)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.guard();

        fs::remove_file(&self.path).map_err(|e| self.not_found_or_unavailable(e))?;
        info!("Cleared notification log at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use herald_types::{Category, Channel};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileLogStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLogStore::new(dir.path().join("logs.txt"));
        (dir, store)
    }

    fn record_at(id: &str, offset_secs: i64) -> LogRecord {
        LogRecord {
            id: id.into(),
            user_id: 1,
            message: "test test".into(),
            category: Category::Sports,
            notification_type: Channel::Sms,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn save_read_delete() {
        let (_dir, store) = store();
        let record = LogRecord::new(1, "test test", Category::Sports, Channel::Sms);

        store.append(&record).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![record]);

        store.clear().unwrap();
        assert!(matches!(store.read_all(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn read_before_first_append_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.read_all(), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.clear(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn append_recreates_after_clear() {
        let (_dir, store) = store();
        store.append(&record_at("a", 0)).unwrap();
        store.clear().unwrap();
        store.append(&record_at("b", 1)).unwrap();

        let ids: Vec<_> = store.read_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["b"]);
    }

    #[test]
    fn returns_newest_first() {
        let (_dir, store) = store();
        store.append(&record_at("t1", 10)).unwrap();
        store.append(&record_at("t2", 20)).unwrap();
        store.append(&record_at("t3", 30)).unwrap();

        let ids: Vec<_> = store.read_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["t3", "t2", "t1"]);
    }

    #[test]
    fn equal_timestamps_list_latest_append_first() {
        let (_dir, store) = store();
        store.append(&record_at("first", 5)).unwrap();
        store.append(&record_at("second", 5)).unwrap();

        let ids: Vec<_> = store.read_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["second", "first"]);
    }

    #[test]
    fn skips_malformed_lines() {
        let (_dir, store) = store();
        store.append(&record_at("good", 0)).unwrap();

        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "Timestamp 2024-01-01T00:00:00Z|Category: Sports").unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            "Timestamp: not-a-time|Category: Sports|Notification Type: SMS|Message: x|ID: bad|UserID: 1"
        )
        .unwrap();

        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "good");
    }

    #[test]
    fn skips_lines_with_invalid_utf8() {
        let (_dir, store) = store();
        store.append(&record_at("good", 0)).unwrap();

        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        file.write_all(b"Timestamp: 2024-01-01T00:00:00Z|Message: \xff\xfe\n").unwrap();
        store.append(&record_at("after", 1)).unwrap();

        let ids: Vec<_> = store.read_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["after", "good"]);
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let (_dir, store) = store();
        let line = format!("{}\r\n", encode_line(&record_at("windows", 0)));
        fs::write(store.path(), line).unwrap();

        let records = store.read_all().unwrap();
        assert_eq!(records, vec![record_at("windows", 0)]);
    }

    #[test]
    fn concurrent_appends_never_interleave() {
        let (_dir, store) = store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|thread| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for n in 0..50 {
                        let mut record = record_at(&format!("{thread}-{n}"), n);
                        record.message = "x".repeat(512);
                        store.append(&record).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 400);
        let ids: HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 400);
        assert!(records.iter().all(|r| r.message.len() == 512));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLogStore::new(dir.path().join("nested/deeper/logs.txt"));
        store.append(&record_at("a", 0)).unwrap();
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn unwritable_path_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // The store path is an existing directory, which cannot be opened for appending.
        let store = FileLogStore::new(dir.path());
        let err = store.append(&record_at("a", 0)).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }
}
