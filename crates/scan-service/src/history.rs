use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use humantime::format_rfc3339_seconds;
use scan_types::{AnalysisKind, AnalysisReport, HistoryItem, HistoryStats};
use serde_json::Value;

use crate::error::HistoryError;

pub const HISTORY_FILE_NAME: &str = "history.json";

/// Append-only scan history kept as one JSON array on disk.
///
/// Entries that no longer decode are kept verbatim in `raw` and written back
/// on every append, so one bad record never costs the others.
pub struct HistoryStore {
    path: PathBuf,
    raw: Vec<Value>,
    items: Vec<HistoryItem>,
    unreadable: bool,
}

impl HistoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (raw, unreadable) = match load_raw(&path) {
            Some(raw) => (raw, false),
            None => (Vec::new(), true),
        };
        let items = decode_items(&raw, &path);
        tracing::debug!(
            path = %path.display(),
            count = items.len(),
            skipped = raw.len() - items.len(),
            "history loaded"
        );
        Self {
            path,
            raw,
            items,
            unreadable,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Oldest first, in append order.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_items(&self.items)
    }

    pub fn append(
        &mut self,
        kind: AnalysisKind,
        input: &str,
        result: AnalysisReport,
    ) -> Result<&HistoryItem, HistoryError> {
        let item = HistoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: format_rfc3339_seconds(SystemTime::now()).to_string(),
            kind,
            input: input.to_string(),
            result,
        };
        self.raw.push(serde_json::to_value(&item)?);
        if let Err(err) = self.persist() {
            self.raw.pop();
            return Err(err);
        }
        self.items.push(item);
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    fn persist(&mut self) -> Result<(), HistoryError> {
        let payload = serde_json::to_vec_pretty(&self.raw)?;
        let path = self.path.clone();
        let write_err = |source| HistoryError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        if self.unreadable {
            set_aside(&path).map_err(write_err)?;
            self.unreadable = false;
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, payload).map_err(write_err)?;
        fs::rename(&tmp_path, &path).map_err(write_err)?;
        Ok(())
    }
}

/// `None` when the file exists but is not a JSON array.
fn load_raw(path: &Path) -> Option<Vec<Value>> {
    let payload = match fs::read(path) {
        Ok(payload) => payload,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Some(Vec::new()),
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "failed to read history");
            return None;
        }
    };
    match serde_json::from_slice::<Vec<Value>>(&payload) {
        Ok(raw) => Some(raw),
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "failed to parse history");
            None
        }
    }
}

fn decode_items(raw: &[Value], path: &Path) -> Vec<HistoryItem> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<HistoryItem>(entry.clone()) {
                Ok(item) => Some(item),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        path = %path.display(),
                        index,
                        "skipping undecodable history entry"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Moves an unparseable history file to `<name>.corrupt-<unix secs>`.
fn set_aside(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{secs}"));
    let target = path.with_file_name(name);
    tracing::warn!(from = %path.display(), to = %target.display(), "moving unreadable history aside");
    fs::rename(path, target)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) fn temp_dir(prefix: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        dir.push(format!("{prefix}-{nanos}-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }
}
