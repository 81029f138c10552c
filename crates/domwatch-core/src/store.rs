//! File-backed watchlist.
//!
//! The store keeps no cached copy: every operation loads the record from disk, mutates
//! it and writes it back in full. Two concurrent mutations can therefore race and one
//! write can silently replace the other (lost update). That is acceptable for a small
//! group editing infrequently; there is intentionally no lock here.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::{domain::ChatId, normalize::normalize, Result};

/// Persisted state: the chat that receives reports plus the watched domains.
///
/// On disk this is pretty-printed JSON (`{"chat_id": ..., "domains": [...]}`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistRecord {
    #[serde(rename = "chat_id", default)]
    pub target_chat: Option<ChatId>,
    #[serde(default)]
    pub domains: BTreeSet<String>,
}

impl WatchlistRecord {
    /// Re-apply normalization to entries that may have been edited by hand.
    fn normalized(self) -> Self {
        let domains = self
            .domains
            .iter()
            .map(|d| normalize(d))
            .filter(|d| !d.is_empty())
            .collect();
        Self {
            target_chat: self.target_chat,
            domains,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddReport {
    pub added: Vec<String>,
    pub already_present: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoveReport {
    pub removed: Vec<String>,
    pub not_found: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct WatchlistStore {
    path: PathBuf,
}

impl WatchlistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. Missing, empty or corrupt files yield a fresh empty record.
    pub fn load(&self) -> WatchlistRecord {
        match read_record(&self.path) {
            Ok(Some(record)) => record.normalized(),
            Ok(None) => WatchlistRecord::default(),
            Err(e) => {
                error!(path = %self.path.display(), "failed to load watchlist, starting fresh: {e}");
                WatchlistRecord::default()
            }
        }
    }

    /// Write the full record. Domains are already unique and sorted (`BTreeSet`).
    pub fn save(&self, record: &WatchlistRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut txt = serde_json::to_string_pretty(record)?;
        txt.push('\n');
        fs::write(&self.path, txt)?;
        debug!(path = %self.path.display(), domains = record.domains.len(), "watchlist saved");
        Ok(())
    }

    pub fn set_target(&self, chat_id: ChatId) {
        let mut record = self.load();
        record.target_chat = Some(chat_id);
        self.persist(&record);
    }

    pub fn add_domains<I, S>(&self, candidates: I) -> AddReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted = normalized_set(candidates);
        if wanted.is_empty() {
            return AddReport::default();
        }

        let mut record = self.load();
        let (already_present, added): (Vec<String>, Vec<String>) = wanted
            .into_iter()
            .partition(|d| record.domains.contains(d));

        if !added.is_empty() {
            record.domains.extend(added.iter().cloned());
            self.persist(&record);
        }

        AddReport {
            added,
            already_present,
        }
    }

    pub fn remove_domains<I, S>(&self, candidates: I) -> RemoveReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted = normalized_set(candidates);
        if wanted.is_empty() {
            return RemoveReport::default();
        }

        let mut record = self.load();
        let (removed, not_found): (Vec<String>, Vec<String>) = wanted
            .into_iter()
            .partition(|d| record.domains.contains(d));

        if !removed.is_empty() {
            for d in &removed {
                record.domains.remove(d);
            }
            self.persist(&record);
        }

        RemoveReport { removed, not_found }
    }

    pub fn list(&self) -> Vec<String> {
        self.load().domains.into_iter().collect()
    }

    /// Best-effort save: the mutation is dropped (and logged) if the write fails.
    fn persist(&self, record: &WatchlistRecord) {
        if let Err(e) = self.save(record) {
            error!(path = %self.path.display(), "failed to save watchlist: {e}");
        }
    }
}

fn read_record(path: &Path) -> Result<Option<WatchlistRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let txt = fs::read_to_string(path)?;
    if txt.trim().is_empty() {
        warn!(path = %path.display(), "watchlist file is empty");
        return Ok(None);
    }
    let record: WatchlistRecord = serde_json::from_str(&txt)?;
    Ok(Some(record))
}

// BTreeSet iteration keeps the partitions sorted.
fn normalized_set<I, S>(candidates: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .map(|c| normalize(c.as_ref()))
        .filter(|d| !d.is_empty())
        .collect()
}
