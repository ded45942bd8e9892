// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed credential slot: a small JSON key/value store with atomic writes.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;

use super::{CredentialSlot, TOKEN_KEY};

type Entries = BTreeMap<String, Value>;

/// Credential slot persisted as one entry of a JSON object file.
///
/// Other keys in the file are preserved across writes, whatever their JSON
/// type. The in-memory copy is authoritative for reads, so an eviction is
/// observed by the next call even if the disk write fails.
pub struct FileSlot {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileSlot {
    /// Open the store at `path`.
    ///
    /// Never fails: a missing, unreadable, or damaged file opens as an empty
    /// store and is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), err = %e, "discarding unreadable client state");
            Entries::new()
        });
        Self { path, entries: Mutex::new(entries) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &Entries) {
        if let Err(e) = save(&self.path, entries) {
            tracing::warn!(path = %self.path.display(), err = %e, "failed to persist client state");
        }
    }
}

impl CredentialSlot for FileSlot {
    fn get(&self) -> Option<String> {
        self.entries.lock().get(TOKEN_KEY).and_then(Value::as_str).map(str::to_owned)
    }

    fn set(&self, token: &str) {
        let mut entries = self.entries.lock();
        entries.insert(TOKEN_KEY.to_owned(), Value::String(token.to_owned()));
        self.flush(&entries);
    }

    fn clear(&self) {
        let mut entries = self.entries.lock();
        if entries.remove(TOKEN_KEY).is_some() {
            self.flush(&entries);
        }
    }
}

fn load(path: &Path) -> anyhow::Result<Entries> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(e) => return Err(e.into()),
    };
    if contents.trim().is_empty() {
        return Ok(Entries::new());
    }
    Ok(serde_json::from_str(&contents)?)
}

/// Replace the file in one step: write a sibling temp file, then persist it
/// over `path`.
fn save(path: &Path, entries: &Entries) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, entries)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
