//! Persistent `question id -> digest` ledger for change detection.
//!
//! One `id,digest` pair per line. Every persist merges this session's
//! digests into what is already on disk and rewrites the whole file, so the
//! set of known questions only grows.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::atomic::write_atomically;
use crate::error::VersionLedgerError;

/// Digests known from earlier sessions, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownVersions {
    digests: BTreeMap<String, String>,
}

impl KnownVersions {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.digests.get(id).map(String::as_str)
    }

    /// True iff a prior digest exists for `id` and differs from `current`.
    pub fn was_updated(&self, id: &str, current: &str) -> bool {
        self.get(id).is_some_and(|prior| prior != current)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.digests.keys().map(String::as_str)
    }

    fn parse(content: &[u8]) -> Self {
        let mut digests = BTreeMap::new();
        for (lineno, raw) in content.split(|&b| b == b'\n').enumerate() {
            let Ok(line) = std::str::from_utf8(raw) else {
                tracing::warn!(line = lineno + 1, "skipping non-UTF-8 version ledger line");
                continue;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once(',') {
                Some((id, digest)) if !id.is_empty() && !digest.is_empty() => {
                    digests.insert(id.to_string(), digest.to_string());
                }
                _ => tracing::warn!(line = lineno + 1, "skipping corrupt version ledger line"),
            }
        }
        Self { digests }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (id, digest) in &self.digests {
            out.push_str(id);
            out.push(',');
            out.push_str(digest);
            out.push('\n');
        }
        out
    }
}

impl FromIterator<(String, String)> for KnownVersions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            digests: iter.into_iter().collect(),
        }
    }
}

/// File-backed version ledger.
#[derive(Debug, Clone)]
pub struct VersionLedger {
    path: PathBuf,
}

impl VersionLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read persisted digests. A missing file is empty; any other read
    /// failure is an error.
    pub fn try_load(&self) -> Result<KnownVersions, VersionLedgerError> {
        match std::fs::read(&self.path) {
            Ok(content) => Ok(KnownVersions::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(KnownVersions::default()),
            Err(source) => Err(VersionLedgerError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Like [`try_load`](Self::try_load), but an unreadable file loads as
    /// empty with a warning. Used for change annotations only.
    pub fn load(&self) -> KnownVersions {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!("{e}");
            KnownVersions::default()
        })
    }

    /// Convenience for [`KnownVersions::was_updated`] against the file.
    pub fn was_updated(&self, id: &str, current: &str) -> bool {
        self.load().was_updated(id, current)
    }

    /// Union the persisted digests with `session`, session values winning,
    /// and rewrite the file. Returns the merged mapping.
    ///
    /// Fails without touching the file if the existing ledger cannot be read.
    pub fn merge_and_persist<I>(&self, session: I) -> Result<KnownVersions, VersionLedgerError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged = self.try_load()?;
        let before = merged.len();
        merged.digests.extend(session);

        write_atomically(&self.path, merged.render().as_bytes()).map_err(|source| {
            VersionLedgerError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::info!(
            known = merged.len(),
            added = merged.len() - before,
            "question versions persisted"
        );
        Ok(merged)
    }
}
