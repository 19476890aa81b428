//! Durable record store: visit history and shortcuts in one LMDB environment.
//!
//! Every mutation is a single short-lived write transaction, so concurrent
//! shell sessions serialize on LMDB's writer lock without ever holding it
//! across an interactive session. Readers get an MVCC snapshot: a concurrent
//! writer can make it stale, never torn.

use crate::config::PruneConfig;
use crate::error::{Error, Result};
use crate::frecency;
use crate::path_utils;
use crate::types::{Shortcut, VisitData, VisitRecord};
use heed::types::{SerdeBincode, Str};
use heed::{Database, Env, EnvFlags, EnvOpenOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Health information about the store, surfaced by `dj status`.
#[derive(Debug, Clone)]
pub struct StoreHealth {
    pub path: String,
    pub disk_size: u64,
    pub entry_counts: Vec<(&'static str, u64)>,
}

/// What a prune pass actually removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats {
    pub removed_aged: usize,
    pub removed_over_cap: usize,
}

/// Per-entry outcome of a shortcut import. Collisions and invalid names are
/// reported, never silently overwritten; store I/O failures abort the import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub added: Vec<String>,
    pub skipped: Vec<(String, Error)>,
}

#[derive(Debug)]
pub struct Store {
    env: Env,
    // canonical path -> visit data
    visits_db: Database<Str, SerdeBincode<VisitData>>,
    // shortcut name -> target path
    shortcuts_db: Database<Str, Str>,
}

impl Store {
    pub fn open(dir: &Path) -> Result<Self> {
        Self::open_with_flags(dir, false)
    }

    /// `use_unsafe_no_lock` disables LMDB locking and syncing; only for tests
    /// where durability and cross-process safety do not matter.
    pub fn open_with_flags(dir: &Path, use_unsafe_no_lock: bool) -> Result<Self> {
        fs::create_dir_all(dir).map_err(Error::CreateDir)?;
        let env = unsafe {
            let mut opts = EnvOpenOptions::new();
            opts.max_dbs(8);
            if use_unsafe_no_lock {
                opts.flags(EnvFlags::NO_LOCK | EnvFlags::NO_SYNC | EnvFlags::NO_META_SYNC);
            }
            opts.open(dir).map_err(Error::EnvOpen)?
        };

        env.clear_stale_readers()
            .map_err(Error::DbClearStaleReaders)?;

        let mut wtxn = env.write_txn().map_err(Error::DbStartWriteTxn)?;
        let visits_db = env
            .create_database(&mut wtxn, Some("visits"))
            .map_err(Error::DbCreate)?;
        let shortcuts_db = env
            .create_database(&mut wtxn, Some("shortcuts"))
            .map_err(Error::DbCreate)?;
        wtxn.commit().map_err(Error::DbCommit)?;

        tracing::debug!(dir = %dir.display(), "Store opened");
        Ok(Store {
            env,
            visits_db,
            shortcuts_db,
        })
    }

    fn get_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// Canonicalize and upsert one visit event. Returns the canonical path so
    /// the caller can report what was actually recorded.
    pub fn record_visit(&self, path: &Path) -> Result<PathBuf> {
        let canonical = path_utils::canonicalize(path)?;
        let key = canonical
            .to_str()
            .ok_or_else(|| Error::InvalidPath(canonical.clone()))?;
        self.record_visit_at(key, self.get_now())?;
        Ok(canonical)
    }

    /// Upsert for an already-canonical path at an explicit timestamp.
    pub fn record_visit_at(&self, canonical: &str, now: u64) -> Result<()> {
        let mut wtxn = self.env.write_txn().map_err(Error::DbStartWriteTxn)?;

        let data = match self
            .visits_db
            .get(&wtxn, canonical)
            .map_err(Error::DbRead)?
        {
            Some(mut data) => {
                data.visit_count += 1;
                data.last_visited = now;
                data
            }
            None => VisitData {
                visit_count: 1,
                last_visited: now,
                first_visited: now,
            },
        };

        self.visits_db
            .put(&mut wtxn, canonical, &data)
            .map_err(Error::DbWrite)?;
        wtxn.commit().map_err(Error::DbCommit)?;

        tracing::debug!(path = canonical, count = data.visit_count, "Recorded visit");
        Ok(())
    }

    /// Consistent snapshot of every visit record, in key (path) order.
    pub fn load_all_visits(&self) -> Result<Vec<VisitRecord>> {
        let rtxn = self.env.read_txn().map_err(Error::DbStartReadTxn)?;
        let mut records = Vec::new();
        for entry in self.visits_db.iter(&rtxn).map_err(Error::DbRead)? {
            let (path, data) = entry.map_err(Error::DbRead)?;
            records.push(data.into_record(path));
        }
        Ok(records)
    }

    pub fn add_shortcut(&self, name: &str, path: &str) -> Result<()> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(Error::InvalidName(name.to_string()));
        }

        let mut wtxn = self.env.write_txn().map_err(Error::DbStartWriteTxn)?;
        if self
            .shortcuts_db
            .get(&wtxn, name)
            .map_err(Error::DbRead)?
            .is_some()
        {
            return Err(Error::DuplicateName(name.to_string()));
        }
        self.shortcuts_db
            .put(&mut wtxn, name, path)
            .map_err(Error::DbWrite)?;
        wtxn.commit().map_err(Error::DbCommit)?;

        tracing::debug!(name, path, "Added shortcut");
        Ok(())
    }

    pub fn delete_shortcut(&self, name: &str) -> Result<()> {
        let mut wtxn = self.env.write_txn().map_err(Error::DbStartWriteTxn)?;
        let deleted = self
            .shortcuts_db
            .delete(&mut wtxn, name)
            .map_err(Error::DbWrite)?;
        if !deleted {
            return Err(Error::NotFound(name.to_string()));
        }
        wtxn.commit().map_err(Error::DbCommit)?;

        tracing::debug!(name, "Deleted shortcut");
        Ok(())
    }

    pub fn find_shortcut(&self, name: &str) -> Result<Option<Shortcut>> {
        let rtxn = self.env.read_txn().map_err(Error::DbStartReadTxn)?;
        let path = self.shortcuts_db.get(&rtxn, name).map_err(Error::DbRead)?;
        Ok(path.map(|path| Shortcut {
            name: name.to_string(),
            path: path.to_string(),
        }))
    }

    /// All shortcuts, name-ascending (LMDB key order).
    pub fn list_shortcuts(&self) -> Result<Vec<Shortcut>> {
        let rtxn = self.env.read_txn().map_err(Error::DbStartReadTxn)?;
        let mut shortcuts = Vec::new();
        for entry in self.shortcuts_db.iter(&rtxn).map_err(Error::DbRead)? {
            let (name, path) = entry.map_err(Error::DbRead)?;
            shortcuts.push(Shortcut {
                name: name.to_string(),
                path: path.to_string(),
            });
        }
        Ok(shortcuts)
    }

    /// Run every entry through `add_shortcut` validation. Name collisions and
    /// invalid names are collected in the report; anything else aborts.
    pub fn import_shortcuts(&self, entries: &[(String, String)]) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        for (name, path) in entries {
            match self.add_shortcut(name, path) {
                Ok(()) => report.added.push(name.clone()),
                Err(e @ (Error::DuplicateName(_) | Error::InvalidName(_))) => {
                    tracing::warn!(name, error = %e, "Skipped shortcut on import");
                    report.skipped.push((name.clone(), e));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    /// Two-pass prune inside one write transaction: drop records older than
    /// `max_age_days` whose count never reached `min_keep_visits`, then cap
    /// the table at `max_entries` by evicting lowest frecency score first.
    pub fn prune(&self, now: u64, policy: &PruneConfig) -> Result<PruneStats> {
        let max_age_secs = policy.max_age_days.saturating_mul(SECONDS_PER_DAY);
        let mut wtxn = self.env.write_txn().map_err(Error::DbStartWriteTxn)?;

        let mut records = Vec::new();
        for entry in self.visits_db.iter(&wtxn).map_err(Error::DbRead)? {
            let (path, data) = entry.map_err(Error::DbRead)?;
            records.push(data.into_record(path));
        }

        let mut stats = PruneStats::default();

        let (aged, remaining): (Vec<VisitRecord>, Vec<VisitRecord>) =
            records.into_iter().partition(|r| {
                now.saturating_sub(r.last_visited) > max_age_secs
                    && r.visit_count < policy.min_keep_visits
            });
        for record in &aged {
            self.visits_db
                .delete(&mut wtxn, &record.path)
                .map_err(Error::DbWrite)?;
        }
        stats.removed_aged = aged.len();

        if remaining.len() > policy.max_entries {
            let ranked = frecency::rank_records(&remaining, now);
            let evict: Vec<String> = ranked[policy.max_entries..]
                .iter()
                .map(|(_, r)| r.path.clone())
                .collect();
            for path in &evict {
                self.visits_db
                    .delete(&mut wtxn, path)
                    .map_err(Error::DbWrite)?;
            }
            stats.removed_over_cap = evict.len();
        }

        wtxn.commit().map_err(Error::DbCommit)?;

        if stats.removed_aged > 0 || stats.removed_over_cap > 0 {
            tracing::info!(
                aged = stats.removed_aged,
                over_cap = stats.removed_over_cap,
                "Pruned visit history"
            );
        }
        Ok(stats)
    }

    /// Opportunistic prune: fires for roughly one in `frequency` visit
    /// timestamps, cheap and deterministic without a persisted counter.
    pub fn maybe_prune(&self, policy: &PruneConfig) -> Result<PruneStats> {
        let now = self.get_now();
        if policy.frequency == 0 || now % policy.frequency != 0 {
            return Ok(PruneStats::default());
        }
        self.prune(now, policy)
    }

    pub fn health(&self) -> Result<StoreHealth> {
        let disk_size = self.env.real_disk_size().map_err(Error::EnvOpen)?;
        let path = self.env.path().to_string_lossy().to_string();

        let rtxn = self.env.read_txn().map_err(Error::DbStartReadTxn)?;
        let visits = self.visits_db.len(&rtxn).map_err(Error::DbRead)?;
        let shortcuts = self.shortcuts_db.len(&rtxn).map_err(Error::DbRead)?;

        Ok(StoreHealth {
            path,
            disk_size,
            entry_counts: vec![("visits", visits), ("shortcuts", shortcuts)],
        })
    }
}
