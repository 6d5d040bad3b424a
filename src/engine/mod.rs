// Tokensync — Union-Merge Engine
//
// Every operation is one read-all → compute → write-all pass over the
// configured stores. Write-back always targets every store, and a failed
// write never stops the remaining ones: the failure is reported after all
// stores have been attempted.

mod identity;
mod merge;
mod mutate;

use std::fmt;

use serde::Serialize;

use crate::store::{Record, RecordStore, StoreError};

pub use identity::{resolve, IdentityKey};
pub use merge::{dedup, key_set, merge};
pub use mutate::{
    delete_number, index, rename_number, CancelReason, Confirmation, MutationOutcome, NumberIndex,
};

/// Counters produced by a sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub files_found: usize,
    pub files_changed: usize,
    pub records_added: usize,
    pub duplicates_removed: usize,
    pub total_records: usize,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Token files found:   {}", self.files_found)?;
        writeln!(f, "Files changed:       {}", self.files_changed)?;
        writeln!(f, "Records added:       {}", self.records_added)?;
        writeln!(f, "Duplicates removed:  {}", self.duplicates_removed)?;
        write!(f, "Total records now:   {}", self.total_records)
    }
}

/// Per-store health, as seen before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub location: String,
    pub was_valid: bool,
    pub records: usize,
    pub duplicates: usize,
    pub discarded: usize,
}

/// The sync engine over an ordered set of stores.
pub struct SyncEngine<S> {
    stores: Vec<S>,
}

impl<S: RecordStore> SyncEngine<S> {
    /// Stores are put into traversal order (case-insensitive `sort_key`).
    /// The sort is stable, so equal keys keep the caller's order.
    pub fn new(mut stores: Vec<S>) -> Self {
        stores.sort_by_cached_key(|s| s.sort_key());
        Self { stores }
    }

    pub fn stores(&self) -> &[S] {
        &self.stores
    }

    /// Load every store and dedup each one on its own.
    fn load_deduplicated(&self) -> Vec<Vec<Record>> {
        self.stores
            .iter()
            .map(|store| dedup(store.load().records))
            .collect()
    }

    /// Canonical union of all stores, without writing anything.
    pub fn load_union(&self) -> Vec<Record> {
        let cleaned = self.load_deduplicated();
        merge(cleaned.iter().map(Vec::as_slice))
    }

    /// Number → display-name index over the canonical union.
    pub fn index(&self) -> NumberIndex {
        index(&self.load_union())
    }

    pub fn statuses(&self) -> Vec<StoreStatus> {
        self.stores
            .iter()
            .map(|store| {
                let loaded = store.load();
                let raw = loaded.records.len();
                let unique = dedup(loaded.records).len();
                StoreStatus {
                    location: store.location(),
                    was_valid: loaded.was_valid,
                    records: unique,
                    duplicates: raw - unique,
                    discarded: loaded.discarded,
                }
            })
            .collect()
    }

    /// Merge every store and write the union back to all of them.
    pub fn sync(&self) -> Result<SyncReport, StoreError> {
        let mut report = SyncReport {
            files_found: self.stores.len(),
            ..SyncReport::default()
        };

        if self.stores.is_empty() {
            tracing::info!("No token files found, nothing to sync");
            return Ok(report);
        }

        let mut cleaned = Vec::with_capacity(self.stores.len());
        let mut removed_per_store = Vec::with_capacity(self.stores.len());
        for store in &self.stores {
            let raw = store.load().records;
            let raw_len = raw.len();
            let deduped = dedup(raw);
            removed_per_store.push(raw_len - deduped.len());
            cleaned.push(deduped);
        }

        let merged = merge(cleaned.iter().map(Vec::as_slice));
        let merged_keys = key_set(&merged);

        for ((store, old), removed) in self.stores.iter().zip(&cleaned).zip(&removed_per_store) {
            let old_keys = key_set(old);
            let added = merged_keys.difference(&old_keys).count();

            report.records_added += added;
            report.duplicates_removed += removed;
            if added > 0 || *removed > 0 || old.len() != merged.len() {
                report.files_changed += 1;
                tracing::debug!(
                    store = %store.location(),
                    added,
                    duplicates = removed,
                    "Store out of sync"
                );
            }
        }
        report.total_records = merged.len();

        self.write_back(&merged)?;

        tracing::info!(
            files = report.files_found,
            changed = report.files_changed,
            added = report.records_added,
            duplicates = report.duplicates_removed,
            total = report.total_records,
            "Sync completed"
        );
        Ok(report)
    }

    /// Set `name` on every record of `number`, then redistribute the union.
    pub fn rename(&self, number: &str, new_name: &str) -> Result<MutationOutcome, StoreError> {
        if new_name.trim().is_empty() {
            return Ok(MutationOutcome::cancelled(CancelReason::EmptyName));
        }

        let mut set = self.load_union();
        if set.is_empty() {
            return Ok(MutationOutcome::cancelled(CancelReason::NoData));
        }

        let outcome = rename_number(&mut set, number, new_name);
        if let MutationOutcome::Applied { affected, .. } = &outcome {
            self.write_back(&set)?;
            tracing::info!(number = %number.trim(), affected, "Records renamed");
        }
        Ok(outcome)
    }

    /// Remove every record of `number` from every store.
    pub fn delete(
        &self,
        number: &str,
        confirmation: Confirmation,
    ) -> Result<MutationOutcome, StoreError> {
        if confirmation != Confirmation::Confirmed {
            return Ok(MutationOutcome::cancelled(CancelReason::NotConfirmed));
        }

        let set = self.load_union();
        if set.is_empty() {
            return Ok(MutationOutcome::cancelled(CancelReason::NoData));
        }

        let (kept, removed) = delete_number(set, number);
        self.write_back(&kept)?;
        tracing::info!(number = %number.trim(), removed, "Records deleted");

        Ok(MutationOutcome::Applied {
            number: number.trim().to_string(),
            affected: removed,
        })
    }

    /// Overwrite every store with `records`, continuing past failures.
    fn write_back(&self, records: &[Record]) -> Result<(), StoreError> {
        let mut failed = Vec::new();
        for store in &self.stores {
            if let Err(e) = store.replace_all(records) {
                tracing::error!(store = %store.location(), error = %e, "Write-back failed");
                failed.push(store.location());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(StoreError::WriteBack {
                failed,
                attempted: self.stores.len(),
            })
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
