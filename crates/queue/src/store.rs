//! The queue store: ordered records, optimistic inserts, and the
//! snapshot-merge semantics that reconcile server state into local
//! state without flicker.
//!
//! Two tiers live in one list: locally-originated records inserted
//! optimistically at submission time, and the server-mirror tier the
//! poll keeps authoritative. The merge is by id with server-wins
//! semantics, and it never reorders: an updated record keeps its list
//! position so the UI does not jump.

use std::collections::HashSet;

use polymuse_client::wire::GenerationCounts;
use polymuse_core::generation::{GenerationRecord, GenerationStatus};
use polymuse_core::types::GenerationId;

// ---------------------------------------------------------------------------
// Merge outcome
// ---------------------------------------------------------------------------

/// What a snapshot merge actually changed.
///
/// Applying the same snapshot twice yields an empty outcome the second
/// time; the merge is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Ids of records newly prepended from the snapshot.
    pub inserted: Vec<GenerationId>,
    /// Ids of records whose fields were overwritten in place.
    pub updated: Vec<GenerationId>,
}

impl MergeOutcome {
    /// Whether the merge changed anything at all.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty()
    }
}

// ---------------------------------------------------------------------------
// QueueStore
// ---------------------------------------------------------------------------

/// Ordered collection of [`GenerationRecord`]s for one workspace view.
///
/// Newest first. Mutated only by optimistic insert, snapshot merge,
/// and explicit removal; torn down with the owning workspace view.
#[derive(Debug, Default)]
pub struct QueueStore {
    records: Vec<GenerationRecord>,
    /// Ids removed by explicit delete. A deleted record is never
    /// resurrected, even if a later (additive) poll still reports it.
    tombstones: HashSet<GenerationId>,
    counts: GenerationCounts,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, newest first.
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-kind counts as last reported by the server.
    pub fn counts(&self) -> GenerationCounts {
        self.counts
    }

    /// Overwrite the server-reported counts. Returns `true` when they
    /// changed.
    pub fn set_counts(&mut self, counts: GenerationCounts) -> bool {
        if self.counts == counts {
            false
        } else {
            self.counts = counts;
            true
        }
    }

    /// Ids of all records still `Pending`.
    pub fn pending_ids(&self) -> Vec<GenerationId> {
        self.records
            .iter()
            .filter(|r| r.status == GenerationStatus::Pending)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Whether any record is still `Pending`.
    pub fn has_pending(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.status == GenerationStatus::Pending)
    }

    /// Optimistic insert: prepend a new record before server
    /// confirmation.
    ///
    /// Returns `false` (and leaves the store unchanged) when the id is
    /// tombstoned or already present.
    pub fn insert_front(&mut self, record: GenerationRecord) -> bool {
        if self.tombstones.contains(&record.id) || self.position(&record.id).is_some() {
            return false;
        }
        self.records.insert(0, record);
        true
    }

    /// Merge an authoritative server snapshot into the local list.
    ///
    /// - Known id: overwrite the local record's fields with the server
    ///   version, preserving its list position.
    /// - Unknown id: prepend, keeping the snapshot's relative order at
    ///   the front.
    /// - Locally-present ids absent from the snapshot are left
    ///   untouched: the poll endpoint is additive/confirmatory, never a
    ///   deletion signal.
    /// - Tombstoned ids are skipped entirely.
    pub fn merge_snapshot(&mut self, snapshot: &[GenerationRecord]) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let mut to_prepend: Vec<GenerationRecord> = Vec::new();

        for fetched in snapshot {
            if self.tombstones.contains(&fetched.id) {
                continue;
            }
            match self.position(&fetched.id) {
                Some(idx) => {
                    if &self.records[idx] != fetched {
                        self.records[idx] = fetched.clone();
                        outcome.updated.push(fetched.id.clone());
                    }
                }
                None => {
                    outcome.inserted.push(fetched.id.clone());
                    to_prepend.push(fetched.clone());
                }
            }
        }

        // Prepend as a block so the snapshot's relative order survives
        // at the front of the list.
        if !to_prepend.is_empty() {
            to_prepend.append(&mut self.records);
            self.records = to_prepend;
        }

        outcome
    }

    /// Explicit removal. Every requested id is tombstoned, present or
    /// not, so a stale poll can never bring it back.
    ///
    /// Returns the ids actually removed from the list.
    pub fn remove_ids(&mut self, ids: &[GenerationId]) -> Vec<GenerationId> {
        let requested: HashSet<&GenerationId> = ids.iter().collect();
        let mut removed = Vec::new();

        self.records.retain(|r| {
            if requested.contains(&r.id) {
                removed.push(r.id.clone());
                false
            } else {
                true
            }
        });

        for id in ids {
            self.tombstones.insert(id.clone());
        }

        removed
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
