// Casetrail - core/timeline.rs
//
// The ordered entry collection and its sort-state machine.
//
// Mutations are not internally thread-safe: the hosting layer serialises
// access to a given investigation's timeline (one timeline per session, or
// a single-threaded event loop). Every mutation transitions the sort state
// back to Unsorted; only an explicit sort sets it.

use chrono::Local;

use crate::core::model::{EntryId, LogEntry, Severity};
use crate::core::normalize;
use crate::util::error::TimelineError;

/// Cached ordering state. Mutations (insert/update/delete/clear) always
/// transition to `Unsorted`; `sort()` sets the direction that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortState {
    #[default]
    Unsorted,
    SortedAsc,
    SortedDesc,
}

/// Sort direction for `Timeline::sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// An ordered sequence of log entries with unique ids.
#[derive(Debug, Default)]
pub struct Timeline {
    entries: Vec<LogEntry>,
    next_id: u64,
    sort_state: SortState,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries in their current display order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached sort state. For the computed check see `is_sorted_ascending`.
    pub fn sort_state(&self) -> SortState {
        self.sort_state
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Validate, normalise, and append a new entry.
    ///
    /// Rejects blank timestamps and blank descriptions with no partial
    /// mutation. The returned reference carries the assigned id and the
    /// `degraded` flag the host should surface when set.
    pub fn insert(
        &mut self,
        raw_timestamp: &str,
        description: &str,
        severity: Severity,
    ) -> Result<&LogEntry, TimelineError> {
        let raw_timestamp = raw_timestamp.trim();
        let description = description.trim();
        if raw_timestamp.is_empty() {
            return Err(TimelineError::EmptyField { field: "timestamp" });
        }
        if description.is_empty() {
            return Err(TimelineError::EmptyField {
                field: "description",
            });
        }

        let normalized = normalize::normalize(raw_timestamp);
        let id = EntryId(self.next_id);
        self.next_id += 1;

        let entry = LogEntry {
            id,
            raw_timestamp: raw_timestamp.to_string(),
            canonical_time: normalized.time,
            description: description.to_string(),
            severity,
            degraded: normalized.degraded,
            created_at: Local::now().naive_local(),
        };

        tracing::debug!(
            id = %entry.id,
            canonical = %entry.canonical_time,
            degraded = entry.degraded,
            "entry inserted"
        );

        self.entries.push(entry);
        self.sort_state = SortState::Unsorted;
        Ok(self.entries.last().expect("entry was just pushed"))
    }

    /// Replace an entry's fields in place, keeping its id, position, and
    /// creation instant. The timestamp is re-normalised.
    pub fn update(
        &mut self,
        id: EntryId,
        raw_timestamp: &str,
        description: &str,
        severity: Severity,
    ) -> Result<(), TimelineError> {
        let raw_timestamp = raw_timestamp.trim();
        let description = description.trim();
        if raw_timestamp.is_empty() {
            return Err(TimelineError::EmptyField { field: "timestamp" });
        }
        if description.is_empty() {
            return Err(TimelineError::EmptyField {
                field: "description",
            });
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(TimelineError::NotFound { id })?;

        let normalized = normalize::normalize(raw_timestamp);
        entry.raw_timestamp = raw_timestamp.to_string();
        entry.canonical_time = normalized.time;
        entry.description = description.to_string();
        entry.severity = severity;
        entry.degraded = normalized.degraded;

        self.sort_state = SortState::Unsorted;
        Ok(())
    }

    /// Remove an entry. Remaining entries keep their relative order.
    pub fn delete(&mut self, id: EntryId) -> Result<(), TimelineError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(TimelineError::NotFound { id })?;
        self.entries.remove(index);
        self.sort_state = SortState::Unsorted;
        Ok(())
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sort_state = SortState::Unsorted;
    }

    /// Sort by canonical instant. Ties resolve to original insertion order
    /// regardless of the current permutation: the id is the insertion
    /// sequence, so `(canonical_time, id)` is a total order. Descending is
    /// the exact reverse of the ascending sequence, ties included.
    pub fn sort(&mut self, direction: Direction) {
        self.entries
            .sort_by_key(|e| (e.canonical_time, e.id));
        match direction {
            Direction::Ascending => self.sort_state = SortState::SortedAsc,
            Direction::Descending => {
                self.entries.reverse();
                self.sort_state = SortState::SortedDesc;
            }
        }
    }

    /// Computed check, independent of the cached state: true iff the
    /// current sequence is non-decreasing by canonical instant. Exporters
    /// use this to decide whether an ascending view needs a re-sort.
    pub fn is_sorted_ascending(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].canonical_time <= w[1].canonical_time)
    }

    /// Clones of the entries in ascending order, leaving the display order
    /// untouched. This is the view every exporter and the analysis hand-off
    /// use, regardless of the on-screen direction.
    pub fn ascending_view(&self) -> Vec<LogEntry> {
        let mut view = self.entries.clone();
        view.sort_by_key(|e| (e.canonical_time, e.id));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline_with(entries: &[(&str, &str, Severity)]) -> Timeline {
        let mut tl = Timeline::new();
        for (ts, desc, sev) in entries {
            tl.insert(ts, desc, *sev).expect("test entry should insert");
        }
        tl
    }

    #[test]
    fn test_insert_validates_blank_fields() {
        let mut tl = Timeline::new();
        assert!(matches!(
            tl.insert("", "something", Severity::Info),
            Err(TimelineError::EmptyField { field: "timestamp" })
        ));
        assert!(matches!(
            tl.insert("2024-01-15 10:00:00", "   ", Severity::Info),
            Err(TimelineError::EmptyField {
                field: "description"
            })
        ));
        assert!(tl.is_empty(), "rejected inserts must not mutate");
    }

    #[test]
    fn test_insert_assigns_unique_ids_and_unsorts() {
        let mut tl = Timeline::new();
        let a = tl.insert("2024-01-15 10:00:00", "a", Severity::Low).unwrap().id;
        let b = tl.insert("2024-01-14 10:00:00", "b", Severity::Low).unwrap().id;
        assert_ne!(a, b);
        assert_eq!(tl.sort_state(), SortState::Unsorted);
    }

    #[test]
    fn test_update_changes_only_target_and_resets_state() {
        let mut tl = timeline_with(&[
            ("2024-01-14 09:00:00", "first", Severity::Critical),
            ("2024-01-15 10:00:00", "second", Severity::Low),
        ]);
        tl.sort(Direction::Ascending);
        assert_eq!(tl.sort_state(), SortState::SortedAsc);

        let id = tl.entries()[1].id;
        tl.update(id, "2024-01-16 11:00:00", "second edited", Severity::High)
            .unwrap();

        // Same position, new fields.
        assert_eq!(tl.entries()[1].id, id);
        assert_eq!(tl.entries()[1].description, "second edited");
        assert_eq!(tl.entries()[1].severity, Severity::High);
        // The untouched entry is unchanged.
        assert_eq!(tl.entries()[0].description, "first");
        // Any mutation drops the cached sort.
        assert_eq!(tl.sort_state(), SortState::Unsorted);
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let mut tl = Timeline::new();
        let err = tl
            .update(EntryId(99), "2024-01-15 10:00:00", "x", Severity::Info)
            .unwrap_err();
        assert!(matches!(err, TimelineError::NotFound { .. }));
    }

    #[test]
    fn test_delete_preserves_remaining_order() {
        let mut tl = timeline_with(&[
            ("2024-01-15 10:00:00", "a", Severity::Info),
            ("2024-01-14 09:00:00", "b", Severity::Info),
            ("2024-01-16 11:00:00", "c", Severity::Info),
        ]);
        let id = tl.entries()[1].id;
        tl.delete(id).unwrap();
        let descs: Vec<_> = tl.entries().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descs, ["a", "c"]);
        assert!(tl.delete(id).is_err(), "second delete of same id fails");
    }

    #[test]
    fn test_insert_then_delete_leaves_empty() {
        let mut tl = Timeline::new();
        let id = tl.insert("2024-01-15 10:00:00", "only", Severity::Info).unwrap().id;
        tl.delete(id).unwrap();
        assert!(tl.is_empty());
    }

    #[test]
    fn test_sort_ascending_with_stable_tie_break() {
        // Spec'd end-to-end ordering: duplicate instants keep insertion order.
        let mut tl = timeline_with(&[
            ("2024-01-15 10:00:00", "entry1", Severity::Low),
            ("2024-01-14 09:00:00", "entry2", Severity::Critical),
            ("2024-01-15 10:00:00", "entry3", Severity::Info),
        ]);
        tl.sort(Direction::Ascending);
        let descs: Vec<_> = tl.entries().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descs, ["entry2", "entry1", "entry3"]);
        assert_eq!(tl.sort_state(), SortState::SortedAsc);
        assert!(tl.is_sorted_ascending());
    }

    #[test]
    fn test_descending_is_exact_reverse_of_ascending() {
        let mut tl = timeline_with(&[
            ("2024-01-15 10:00:00", "a", Severity::Info),
            ("2024-01-14 09:00:00", "b", Severity::Info),
            ("2024-01-15 10:00:00", "c", Severity::Info),
        ]);
        tl.sort(Direction::Ascending);
        let asc: Vec<_> = tl.entries().iter().map(|e| e.id).collect();

        tl.sort(Direction::Descending);
        let desc: Vec<_> = tl.entries().iter().map(|e| e.id).collect();
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
        assert_eq!(tl.sort_state(), SortState::SortedDesc);

        // Sorting ascending again restores the original ascending sequence.
        tl.sort(Direction::Ascending);
        let asc_again: Vec<_> = tl.entries().iter().map(|e| e.id).collect();
        assert_eq!(asc_again, asc);
    }

    #[test]
    fn test_tie_break_survives_permutations() {
        // After a descending sort the in-memory order of tied entries is
        // reversed; a fresh ascending sort must still restore insertion
        // order for the tie, not the current relative order.
        let mut tl = timeline_with(&[
            ("2024-01-15 10:00:00", "first-inserted", Severity::Info),
            ("2024-01-15 10:00:00", "second-inserted", Severity::Info),
        ]);
        tl.sort(Direction::Descending);
        tl.sort(Direction::Ascending);
        assert_eq!(tl.entries()[0].description, "first-inserted");
    }

    #[test]
    fn test_is_sorted_ascending_is_computed_not_cached() {
        let mut tl = timeline_with(&[
            ("2024-01-14 09:00:00", "a", Severity::Info),
            ("2024-01-15 10:00:00", "b", Severity::Info),
        ]);
        // Inserted in ascending order: computed check is true while the
        // cached state still says Unsorted.
        assert!(tl.is_sorted_ascending());
        assert_eq!(tl.sort_state(), SortState::Unsorted);

        tl.insert("2024-01-01 00:00:00", "c", Severity::Info).unwrap();
        assert!(!tl.is_sorted_ascending());
    }

    #[test]
    fn test_clear_resets_everything_but_not_ids() {
        let mut tl = timeline_with(&[("2024-01-15 10:00:00", "a", Severity::Info)]);
        let old_id = tl.entries()[0].id;
        tl.clear();
        assert!(tl.is_empty());
        assert_eq!(tl.sort_state(), SortState::Unsorted);
        // Ids are never reused, even across a clear.
        let new_id = tl.insert("2024-01-15 10:00:00", "b", Severity::Info).unwrap().id;
        assert_ne!(old_id, new_id);
    }

    #[test]
    fn test_ascending_view_does_not_mutate_display_order() {
        let mut tl = timeline_with(&[
            ("2024-01-15 10:00:00", "late", Severity::Info),
            ("2024-01-14 09:00:00", "early", Severity::Info),
        ]);
        tl.sort(Direction::Descending);
        let view = tl.ascending_view();
        assert_eq!(view[0].description, "early");
        // Display order still descending.
        assert_eq!(tl.entries()[0].description, "late");
        assert_eq!(tl.sort_state(), SortState::SortedDesc);
    }

    #[test]
    fn test_degraded_entry_still_inserts() {
        let mut tl = Timeline::new();
        let entry = tl.insert("banana", "weird timestamp", Severity::Info).unwrap();
        assert!(entry.degraded);
    }
}
