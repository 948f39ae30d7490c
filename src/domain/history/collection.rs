//! History aggregate: capacity, eviction, favorites and dedup rules

use std::cmp::Reverse;

use crate::domain::entry::{ClipboardEntry, EntryId};

/// Default maximum number of entries
pub const DEFAULT_CAPACITY: usize = 200;

/// Result of adding an entry
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Entry appended; `evicted` is the entry dropped to stay within capacity
    Inserted {
        id: EntryId,
        evicted: Option<ClipboardEntry>,
    },
    /// Same content as the most recent entry, nothing changed
    Duplicate { existing: EntryId },
    /// History is full of favorites, nothing changed
    Rejected,
}

/// Insertion-ordered, capacity-bounded entry collection.
///
/// Rules:
/// - an entry whose hash equals the most recently added one is dropped
/// - past capacity the oldest non-favorite entry is evicted
/// - favorites are never evicted; when every slot holds a favorite, new
///   entries are rejected so the size never exceeds the capacity
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<ClipboardEntry>,
    capacity: usize,
}

impl History {
    /// Create an empty history; capacity is at least one
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Restore from persisted entries (oldest first).
    ///
    /// Non-favorites beyond capacity are dropped oldest first; favorites
    /// are always kept.
    pub fn from_entries(entries: Vec<ClipboardEntry>, capacity: usize) -> Self {
        let mut history = Self {
            entries,
            capacity: capacity.max(1),
        };
        while history.entries.len() > history.capacity {
            if history.evict_oldest_non_favorite(history.entries.len()).is_none() {
                break;
            }
        }
        history
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, oldest first
    pub fn entries(&self) -> &[ClipboardEntry] {
        &self.entries
    }

    /// Most recently added entry
    pub fn latest(&self) -> Option<&ClipboardEntry> {
        self.entries.last()
    }

    pub fn get(&self, id: EntryId) -> Option<&ClipboardEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn add(&mut self, entry: ClipboardEntry) -> AddOutcome {
        if let Some(last) = self.entries.last() {
            if last.content_hash() == entry.content_hash() {
                return AddOutcome::Duplicate {
                    existing: last.id(),
                };
            }
        }

        if self.entries.len() >= self.capacity && self.entries.iter().all(|e| e.is_favorite()) {
            return AddOutcome::Rejected;
        }

        let id = entry.id();
        self.entries.push(entry);

        let evicted = if self.entries.len() > self.capacity {
            // never the entry just added
            self.evict_oldest_non_favorite(self.entries.len() - 1)
        } else {
            None
        };

        AddOutcome::Inserted { id, evicted }
    }

    /// Flip the favorite flag; returns the new state
    pub fn toggle_favorite(&mut self, id: EntryId) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id() == id)?;
        entry.toggle_favorite();
        Some(entry.is_favorite())
    }

    pub fn delete(&mut self, id: EntryId) -> Option<ClipboardEntry> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(index))
    }

    /// Remove every non-favorite entry; returns how many were removed
    pub fn clear(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.is_favorite());
        before - self.entries.len()
    }

    /// Remove every entry including favorites
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Display order: favorites first, then the rest, each newest first
    pub fn listing(&self) -> Vec<&ClipboardEntry> {
        let mut listing: Vec<&ClipboardEntry> = self.entries.iter().rev().collect();
        listing.sort_by_key(|e| (!e.is_favorite(), Reverse(e.timestamp())));
        listing
    }

    /// Case-insensitive substring search over the raw text, in display order.
    /// A blank query returns the full listing.
    pub fn search(&self, query: &str) -> Vec<&ClipboardEntry> {
        if query.trim().is_empty() {
            return self.listing();
        }
        let needle = query.to_lowercase();

        self.listing()
            .into_iter()
            .filter(|e| e.raw_text().to_lowercase().contains(&needle))
            .collect()
    }

    /// Resolve a full id or a unique id prefix
    pub fn resolve(&self, prefix: &str) -> Option<EntryId> {
        let prefix = prefix.trim().replace('-', "").to_lowercase();
        if prefix.is_empty() {
            return None;
        }

        let mut matches = self
            .entries
            .iter()
            .map(|e| e.id())
            .filter(|id| id.to_string().starts_with(&prefix));

        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Evict the oldest non-favorite among the first `limit` entries
    fn evict_oldest_non_favorite(&mut self, limit: usize) -> Option<ClipboardEntry> {
        let index = self.entries[..limit].iter().position(|e| !e.is_favorite())?;
        Some(self.entries.remove(index))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(text: &str) -> ClipboardEntry {
        ClipboardEntry::new(text, None)
    }

    fn entry_at(text: &str, secs: i64) -> ClipboardEntry {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        ClipboardEntry::captured_at(text, None, base + Duration::seconds(secs), 100)
    }

    fn texts(entries: &[&ClipboardEntry]) -> Vec<String> {
        entries.iter().map(|e| e.raw_text().to_string()).collect()
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        let mut history = History::new(10);
        let first = history.add(entry("hello"));
        let second = history.add(entry("hello"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().raw_text(), "hello");
        let AddOutcome::Inserted { id, .. } = first else {
            panic!("expected insert");
        };
        assert_eq!(second, AddOutcome::Duplicate { existing: id });
    }

    #[test]
    fn non_consecutive_duplicates_are_kept() {
        let mut history = History::new(10);
        history.add(entry("a"));
        history.add(entry("b"));
        history.add(entry("a"));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn dedup_compares_against_latest_after_delete() {
        let mut history = History::new(10);
        history.add(entry("a"));
        let AddOutcome::Inserted { id, .. } = history.add(entry("b")) else {
            panic!("expected insert");
        };
        history.delete(id);
        assert!(matches!(
            history.add(entry("a")),
            AddOutcome::Duplicate { .. }
        ));
    }

    #[test]
    fn eviction_removes_oldest_non_favorite() {
        let mut history = History::new(3);
        for text in ["one", "two", "three"] {
            history.add(entry(text));
        }

        let outcome = history.add(entry("four"));
        let AddOutcome::Inserted { evicted, .. } = outcome else {
            panic!("expected insert");
        };

        assert_eq!(evicted.unwrap().raw_text(), "one");
        assert_eq!(history.len(), 3);
        let raw: Vec<_> = history.entries().iter().map(|e| e.raw_text()).collect();
        assert_eq!(raw, ["two", "three", "four"]);
    }

    #[test]
    fn eviction_skips_favorites() {
        let mut history = History::new(3);
        history.add(entry("fav"));
        history.add(entry("two"));
        history.add(entry("three"));
        let fav = history.entries()[0].id();
        history.toggle_favorite(fav);

        let AddOutcome::Inserted { evicted, .. } = history.add(entry("four")) else {
            panic!("expected insert");
        };

        assert_eq!(evicted.unwrap().raw_text(), "two");
        assert!(history.get(fav).is_some());
    }

    #[test]
    fn full_of_favorites_rejects_new_entries() {
        let mut history = History::new(2);
        history.add(entry("a"));
        history.add(entry("b"));
        let ids: Vec<_> = history.entries().iter().map(|e| e.id()).collect();
        for id in ids {
            history.toggle_favorite(id);
        }

        assert_eq!(history.add(entry("c")), AddOutcome::Rejected);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut history = History::new(5);
        for i in 0..50 {
            history.add(entry(&format!("entry {}", i)));
            if i % 7 == 0 {
                let id = history.latest().unwrap().id();
                history.toggle_favorite(id);
            }
            assert!(history.len() <= history.capacity());
        }
    }

    #[test]
    fn toggle_favorite_twice_restores_state() {
        let mut history = History::new(5);
        history.add(entry("x"));
        let id = history.latest().unwrap().id();

        assert_eq!(history.toggle_favorite(id), Some(true));
        assert_eq!(history.toggle_favorite(id), Some(false));
        assert!(!history.get(id).unwrap().is_favorite());
    }

    #[test]
    fn toggle_and_delete_unknown_id_are_noops() {
        let mut history = History::new(5);
        history.add(entry("x"));
        assert_eq!(history.toggle_favorite(EntryId::new()), None);
        assert!(history.delete(EntryId::new()).is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn clear_keeps_favorites_in_order() {
        let mut history = History::new(10);
        for text in ["a", "b", "c", "d", "e"] {
            history.add(entry(text));
        }
        let ids: Vec<_> = history.entries().iter().map(|e| e.id()).collect();
        history.toggle_favorite(ids[3]);
        history.toggle_favorite(ids[1]);

        assert_eq!(history.clear(), 3);
        let remaining: Vec<_> = history.entries().iter().map(|e| e.id()).collect();
        assert_eq!(remaining, vec![ids[1], ids[3]]);
    }

    #[test]
    fn clear_all_removes_favorites_too() {
        let mut history = History::new(10);
        history.add(entry("a"));
        let id = history.latest().unwrap().id();
        history.toggle_favorite(id);

        assert_eq!(history.clear_all(), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn listing_puts_favorites_first_then_newest() {
        let mut history = History::new(10);
        history.add(entry_at("old", 0));
        history.add(entry_at("fav-old", 10));
        history.add(entry_at("mid", 20));
        history.add(entry_at("fav-new", 30));
        history.add(entry_at("new", 40));

        let ids: Vec<_> = history.entries().iter().map(|e| e.id()).collect();
        history.toggle_favorite(ids[1]);
        history.toggle_favorite(ids[3]);

        assert_eq!(
            texts(&history.listing()),
            ["fav-new", "fav-old", "new", "mid", "old"]
        );
    }

    #[test]
    fn listing_breaks_timestamp_ties_by_insertion() {
        let mut history = History::new(10);
        history.add(entry_at("first", 0));
        history.add(entry_at("second", 0));
        assert_eq!(texts(&history.listing()), ["second", "first"]);
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let mut history = History::new(10);
        history.add(entry_at("Hello world", 0));
        history.add(entry_at("unrelated", 10));
        history.add(entry_at("say HELLO", 20));
        let first = history.entries()[0].id();
        history.toggle_favorite(first);

        assert_eq!(
            texts(&history.search("hello")),
            ["Hello world", "say HELLO"]
        );
        assert!(history.search("absent").is_empty());
        assert_eq!(history.search("  ").len(), 3);
    }

    #[test]
    fn search_keeps_surrounding_spaces_of_the_query() {
        let mut history = History::new(10);
        history.add(entry_at("key value", 0));
        history.add(entry_at("keyvalue", 10));

        assert_eq!(texts(&history.search(" value")), ["key value"]);
        assert_eq!(texts(&history.search("key ")), ["key value"]);
        assert_eq!(history.search("value").len(), 2);
    }

    #[test]
    fn resolve_unique_prefix() {
        let mut history = History::new(10);
        history.add(entry("a"));
        let id = history.latest().unwrap().id();

        assert_eq!(history.resolve(&id.to_string()), Some(id));
        assert_eq!(history.resolve(&id.short()), Some(id));
        assert_eq!(history.resolve(""), None);
        assert_eq!(history.resolve("zzzz"), None);
    }

    #[test]
    fn from_entries_trims_non_favorites_over_capacity() {
        let mut source = History::new(10);
        for text in ["a", "b", "c", "d"] {
            source.add(entry(text));
        }
        let first = source.entries()[0].id();
        source.toggle_favorite(first);

        let restored = History::from_entries(source.entries().to_vec(), 2);
        let raw: Vec<_> = restored.entries().iter().map(|e| e.raw_text()).collect();
        assert_eq!(raw, ["a", "d"]);
    }

    #[test]
    fn capacity_is_at_least_one() {
        assert_eq!(History::new(0).capacity(), 1);
    }
}
