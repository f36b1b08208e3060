//! Priority registry for filter management.
//!
//! Filters are kept in an immutable [`Snapshot`], sorted by ascending
//! priority with ties in registration order. Registering builds a new
//! snapshot next to the current one and swaps it in, so a snapshot handed to
//! an in-flight `apply` never changes under it.

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::{fmt, sync::Arc};

/// Metadata for a registered filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registration {
    /// Priority (lower = executed first). Default is 0.
    pub priority: i32,
    /// Optional label, used in logs.
    pub label: Option<&'static str>,
}

impl Registration {
    /// Create default metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set label.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }
}

impl From<i32> for Registration {
    fn from(priority: i32) -> Self {
        Self::new().with_priority(priority)
    }
}

/// A filter with its registration metadata.
pub struct PriorityEntry<H: ?Sized> {
    filter: Arc<H>,
    registration: Registration,
}

impl<H: ?Sized> PriorityEntry<H> {
    /// Create a new entry.
    pub fn new(filter: Arc<H>, registration: Registration) -> Self {
        Self {
            filter,
            registration,
        }
    }

    /// Get the filter.
    pub fn filter(&self) -> &H {
        &self.filter
    }

    /// Get the metadata.
    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    /// Get the priority.
    pub fn priority(&self) -> i32 {
        self.registration.priority
    }

    /// Get the label, if any.
    pub fn label(&self) -> Option<&'static str> {
        self.registration.label
    }
}

impl<H: ?Sized> Clone for PriorityEntry<H> {
    fn clone(&self) -> Self {
        Self {
            filter: Arc::clone(&self.filter),
            registration: self.registration,
        }
    }
}

impl<H: ?Sized> fmt::Debug for PriorityEntry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityEntry")
            .field("priority", &self.registration.priority)
            .field("label", &self.registration.label)
            .finish_non_exhaustive()
    }
}

/// An immutable, priority-ordered view of a registry.
///
/// Cloning is O(1); entries share their filters with every other snapshot.
pub struct Snapshot<H: ?Sized> {
    entries: Arc<[PriorityEntry<H>]>,
}

impl<H: ?Sized> Snapshot<H> {
    /// An empty snapshot.
    pub fn empty() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }

    /// Build a new snapshot holding every entry of `self` plus `entry`.
    ///
    /// `entry` goes before the first entry whose priority is strictly
    /// greater, after any entries of equal priority. Returns the new snapshot
    /// and the index `entry` landed at; `self` is left untouched.
    pub fn insert(&self, entry: PriorityEntry<H>) -> (Self, usize) {
        let priority = entry.priority();
        let index = self.entries.partition_point(|e| e.priority() <= priority);

        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend_from_slice(&self.entries[..index]);
        entries.push(entry);
        entries.extend_from_slice(&self.entries[index..]);

        (
            Self {
                entries: entries.into(),
            },
            index,
        )
    }

    /// Iterate over entries in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, PriorityEntry<H>> {
        self.entries.iter()
    }

    /// Priorities in execution order.
    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(PriorityEntry::priority)
    }

    /// Get all entries.
    pub fn entries(&self) -> &[PriorityEntry<H>] {
        &self.entries
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether both snapshots are the same version.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<H: ?Sized> Clone for Snapshot<H> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<H: ?Sized> Default for Snapshot<H> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<H: ?Sized> fmt::Debug for Snapshot<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<'a, H: ?Sized> IntoIterator for &'a Snapshot<H> {
    type Item = &'a PriorityEntry<H>;
    type IntoIter = std::slice::Iter<'a, PriorityEntry<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A thread-safe, copy-on-write registry of filters.
///
/// Writers are serialized and hold exclusive access only to swap in the new
/// snapshot; readers hold shared access only to clone the current one.
pub struct PriorityRegistry<H: ?Sized> {
    current: RwLock<Snapshot<H>>,
}

impl<H: ?Sized> PriorityRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Snapshot::empty()),
        }
    }

    /// Add a filter. Returns the index it was inserted at.
    pub fn add(&self, filter: Arc<H>, registration: Registration) -> usize {
        // Upgradable reads exclude other writers but not readers.
        let current = self.current.upgradable_read();
        let (next, index) = current.insert(PriorityEntry::new(filter, registration));

        let mut current = RwLockUpgradableReadGuard::upgrade(current);
        *current = next;
        index
    }

    /// Take the current snapshot.
    pub fn snapshot(&self) -> Snapshot<H> {
        self.current.read().clone()
    }

    /// Get the number of registered filters.
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Check if no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}

impl<H: ?Sized> Default for PriorityRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for PriorityRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityRegistry")
            .field("entries", &*self.current.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(snapshot: &Snapshot<str>) -> Vec<&str> {
        snapshot.iter().map(PriorityEntry::filter).collect()
    }

    #[test]
    fn test_sorted_by_priority() {
        let registry = PriorityRegistry::<str>::new();
        registry.add(Arc::from("c"), Registration::from(10));
        registry.add(Arc::from("a"), Registration::from(-5));
        registry.add(Arc::from("b"), Registration::from(0));

        let snapshot = registry.snapshot();
        assert_eq!(labels(&snapshot), ["a", "b", "c"]);
        assert_eq!(snapshot.priorities().collect::<Vec<_>>(), [-5, 0, 10]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let registry = PriorityRegistry::<str>::new();
        assert_eq!(registry.add(Arc::from("a"), Registration::from(0)), 0);
        assert_eq!(registry.add(Arc::from("c"), Registration::from(1)), 1);
        assert_eq!(registry.add(Arc::from("b"), Registration::from(0)), 1);
        assert_eq!(registry.add(Arc::from("d"), Registration::from(1)), 3);

        assert_eq!(labels(&registry.snapshot()), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_old_snapshot_is_unaffected() {
        let registry = PriorityRegistry::<str>::new();
        registry.add(Arc::from("a"), Registration::default());

        let before = registry.snapshot();
        registry.add(Arc::from("b"), Registration::from(-1));
        let after = registry.snapshot();

        assert_eq!(labels(&before), ["a"]);
        assert_eq!(labels(&after), ["b", "a"]);
        assert!(!before.ptr_eq(&after));
    }

    #[test]
    fn test_snapshot_shares_filters() {
        let filter: Arc<str> = Arc::from("shared");
        let registry = PriorityRegistry::<str>::new();
        registry.add(Arc::clone(&filter), Registration::default());
        registry.add(Arc::from("other"), Registration::from(1));

        let snapshot = registry.snapshot();
        assert!(std::ptr::eq(snapshot.entries()[0].filter(), &*filter));
        assert!(registry.snapshot().ptr_eq(&snapshot));
    }

    #[test]
    fn test_insert_is_pure() {
        let empty = Snapshot::<str>::empty();
        let (one, index) = empty.insert(PriorityEntry::new(Arc::from("x"), Registration::new()));

        assert_eq!(index, 0);
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_registration_builder() {
        let registration = Registration::new().with_priority(-3).with_label("auth");
        assert_eq!(registration.priority, -3);
        assert_eq!(registration.label, Some("auth"));
        assert_eq!(Registration::new().priority, 0);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let registry = PriorityRegistry::<str>::new();

        std::thread::scope(|s| {
            for t in 0..8 {
                let registry = &registry;
                s.spawn(move || {
                    for i in 0..50 {
                        registry.add(Arc::from("x"), Registration::from((t * 50 + i) % 7));
                    }
                });
            }
        });

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 400);
        let priorities: Vec<_> = snapshot.priorities().collect();
        assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
    }
}
