use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be crawled, with its distance from the start URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrontierItem {
    /// The normalized URL
    pub url: String,

    /// Number of link hops from the start URL (the seed has depth 0)
    pub depth: u32,
}

impl FrontierItem {
    /// Creates a new frontier item
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }

    /// Creates the depth-0 item a crawl starts from
    pub fn seed(url: impl Into<String>) -> Self {
        Self::new(url, 0)
    }

    /// Creates an item for a link discovered while processing `self`
    ///
    /// Returns `None` when `self` is already at the deepest representable
    /// depth.
    pub fn child(&self, url: impl Into<String>) -> Option<Self> {
        let depth = self.depth.checked_add(1)?;
        Some(Self::new(url, depth))
    }
}

/// FIFO work list of URLs awaiting dispatch
///
/// Duplicate entries are allowed: two pages completing close together may
/// both enqueue the same not-yet-dispatched URL. The visited check at
/// dispatch time resolves them.
#[derive(Debug, Clone, Default)]
pub struct FrontierQueue {
    items: VecDeque<FrontierItem>,
}

impl FrontierQueue {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item at the back of the queue
    pub fn push(&mut self, item: FrontierItem) {
        self.items.push_back(item);
    }

    /// Removes the earliest-inserted item
    pub fn pop(&mut self) -> Option<FrontierItem> {
        self.items.pop_front()
    }

    /// Returns the number of queued items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keeps only the items for which `keep` returns true, preserving order
    pub fn retain(&mut self, keep: impl FnMut(&FrontierItem) -> bool) {
        self.items.retain(keep);
    }

    /// Copies at most `limit` items from the front of the queue
    ///
    /// Used for checkpoints so the persisted file stays bounded even when the
    /// live frontier is large.
    pub fn snapshot(&self, limit: usize) -> Vec<FrontierItem> {
        self.items.iter().take(limit).cloned().collect()
    }
}

impl From<Vec<FrontierItem>> for FrontierQueue {
    fn from(items: Vec<FrontierItem>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

/// Append-only set of URLs that have been dispatched
///
/// A URL is inserted when it is taken off the frontier for dispatch, before
/// its fetch starts. Entries are never removed during a run.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the URL has already been dispatched
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Marks a URL as dispatched, returning `false` if it already was
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    /// Returns the number of visited URLs
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns whether nothing has been visited yet
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = FrontierQueue::new();
        queue.push(FrontierItem::new("https://example.com/a", 1));
        queue.push(FrontierItem::new("https://example.com/b", 1));
        queue.push(FrontierItem::new("https://example.com/c", 2));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().unwrap().url, "https://example.com/a");
        assert_eq!(queue.pop().unwrap().url, "https://example.com/b");
        assert_eq!(queue.pop().unwrap().url, "https://example.com/c");
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_allows_duplicates() {
        let mut queue = FrontierQueue::new();
        queue.push(FrontierItem::new("https://example.com/a", 1));
        queue.push(FrontierItem::new("https://example.com/a", 1));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_snapshot_is_bounded_prefix() {
        let queue: FrontierQueue = (0..10)
            .map(|i| FrontierItem::new(format!("https://example.com/{}", i), 1))
            .collect::<Vec<_>>()
            .into();

        let snapshot = queue.snapshot(3);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].url, "https://example.com/0");
        assert_eq!(snapshot[2].url, "https://example.com/2");
        // Snapshot does not consume the queue
        assert_eq!(queue.len(), 10);

        assert_eq!(queue.snapshot(50).len(), 10);
    }

    #[test]
    fn test_child_depth() {
        let seed = FrontierItem::seed("https://example.com/");
        assert_eq!(seed.depth, 0);

        let child = seed.child("https://example.com/a").unwrap();
        assert_eq!(child.depth, 1);
        assert_eq!(child.child("https://example.com/b").unwrap().depth, 2);
    }

    #[test]
    fn test_child_of_deepest_item() {
        let deepest = FrontierItem::new("https://example.com/deep", u32::MAX);
        assert!(deepest.child("https://example.com/deeper").is_none());
    }

    #[test]
    fn test_retain_keeps_order() {
        let mut queue: FrontierQueue = (0..5)
            .map(|i| FrontierItem::new(format!("https://example.com/{}", i), i))
            .collect::<Vec<_>>()
            .into();

        queue.retain(|item| item.depth % 2 == 0);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().unwrap().url, "https://example.com/0");
        assert_eq!(queue.pop().unwrap().url, "https://example.com/2");
    }

    #[test]
    fn test_visited_insert_and_contains() {
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());

        assert!(visited.insert("https://example.com/"));
        assert!(!visited.insert("https://example.com/"));
        assert!(visited.contains("https://example.com/"));
        assert!(!visited.contains("https://example.com/other"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_visited_from_iter() {
        let visited: VisitedSet = ["https://example.com/a", "https://example.com/b"]
            .into_iter()
            .collect();
        assert_eq!(visited.len(), 2);
        assert!(visited.contains("https://example.com/b"));
    }
}
