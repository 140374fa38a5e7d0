//! Per-domain frontier and visited set
//!
//! Both live for exactly one domain crawl. URLs are compared by their
//! serialized form.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// URLs pending visit, served first-in first-out
///
/// A URL is queued at most once while pending; once popped it may be pushed
/// again, and the [`VisitedSet`] is what keeps it from being fetched twice.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    pending: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn with_seed(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Queues a URL; returns false when it is already pending
    pub fn push(&mut self, url: Url) -> bool {
        if !self.pending.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Takes the oldest pending URL
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.pending.remove(url.as_str());
        Some(url)
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.pending.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// URLs already taken from the frontier during one domain crawl
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Marks a URL visited; returns false if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
