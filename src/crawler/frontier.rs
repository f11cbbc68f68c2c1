//! Frontier queue and visited set
//!
//! This module handles:
//! - First-in-first-out ordering of URLs awaiting a visit
//! - Deduplication at enqueue time, against both the queue and the visited set
//! - The monotonically growing set of visited URLs

use std::collections::{HashSet, VecDeque};

/// URLs already fetched in this run, successfully or not
///
/// Grows monotonically and never shrinks.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` visited; returns false if it already was
    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Ordered queue of URLs awaiting a visit
///
/// Insertion order is discovery order. A URL is admitted only if it is
/// neither visited nor already waiting, so the queue never holds duplicates.
/// Membership is tracked in a side set to keep both checks O(1).
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` to the tail unless it is visited or already queued
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: &str, visited: &VisitedSet) -> bool {
        if visited.contains(url) || self.queued.contains(url) {
            return false;
        }

        self.queued.insert(url.to_string());
        self.queue.push_back(url.to_string());
        true
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Waiting URLs in dequeue order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}
