//! Frontier for a single crawl run
//!
//! This module handles:
//! - Priority queue management for URLs to crawl (depth, then tier, then
//!   insertion order)
//! - The visited map of canonical URLs and their [`UrlState`]
//! - Depth bounding
//! - Wave boundaries: a wave only hands out entries of the depth it started at
//!
//! All of it sits behind one `Mutex`, so workers only ever call
//! [`Frontier::offer`] and [`Frontier::pop_ready`].

use crate::crawler::links::priority_tier;
use crate::state::UrlState;
use crate::url::{canonicalize, canonicalize_str, parse_http_url};
use crate::CrawldexError;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// A URL queued for fetching with its traversal information
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// Canonical URL to fetch
    pub url: String,

    /// Link distance from the seed (the seed is 0)
    pub depth: u32,

    /// Priority tier the URL was enqueued with (lower is fetched first)
    pub priority: u8,

    /// Insertion counter, keeps same-tier siblings in discovery order
    seq: u64,
}

// BinaryHeap is a max-heap: reverse the comparison so the shallowest,
// highest-priority, earliest-inserted entry is popped first
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .depth
            .cmp(&self.depth)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

#[derive(Debug, Default)]
struct FrontierInner {
    /// Canonical URL -> state; absence means unseen
    states: HashMap<String, UrlState>,

    /// Queued entries
    queue: BinaryHeap<FrontierEntry>,

    /// Depth of the wave in progress, if any
    wave_depth: Option<u32>,

    next_seq: u64,
}

impl FrontierInner {
    fn enqueue(&mut self, url: String, depth: u32, priority: u8) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.states.insert(url.clone(), UrlState::Queued);
        self.queue.push(FrontierEntry {
            url,
            depth,
            priority,
            seq,
        });
    }

    fn mark_dispatched(&mut self, url: &str) -> Result<(), CrawldexError> {
        let to = UrlState::Dispatched;
        match self.states.get_mut(url) {
            Some(state) if state.can_transition_to(to) => {
                *state = to;
                Ok(())
            }
            Some(state) => Err(CrawldexError::InvalidTransition { from: *state, to }),
            None => Err(CrawldexError::InvalidTransition {
                from: UrlState::Dispatched,
                to,
            }),
        }
    }
}

/// The crawl frontier: visited map plus depth-bounded priority queue
///
/// A URL is handed out by [`pop_ready`](Self::pop_ready) at most once per
/// frontier; a frontier lives for exactly one crawl run.
#[derive(Debug)]
pub struct Frontier {
    max_depth: u32,

    /// Maximum entries returned by a single `pop_ready` call
    batch_limit: usize,

    inner: Mutex<FrontierInner>,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Entries deeper than this are discarded by `offer`
    /// * `batch_limit` - Upper bound on one `pop_ready` batch (the worker count)
    pub fn new(max_depth: u32, batch_limit: usize) -> Self {
        Self {
            max_depth,
            batch_limit: batch_limit.max(1),
            inner: Mutex::new(FrontierInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts the seed URL at depth 0
    ///
    /// # Returns
    ///
    /// The canonical form of the seed, or an error if it is not an absolute
    /// http(s) URL with a host.
    pub fn seed(&self, url: &str) -> Result<String, CrawldexError> {
        let parsed = parse_http_url(url)?;
        let canonical = canonicalize(&parsed);

        let mut inner = self.lock();
        if !inner.states.contains_key(&canonical) {
            inner.enqueue(canonical.clone(), 0, priority_tier(parsed.path()));
        }

        Ok(canonical)
    }

    /// Offers a discovered URL to the frontier
    ///
    /// The URL is discarded silently if `depth` exceeds the maximum depth, if
    /// it cannot be parsed, or if its canonical form is already queued or
    /// dispatched.
    ///
    /// # Returns
    ///
    /// `true` if the URL was queued
    pub fn offer(&self, url: &str, depth: u32, priority: u8) -> bool {
        if depth > self.max_depth {
            tracing::debug!("Pruned (depth {} > {}): {}", depth, self.max_depth, url);
            return false;
        }

        let canonical = match canonicalize_str(url) {
            Ok(canonical) => canonical,
            Err(e) => {
                tracing::debug!("Pruned (invalid URL {}): {}", e, url);
                return false;
            }
        };

        let mut inner = self.lock();
        if inner.states.contains_key(&canonical) {
            tracing::trace!("Pruned (already seen): {}", canonical);
            return false;
        }

        inner.enqueue(canonical, depth, priority);
        true
    }

    /// Starts a new wave at the depth of the head of the queue
    ///
    /// # Returns
    ///
    /// * `Some(depth)` - The depth of the new wave
    /// * `None` - No queued entries remain
    pub fn begin_wave(&self) -> Option<u32> {
        let mut inner = self.lock();
        let depth = inner.queue.peek().map(|entry| entry.depth);
        inner.wave_depth = depth;
        depth
    }

    /// Returns the next batch of entries belonging to the current wave
    ///
    /// Entries are returned in queue order, at most `batch_limit` of them,
    /// and are marked dispatched before this returns. Entries offered during
    /// the wave (one level deeper) are held back for the next wave. Returns
    /// an empty batch when the wave is drained or no wave was begun.
    pub fn pop_ready(&self) -> Vec<FrontierEntry> {
        let mut inner = self.lock();
        let Some(wave_depth) = inner.wave_depth else {
            return Vec::new();
        };

        let mut batch = Vec::new();
        while batch.len() < self.batch_limit {
            match inner.queue.peek() {
                Some(head) if head.depth <= wave_depth => {}
                _ => break,
            }

            let Some(entry) = inner.queue.pop() else {
                break;
            };

            match inner.mark_dispatched(&entry.url) {
                Ok(()) => batch.push(entry),
                Err(e) => tracing::warn!("Skipping {}: {}", entry.url, e),
            }
        }

        batch
    }

    /// Returns true when no queued entries remain
    pub fn is_exhausted(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Number of queued entries
    pub fn queued_len(&self) -> usize {
        self.lock()
            .states
            .values()
            .filter(|state| state.is_pending())
            .count()
    }

    /// Number of URLs handed out so far
    pub fn dispatched_count(&self) -> usize {
        self.lock()
            .states
            .values()
            .filter(|state| state.is_terminal())
            .count()
    }

    /// State of a URL, canonicalized first; `None` means unseen
    pub fn state_of(&self, url: &str) -> Option<UrlState> {
        let canonical = canonicalize_str(url).ok()?;
        self.lock().states.get(&canonical).copied()
    }
}
