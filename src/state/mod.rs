//! State module for tracking crawl progress
//!
//! This module provides the per-URL state machine used by the frontier.
//!
//! # Components
//!
//! - `UrlState`: Tracks whether a canonical URL is waiting in the queue or has
//!   already been handed to a worker. A URL with no recorded state is unseen.

mod url_state;

pub use url_state::UrlState;
