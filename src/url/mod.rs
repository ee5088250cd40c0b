//! URL handling module for Origin-Walker
//!
//! This module provides relative URL resolution, fragment stripping and the
//! same-origin check that keeps a crawl on a single host.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{display_domain, same_origin};
pub use normalize::{normalize_start_url, normalize_url};
