//! Crawl state management
//!
//! This module contains the passive data structures the scheduler drives:
//! - `FrontierQueue` and `FrontierItem` for pending work
//! - `VisitedSet` for dispatch deduplication
//! - `CrawlResult` for completed items

mod frontier;
mod result;

pub use frontier::{FrontierItem, FrontierQueue, VisitedSet};
pub use result::{is_hypertext, CrawlResult, CONTENT_TYPE_ERROR, CONTENT_TYPE_UNKNOWN};
