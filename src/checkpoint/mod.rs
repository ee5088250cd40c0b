//! Checkpoint persistence
//!
//! A crawl periodically writes its results and a bounded prefix of the
//! outstanding frontier to a JSON file. The file is overwritten on every save.
//! On startup the file can be loaded again to resume an interrupted run.
//!
//! Persistence failures are never fatal: a failed write is logged and the
//! crawl continues, and a missing or corrupt file simply means there is no
//! previous state.

mod store;
mod types;

pub use store::{load_checkpoint, read_checkpoint, save_checkpoint, Checkpointer};
pub use types::{CheckpointMetadata, CheckpointState};
