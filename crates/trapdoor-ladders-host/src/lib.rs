//! Reference host integration: mod lifecycle, patch dispatch, and an in-memory world.

pub mod manager;
pub mod snapshot;

pub use manager::{ModManager, PatchTable};
pub use snapshot::{SnapshotHost, WorldSnapshot};
