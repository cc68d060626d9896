//! In-memory world and host handle.

use std::collections::{HashMap, HashSet};

use trapdoor_ladders_api::{
    Block, BlockEntity, BlockPos, HostApi, HostError, LogLevel, WorldAccessor,
};
use tracing::{debug, error, info, warn};

/// Block and block-entity state keyed by position.
///
/// Positions marked unloaded answer every lookup with [`HostError::ChunkNotLoaded`].
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    blocks: HashMap<BlockPos, Block>,
    block_entities: HashMap<BlockPos, BlockEntity>,
    unloaded: HashSet<BlockPos>,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_block(&mut self, pos: BlockPos, block: Block) -> &mut Self {
        self.blocks.insert(pos, block);
        self
    }

    /// Remove the block and any block entity at `pos`.
    pub fn remove_block(&mut self, pos: BlockPos) -> Option<Block> {
        self.block_entities.remove(&pos);
        self.blocks.remove(&pos)
    }

    pub fn set_block_entity(&mut self, pos: BlockPos, be: BlockEntity) -> &mut Self {
        self.block_entities.insert(pos, be);
        self
    }

    pub fn block_entity_mut(&mut self, pos: BlockPos) -> Option<&mut BlockEntity> {
        self.block_entities.get_mut(&pos)
    }

    pub fn mark_unloaded(&mut self, pos: BlockPos) -> &mut Self {
        self.unloaded.insert(pos);
        self
    }

    pub fn mark_loaded(&mut self, pos: BlockPos) -> &mut Self {
        self.unloaded.remove(&pos);
        self
    }

    fn check_loaded(&self, pos: BlockPos) -> Result<(), HostError> {
        if self.unloaded.contains(&pos) {
            return Err(HostError::ChunkNotLoaded(pos));
        }
        Ok(())
    }
}

impl WorldAccessor for WorldSnapshot {
    fn block(&self, pos: BlockPos) -> Result<Option<Block>, HostError> {
        self.check_loaded(pos)?;
        Ok(self.blocks.get(&pos).cloned())
    }

    fn block_entity(&self, pos: BlockPos) -> Result<Option<BlockEntity>, HostError> {
        self.check_loaded(pos)?;
        Ok(self.block_entities.get(&pos).cloned())
    }
}

/// `HostApi` over an optional [`WorldSnapshot`], logging through `tracing`.
#[derive(Debug, Default)]
pub struct SnapshotHost {
    world: Option<WorldSnapshot>,
}

impl SnapshotHost {
    /// A host with no world loaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_world(world: WorldSnapshot) -> Self {
        Self { world: Some(world) }
    }

    pub fn snapshot(&self) -> Option<&WorldSnapshot> {
        self.world.as_ref()
    }

    pub fn snapshot_mut(&mut self) -> Option<&mut WorldSnapshot> {
        self.world.as_mut()
    }

    pub fn unload_world(&mut self) -> Option<WorldSnapshot> {
        self.world.take()
    }
}

impl HostApi for SnapshotHost {
    fn world(&self) -> Option<&dyn WorldAccessor> {
        self.world.as_ref().map(|w| w as &dyn WorldAccessor)
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => info!("[mod] {message}"),
            LogLevel::Warn => warn!("[mod] {message}"),
            LogLevel::Error => error!("[mod] {message}"),
            LogLevel::Debug => debug!("[mod] {message}"),
        }
    }
}
