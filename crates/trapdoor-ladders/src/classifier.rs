//! Open-trapdoor-next-to-ladder classification.
//!
//! A trapdoor counts as climbable only while open and only when a true ladder
//! sits directly above or below it. Trapdoors never count as ladders, so a
//! stack of open trapdoors does not chain climbability upward.

use tracing::debug;
use trapdoor_ladders_api::{Block, BlockPos, WorldAccessor};

use crate::error::ClimbError;

/// Substring marking a block code as a trapdoor.
pub const TRAPDOOR_MARKER: &str = "trapdoor";

/// Substring marking a block code as a ladder.
pub const LADDER_MARKER: &str = "ladder";

/// Whether `block` is a real ladder: named like one, not a trapdoor, and climbable on its own.
pub fn is_ladder_block(block: &Block) -> bool {
    let Some(path) = block.path() else {
        return false;
    };
    if path.contains(TRAPDOOR_MARKER) {
        return false;
    }
    path.contains(LADDER_MARKER) && block.climbable
}

fn is_trapdoor_block(block: &Block) -> bool {
    block
        .path()
        .is_some_and(|path| path.contains(TRAPDOOR_MARKER))
}

/// Fallible classification. Host lookup failures surface as `Err`.
pub fn classify(
    world: &dyn WorldAccessor,
    block: &Block,
    pos: BlockPos,
) -> Result<bool, ClimbError> {
    if !is_trapdoor_block(block) {
        return Ok(false);
    }

    let opened = world
        .block_entity(pos)?
        .and_then(|be| be.trapdoor().map(|state| state.opened))
        .unwrap_or(false);
    if !opened {
        return Ok(false);
    }

    for neighbour in [pos.up(), pos.down()].into_iter().flatten() {
        if world
            .block(neighbour)?
            .is_some_and(|b| is_ladder_block(&b))
        {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Whether `pos` holds an open trapdoor with a ladder directly above or below.
///
/// Lookup failures count as "not climbable" and are logged at debug level.
pub fn is_open_trapdoor_with_ladder(
    world: &dyn WorldAccessor,
    block: &Block,
    pos: BlockPos,
) -> bool {
    match classify(world, block, pos) {
        Ok(verdict) => verdict,
        Err(e) => {
            debug!("trapdoor classification at {pos} failed: {e}");
            false
        }
    }
}
