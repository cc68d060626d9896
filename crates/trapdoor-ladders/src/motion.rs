//! Vertical motion for agents standing inside a climbable trapdoor.
//!
//! The intent is picked fresh every tick from the control snapshot; nothing
//! carries over between ticks.

use tracing::trace;
use trapdoor_ladders_api::{Block, BlockPos, Entity, EntityControls, WorldAccessor};

use crate::classifier::classify;
use crate::error::ClimbError;

/// Upward motion applied while climbing (blocks per tick).
pub const CLIMB_SPEED: f64 = 0.04;

/// What the agent is trying to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimbIntent {
    Idle,
    Climbing,
    Descending,
}

impl ClimbIntent {
    /// Sneak wins over every movement key.
    pub fn from_controls(controls: &EntityControls) -> Self {
        if controls.sneak {
            ClimbIntent::Descending
        } else if controls.forward || controls.backward || controls.jump || controls.up {
            ClimbIntent::Climbing
        } else {
            ClimbIntent::Idle
        }
    }

    /// Vertical motion after this tick's adjustment.
    ///
    /// Climbing sets a fixed rate. Idle and descending only cancel a fall;
    /// upward motion is left alone.
    pub fn next_motion_y(self, motion_y: f64, climb_speed: f64) -> f64 {
        match self {
            ClimbIntent::Climbing => climb_speed,
            ClimbIntent::Idle | ClimbIntent::Descending => {
                if motion_y < 0.0 {
                    0.0
                } else {
                    motion_y
                }
            }
        }
    }
}

/// Adjust `entity`'s vertical motion if it stands in an open trapdoor next to a ladder.
///
/// Returns the intent that was applied, or `None` when the entity is not
/// eligible or the block is not a climbable trapdoor.
pub fn apply_climb_motion(
    world: &dyn WorldAccessor,
    entity: &mut dyn Entity,
    block: &Block,
    pos: BlockPos,
    climb_speed: f64,
) -> Result<Option<ClimbIntent>, ClimbError> {
    if !entity.can_climb() {
        return Ok(None);
    }
    let id = entity.id();
    let Some(agent) = entity.as_agent_mut() else {
        return Ok(None);
    };

    if !classify(world, block, pos)? {
        return Ok(None);
    }

    let intent = ClimbIntent::from_controls(&agent.controls()?);
    let motion = agent.motion_mut();
    let before = motion.y;
    motion.y = intent.next_motion_y(before, climb_speed);
    trace!(
        "entity {id} at {pos}: {intent:?}, motion.y {before} -> {}",
        motion.y
    );
    Ok(Some(intent))
}
