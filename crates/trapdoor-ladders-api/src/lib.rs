//! Host API: blocks, world lookups, entities, and interception points for mod authors.
//!
//! This crate defines the surface a game engine exposes to block-behavior mods.
//! It has no dependency on any engine or on any mod built against it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Positions ───────────────────────────────────────────────────────────────

/// Discrete block position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The position one block above, or `None` at the top of the addressable range.
    pub fn up(self) -> Option<Self> {
        Some(Self {
            y: self.y.checked_add(1)?,
            ..self
        })
    }

    /// The position one block below, or `None` at the bottom of the addressable range.
    pub fn down(self) -> Option<Self> {
        Some(Self {
            y: self.y.checked_sub(1)?,
            ..self
        })
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ─── Blocks ──────────────────────────────────────────────────────────────────

/// Default domain for block codes written without one.
pub const DEFAULT_DOMAIN: &str = "game";

/// Namespaced block identifier, e.g. `game:ladder-wood-north`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockCode {
    pub domain: String,
    pub path: String,
}

impl BlockCode {
    /// Parse `"domain:path"`. A code without a colon lands in [`DEFAULT_DOMAIN`].
    pub fn parse(code: &str) -> Self {
        match code.split_once(':') {
            Some((domain, path)) => Self {
                domain: domain.to_string(),
                path: path.to_string(),
            },
            None => Self {
                domain: DEFAULT_DOMAIN.to_string(),
                path: code.to_string(),
            },
        }
    }
}

impl fmt::Display for BlockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.path)
    }
}

/// Static block type as registered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// `None` for placeholder blocks the host never assigned a code to.
    pub code: Option<BlockCode>,
    /// The block's own climbable attribute (ladders, vines).
    pub climbable: bool,
}

impl Block {
    pub fn new(code: &str, climbable: bool) -> Self {
        Self {
            code: Some(BlockCode::parse(code)),
            climbable,
        }
    }

    /// Code path, or `None` if the block has no code or an empty path.
    pub fn path(&self) -> Option<&str> {
        self.code
            .as_ref()
            .map(|c| c.path.as_str())
            .filter(|p| !p.is_empty())
    }
}

// ─── Block entities ──────────────────────────────────────────────────────────

/// Open/closed state held by a trapdoor's block entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapDoorState {
    pub opened: bool,
}

/// A behavior attached to a block entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEntityBehavior {
    TrapDoor(TrapDoorState),
    Other { name: String },
}

/// Per-position dynamic state attached to certain blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntity {
    pub class: String,
    pub behaviors: Vec<BlockEntityBehavior>,
}

impl BlockEntity {
    /// A generic block entity carrying a single trapdoor behavior.
    pub fn with_trapdoor(opened: bool) -> Self {
        Self {
            class: "Generic".to_string(),
            behaviors: vec![BlockEntityBehavior::TrapDoor(TrapDoorState { opened })],
        }
    }

    /// The first trapdoor behavior, if this block entity has one.
    pub fn trapdoor(&self) -> Option<&TrapDoorState> {
        self.behaviors.iter().find_map(|b| match b {
            BlockEntityBehavior::TrapDoor(state) => Some(state),
            BlockEntityBehavior::Other { .. } => None,
        })
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure reported by the host while answering a lookup.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("chunk not loaded at {0}")]
    ChunkNotLoaded(BlockPos),

    #[error("position out of world bounds: {0}")]
    OutOfBounds(BlockPos),

    #[error("entity {0} is no longer present")]
    EntityGone(u64),

    #[error("{0}")]
    Other(String),
}

// ─── World ───────────────────────────────────────────────────────────────────

/// Read-only view of the world, keyed by block position.
pub trait WorldAccessor {
    /// Block at `pos`. `Ok(None)` means the host has nothing registered there.
    fn block(&self, pos: BlockPos) -> Result<Option<Block>, HostError>;

    /// Block entity at `pos`, if one is attached.
    fn block_entity(&self, pos: BlockPos) -> Result<Option<BlockEntity>, HostError>;
}

// ─── Entities ────────────────────────────────────────────────────────────────

/// Snapshot of an agent's directional controls for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityControls {
    #[serde(default)]
    pub forward: bool,
    #[serde(default)]
    pub backward: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub sneak: bool,
}

/// Per-tick motion vector, in blocks per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Motion {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Any simulated entity.
pub trait Entity {
    fn id(&self) -> u64;

    /// Whether the entity's type may climb at all.
    fn can_climb(&self) -> bool;

    /// Access to directional controls and motion. `None` for passive physics objects.
    fn as_agent_mut(&mut self) -> Option<&mut dyn Agent> {
        None
    }
}

/// An entity driven by directional control input.
pub trait Agent {
    fn controls(&self) -> Result<EntityControls, HostError>;

    /// Motion on the authoritative side for this tick.
    fn motion_mut(&mut self) -> &mut Motion;
}

// ─── Host API ────────────────────────────────────────────────────────────────

/// Log level for mod diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// Handle to the running host, passed to mods on every call.
pub trait HostApi {
    /// The current world, if one is loaded.
    fn world(&self) -> Option<&dyn WorldAccessor>;

    /// Diagnostic sink for mod messages.
    fn log(&self, level: LogLevel, message: &str);
}

// ─── Interception points ─────────────────────────────────────────────────────

/// Postfix extensions to the host's block methods.
///
/// Each method runs after the host's own logic for the same call.
pub trait BlockPatch: Send {
    /// Extends the host's climbability query. `climbable` is the verdict so far.
    fn is_climbable(
        &self,
        api: &dyn HostApi,
        block: &Block,
        pos: BlockPos,
        climbable: bool,
    ) -> bool {
        let _ = (api, block, pos);
        climbable
    }

    /// Called once per tick for every entity standing inside `block` at `pos`.
    fn on_entity_inside(
        &self,
        api: &dyn HostApi,
        world: &dyn WorldAccessor,
        entity: &mut dyn Entity,
        block: &Block,
        pos: BlockPos,
    ) {
        let _ = (api, world, entity, block, pos);
    }
}

/// Where mods install and remove their patches.
pub trait PatchRegistry {
    fn install_patch(&mut self, owner: &str, patch: Box<dyn BlockPatch>);

    /// Remove every patch installed under `owner`. Returns how many were removed.
    fn remove_patches(&mut self, owner: &str) -> usize;
}

// ─── Mod system ──────────────────────────────────────────────────────────────

/// Metadata about a mod.
#[derive(Debug, Clone)]
pub struct ModInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// A mod loaded by the host.
pub trait ModSystem: Send {
    fn info(&self) -> ModInfo;

    /// Called once the host is up. Install patches here.
    fn start(&mut self, api: &dyn HostApi, patches: &mut dyn PatchRegistry);

    /// Called on shutdown or unload. Remove everything `start` installed.
    fn dispose(&mut self, api: &dyn HostApi, patches: &mut dyn PatchRegistry) {
        let _ = (api, patches);
    }

    /// Default config as JSON. If `Some`, the host offers it for overrides.
    fn default_config(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called with the effective config before `start`.
    fn load_config(&mut self, _config: serde_json::Value) {}
}

// ─── Tests ───────────────────────────────────────────────────────────────────
