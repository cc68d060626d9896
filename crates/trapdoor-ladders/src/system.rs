//! Mod system: installs the trapdoor climb patch into a host.

use tracing::{info, warn};
use trapdoor_ladders_api::{
    Block, BlockPatch, BlockPos, Entity, HostApi, LogLevel, ModInfo, ModSystem, PatchRegistry,
    WorldAccessor,
};

use crate::config::TrapdoorLaddersConfig;
use crate::error::ClimbError;
use crate::{classifier, motion};

/// Owner id under which the climb patch is installed.
pub const PATCH_OWNER: &str = "com.trapdoorladders.patches";

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Postfixes for the host's climbability query and entity-inside callback.
#[derive(Debug, Clone)]
pub struct TrapdoorClimbPatch {
    config: TrapdoorLaddersConfig,
}

impl TrapdoorClimbPatch {
    pub fn new(config: TrapdoorLaddersConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrapdoorLaddersConfig {
        &self.config
    }
}

impl BlockPatch for TrapdoorClimbPatch {
    fn is_climbable(
        &self,
        api: &dyn HostApi,
        block: &Block,
        pos: BlockPos,
        climbable: bool,
    ) -> bool {
        if climbable {
            return true;
        }

        let result = api
            .world()
            .ok_or(ClimbError::MissingWorld)
            .and_then(|world| classifier::classify(world, block, pos));

        match result {
            Ok(verdict) => verdict,
            Err(e) => {
                api.log(
                    LogLevel::Debug,
                    &format!("Trapdoor Ladders: climbable check at {pos} failed: {e}"),
                );
                false
            }
        }
    }

    fn on_entity_inside(
        &self,
        api: &dyn HostApi,
        world: &dyn WorldAccessor,
        entity: &mut dyn Entity,
        block: &Block,
        pos: BlockPos,
    ) {
        let id = entity.id();
        if let Err(e) =
            motion::apply_climb_motion(world, entity, block, pos, self.config.climb_speed)
        {
            api.log(
                LogLevel::Debug,
                &format!("Trapdoor Ladders: climb motion for entity {id} at {pos} failed: {e}"),
            );
        }
    }
}

// ─── Mod system ──────────────────────────────────────────────────────────────

/// Lifecycle owner for the trapdoor climb patch.
#[derive(Debug, Default)]
pub struct TrapdoorLaddersSystem {
    config: TrapdoorLaddersConfig,
    started: bool,
}

impl TrapdoorLaddersSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &TrapdoorLaddersConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl ModSystem for TrapdoorLaddersSystem {
    fn info(&self) -> ModInfo {
        ModInfo {
            name: "TrapdoorLadders".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: "Open trapdoors next to a ladder can be climbed".into(),
        }
    }

    fn start(&mut self, api: &dyn HostApi, patches: &mut dyn PatchRegistry) {
        if self.started {
            patches.remove_patches(PATCH_OWNER);
        }
        patches.install_patch(PATCH_OWNER, Box::new(TrapdoorClimbPatch::new(self.config)));
        self.started = true;

        info!(
            "Trapdoor climb patch installed (climb_speed = {})",
            self.config.climb_speed
        );
        api.log(
            LogLevel::Info,
            "Trapdoor Ladders: patches applied for climbable trapdoors.",
        );
    }

    fn dispose(&mut self, api: &dyn HostApi, patches: &mut dyn PatchRegistry) {
        let removed = patches.remove_patches(PATCH_OWNER);
        self.started = false;
        api.log(
            LogLevel::Info,
            &format!("Trapdoor Ladders: removed {removed} patch(es)."),
        );
    }

    fn default_config(&self) -> Option<serde_json::Value> {
        Some(TrapdoorLaddersConfig::default().to_value())
    }

    fn load_config(&mut self, config: serde_json::Value) {
        match TrapdoorLaddersConfig::from_value(config) {
            Ok(c) => self.config = c,
            Err(e) => {
                warn!("Trapdoor Ladders: ignoring config, keeping current: {e}");
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
