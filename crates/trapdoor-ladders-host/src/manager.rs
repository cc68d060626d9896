//! Mod manager: loads mod systems, runs their lifecycle, and dispatches patches.

use std::collections::HashMap;

use trapdoor_ladders_api::{
    Block, BlockPatch, BlockPos, Entity, HostApi, ModSystem, PatchRegistry, WorldAccessor,
};
use tracing::{debug, info, trace};

// ─── Patch table ─────────────────────────────────────────────────────────────

struct InstalledPatch {
    owner: String,
    patch: Box<dyn BlockPatch>,
}

/// Installed patches, in installation order.
#[derive(Default)]
pub struct PatchTable {
    entries: Vec<InstalledPatch>,
}

impl PatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of patches installed under `owner`.
    pub fn count_owned_by(&self, owner: &str) -> usize {
        self.entries.iter().filter(|e| e.owner == owner).count()
    }

    fn iter(&self) -> impl Iterator<Item = &dyn BlockPatch> {
        self.entries.iter().map(|e| e.patch.as_ref())
    }
}

impl PatchRegistry for PatchTable {
    fn install_patch(&mut self, owner: &str, patch: Box<dyn BlockPatch>) {
        debug!("Installing block patch for {owner}");
        self.entries.push(InstalledPatch {
            owner: owner.to_string(),
            patch,
        });
    }

    fn remove_patches(&mut self, owner: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        let removed = before - self.entries.len();
        debug!("Removed {removed} block patch(es) for {owner}");
        removed
    }
}

// ─── ModManager ──────────────────────────────────────────────────────────────

/// Owns registered mod systems and the patches they install.
#[derive(Default)]
pub struct ModManager {
    mods: Vec<Box<dyn ModSystem>>,
    patches: PatchTable,
    /// Config overrides by mod name, applied over each mod's defaults.
    configs: HashMap<String, serde_json::Value>,
}

impl ModManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mod system (call before `start_all`).
    pub fn register(&mut self, system: Box<dyn ModSystem>) {
        info!("Registered mod: {}", system.info().name);
        self.mods.push(system);
    }

    /// Supply a config override for the mod named `name`.
    pub fn set_config(&mut self, name: &str, config: serde_json::Value) {
        self.configs.insert(name.to_string(), config);
    }

    pub fn patches(&self) -> &PatchTable {
        &self.patches
    }

    /// Apply configs and start every registered mod, in registration order.
    pub fn start_all(&mut self, api: &dyn HostApi) {
        for system in &mut self.mods {
            let info = system.info();
            if let Some(default_config) = system.default_config() {
                let config = match self.configs.get(&info.name) {
                    Some(overrides) => merge_config(default_config, overrides),
                    None => default_config,
                };
                system.load_config(config);
            }
            system.start(api, &mut self.patches);
            info!("Started mod: {} v{}", info.name, info.version);
        }
    }

    /// Dispose every registered mod, in reverse registration order.
    pub fn dispose_all(&mut self, api: &dyn HostApi) {
        for system in self.mods.iter_mut().rev() {
            system.dispose(api, &mut self.patches);
            info!("Disposed mod: {}", system.info().name);
        }
    }

    /// Run the climbability postfixes over the host's own verdict.
    ///
    /// A `true` verdict is never turned back into `false`.
    pub fn is_climbable(
        &self,
        api: &dyn HostApi,
        block: &Block,
        pos: BlockPos,
        native: bool,
    ) -> bool {
        let mut climbable = native;
        for patch in self.patches.iter() {
            climbable = patch.is_climbable(api, block, pos, climbable) || climbable;
        }
        if climbable != native {
            trace!("Block at {pos} made climbable by patch");
        }
        climbable
    }

    /// Run the entity-inside postfixes, in installation order.
    pub fn on_entity_inside(
        &self,
        api: &dyn HostApi,
        world: &dyn WorldAccessor,
        entity: &mut dyn Entity,
        block: &Block,
        pos: BlockPos,
    ) {
        for patch in self.patches.iter() {
            patch.on_entity_inside(api, world, entity, block, pos);
        }
    }
}

/// Overlay the top-level keys of `overrides` onto `defaults`.
fn merge_config(
    mut defaults: serde_json::Value,
    overrides: &serde_json::Value,
) -> serde_json::Value {
    match (defaults.as_object_mut(), overrides.as_object()) {
        (Some(base), Some(top)) => {
            for (k, v) in top {
                base.insert(k.clone(), v.clone());
            }
            defaults
        }
        _ => overrides.clone(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use trapdoor_ladders::{TrapdoorLaddersSystem, PATCH_OWNER};
    use trapdoor_ladders_api::{
        Agent, BlockEntity, EntityControls, HostError, ModInfo, Motion,
    };

    use super::*;
    use crate::snapshot::{SnapshotHost, WorldSnapshot};

    const TRAPDOOR_POS: BlockPos = BlockPos::new(0, 64, 0);
    const LADDER_POS: BlockPos = BlockPos::new(0, 65, 0);

    fn trapdoor() -> Block {
        Block::new("game:trapdoor-oak-1-north", false)
    }

    fn ladder() -> Block {
        Block::new("game:ladder-wood-north", true)
    }

    fn ladder_shaft(opened: bool) -> WorldSnapshot {
        let mut world = WorldSnapshot::new();
        world
            .set_block(TRAPDOOR_POS, trapdoor())
            .set_block_entity(TRAPDOOR_POS, BlockEntity::with_trapdoor(opened))
            .set_block(LADDER_POS, ladder());
        world
    }

    struct Player {
        controls: EntityControls,
        motion: Motion,
    }

    impl Player {
        fn new(controls: EntityControls, motion_y: f64) -> Self {
            Self {
                controls,
                motion: Motion::new(0.0, motion_y, 0.0),
            }
        }
    }

    impl Entity for Player {
        fn id(&self) -> u64 {
            100
        }
        fn can_climb(&self) -> bool {
            true
        }
        fn as_agent_mut(&mut self) -> Option<&mut dyn Agent> {
            Some(self)
        }
    }

    impl Agent for Player {
        fn controls(&self) -> Result<EntityControls, HostError> {
            Ok(self.controls)
        }
        fn motion_mut(&mut self) -> &mut Motion {
            &mut self.motion
        }
    }

    /// Records lifecycle calls into a shared journal.
    struct JournalMod {
        name: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
    }

    struct Deny;

    impl BlockPatch for Deny {
        fn is_climbable(
            &self,
            _api: &dyn HostApi,
            _block: &Block,
            _pos: BlockPos,
            _climbable: bool,
        ) -> bool {
            false
        }
    }

    impl ModSystem for JournalMod {
        fn info(&self) -> ModInfo {
            ModInfo {
                name: self.name.into(),
                version: "0.1.0".into(),
                description: "Test".into(),
            }
        }

        fn start(&mut self, _api: &dyn HostApi, patches: &mut dyn PatchRegistry) {
            patches.install_patch(self.name, Box::new(Deny));
            self.journal.lock().unwrap().push(format!("start {}", self.name));
        }

        fn dispose(&mut self, _api: &dyn HostApi, patches: &mut dyn PatchRegistry) {
            patches.remove_patches(self.name);
            self.journal
                .lock()
                .unwrap()
                .push(format!("dispose {}", self.name));
        }
    }

    fn started_manager(host: &SnapshotHost) -> ModManager {
        let mut mgr = ModManager::new();
        mgr.register(Box::new(TrapdoorLaddersSystem::new()));
        mgr.start_all(host);
        mgr
    }

    #[test]
    fn start_installs_trapdoor_patch() {
        let host = SnapshotHost::with_world(ladder_shaft(true));
        let mgr = started_manager(&host);
        assert_eq!(mgr.patches().len(), 1);
        assert_eq!(mgr.patches().count_owned_by(PATCH_OWNER), 1);
    }

    #[test]
    fn open_trapdoor_becomes_climbable() {
        let host = SnapshotHost::with_world(ladder_shaft(true));
        let mgr = started_manager(&host);
        assert!(mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, false));
    }

    #[test]
    fn closed_trapdoor_stays_unclimbable() {
        let host = SnapshotHost::with_world(ladder_shaft(false));
        let mgr = started_manager(&host);
        assert!(!mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, false));
    }

    #[test]
    fn native_climbable_never_downgraded() {
        let host = SnapshotHost::with_world(ladder_shaft(false));
        let mut mgr = started_manager(&host);
        let journal = Arc::new(Mutex::new(Vec::new()));
        mgr.register(Box::new(JournalMod {
            name: "deny",
            journal,
        }));
        mgr.start_all(&host);
        assert!(mgr.is_climbable(&host, &ladder(), LADDER_POS, true));
        assert!(mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, true));
    }

    #[test]
    fn no_world_loaded_is_not_climbable() {
        let host = SnapshotHost::new();
        let mgr = started_manager(&host);
        assert!(!mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, false));
    }

    #[test]
    fn unloaded_chunk_is_not_climbable() {
        let mut world = ladder_shaft(true);
        world.mark_unloaded(LADDER_POS);
        let host = SnapshotHost::with_world(world);
        let mgr = started_manager(&host);
        assert!(!mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, false));
    }

    #[test]
    fn toggling_trapdoor_changes_verdict() {
        let mut host = SnapshotHost::with_world(ladder_shaft(true));
        let mgr = started_manager(&host);
        assert!(mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, false));

        if let Some(world) = host.snapshot_mut() {
            world.set_block_entity(TRAPDOOR_POS, BlockEntity::with_trapdoor(false));
        }
        assert!(!mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, false));
    }

    #[test]
    fn entity_inside_climbs() {
        let world = ladder_shaft(true);
        let host = SnapshotHost::with_world(world.clone());
        let mgr = started_manager(&host);
        let mut player = Player::new(
            EntityControls {
                jump: true,
                ..Default::default()
            },
            -0.2,
        );
        mgr.on_entity_inside(&host, &world, &mut player, &trapdoor(), TRAPDOOR_POS);
        assert_eq!(player.motion.y, 0.04);
    }

    #[test]
    fn entity_inside_uses_configured_speed() {
        let world = ladder_shaft(true);
        let host = SnapshotHost::with_world(world.clone());
        let mut mgr = ModManager::new();
        mgr.register(Box::new(TrapdoorLaddersSystem::new()));
        mgr.set_config("TrapdoorLadders", serde_json::json!({ "climb_speed": 0.09 }));
        mgr.start_all(&host);

        let mut player = Player::new(
            EntityControls {
                forward: true,
                ..Default::default()
            },
            0.0,
        );
        mgr.on_entity_inside(&host, &world, &mut player, &trapdoor(), TRAPDOOR_POS);
        assert_eq!(player.motion.y, 0.09);
    }

    #[test]
    fn invalid_config_override_keeps_default_speed() {
        let world = ladder_shaft(true);
        let host = SnapshotHost::with_world(world.clone());
        let mut mgr = ModManager::new();
        mgr.register(Box::new(TrapdoorLaddersSystem::new()));
        mgr.set_config("TrapdoorLadders", serde_json::json!({ "climb_speed": -3.0 }));
        mgr.start_all(&host);

        let mut player = Player::new(
            EntityControls {
                up: true,
                ..Default::default()
            },
            0.0,
        );
        mgr.on_entity_inside(&host, &world, &mut player, &trapdoor(), TRAPDOOR_POS);
        assert_eq!(player.motion.y, 0.04);
    }

    #[test]
    fn dispose_restores_native_behavior() {
        let world = ladder_shaft(true);
        let host = SnapshotHost::with_world(world.clone());
        let mut mgr = started_manager(&host);
        mgr.dispose_all(&host);
        assert!(mgr.patches().is_empty());
        assert!(!mgr.is_climbable(&host, &trapdoor(), TRAPDOOR_POS, false));

        let mut player = Player::new(
            EntityControls {
                jump: true,
                ..Default::default()
            },
            -0.2,
        );
        mgr.on_entity_inside(&host, &world, &mut player, &trapdoor(), TRAPDOOR_POS);
        assert_eq!(player.motion.y, -0.2);
    }

    #[test]
    fn dispose_runs_in_reverse_order() {
        let host = SnapshotHost::new();
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut mgr = ModManager::new();
        for name in ["first", "second"] {
            mgr.register(Box::new(JournalMod {
                name,
                journal: Arc::clone(&journal),
            }));
        }
        mgr.start_all(&host);
        mgr.dispose_all(&host);
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["start first", "start second", "dispose second", "dispose first"]
        );
    }

    #[test]
    fn merge_config_overlays_keys() {
        let merged = merge_config(
            serde_json::json!({ "climb_speed": 0.04, "other": 1 }),
            &serde_json::json!({ "climb_speed": 0.1 }),
        );
        assert_eq!(merged, serde_json::json!({ "climb_speed": 0.1, "other": 1 }));
    }

    #[test]
    fn merge_config_non_object_override_replaces() {
        let merged = merge_config(serde_json::json!({ "a": 1 }), &serde_json::json!(null));
        assert!(merged.is_null());
    }
}
