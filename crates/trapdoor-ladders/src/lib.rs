//! Trapdoor ladders: open trapdoors touching a ladder become climbable.
//!
//! The [`classifier`] decides whether a position holds an open trapdoor
//! directly above or below a true ladder. The [`motion`] controller turns an
//! agent's controls into vertical motion while it stands inside one. The
//! [`system`] module wires both into a host through [`BlockPatch`] postfixes.
//!
//! [`BlockPatch`]: trapdoor_ladders_api::BlockPatch

pub mod classifier;
pub mod config;
pub mod error;
pub mod motion;
pub mod system;

pub use classifier::{is_ladder_block, is_open_trapdoor_with_ladder};
pub use config::TrapdoorLaddersConfig;
pub use error::{ClimbError, ConfigError};
pub use motion::{apply_climb_motion, ClimbIntent, CLIMB_SPEED};
pub use system::{TrapdoorClimbPatch, TrapdoorLaddersSystem, PATCH_OWNER};
