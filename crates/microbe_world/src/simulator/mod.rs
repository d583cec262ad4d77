//! Microbe World simulator: the deterministic world-tick engine.
//!
//! Submodules:
//! - `types`: aliases, constants, the direction table
//! - `config`: validated, immutable run parameters
//! - `context`: the world's single seeded RNG
//! - `world_model`: Cell, Microbe, WorldModel, stats
//! - `recipe`: transactional resource-delta application
//! - `mind`: the total one-instruction-per-call interpreter
//! - `diffusion`: per-tick resource-area replenishment
//! - `kernel`: the tick orchestrator and population lifecycle
//! - `persist`: versioned snapshot schema and atomic save
//! - `snapshot`: tick-boundary snapshot feed for external readers

mod config;
mod context;
mod diffusion;
mod kernel;
mod mind;
mod persist;
mod recipe;
mod snapshot;
mod types;
mod world_model;


pub use config::{AreaConfig, ConfigError, RecipeConfig, ResourceConfig, SimulationConfig};
pub use context::SimContext;
pub use diffusion::diffuse;
pub use kernel::WorldKernel;
pub use mind::{
    step, target_cell, StepResult, OP_ADD_U8, OP_ATTACK, OP_BR, OP_BR_ABS, OP_CLONE, OP_EXCHANGE,
    OP_MOVE, OP_NOP, OP_RECIPE, OP_SET_U16, OP_SET_U8, OP_SUB_U8, OP_TURN,
};
pub use persist::{PersistError, WorldSnapshot};
pub use recipe::{apply_recipe, apply_recipe_index};
pub use snapshot::{SnapshotFeed, SnapshotQueryResult};
pub use types::{
    clamp_stock, Family, RecipeIndex, ResourceIndex, Revision, WorldTime, DIRECTION_COUNT,
    DIRECTION_NONE, DIRECTION_OFFSETS, SNAPSHOT_VERSION,
};
pub use world_model::{
    family_of, index_to_xy, xy_to_index, Cell, Microbe, ValidationError, WorldModel, WorldStats,
};
