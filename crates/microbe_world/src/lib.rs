pub mod simulator;

pub use simulator::{
    apply_recipe, apply_recipe_index, diffuse, family_of, index_to_xy, xy_to_index, Cell,
    ConfigError, Microbe, PersistError, SimContext, SimulationConfig, SnapshotFeed,
    SnapshotQueryResult, ValidationError, WorldKernel, WorldModel, WorldSnapshot, WorldStats,
    SNAPSHOT_VERSION,
};
