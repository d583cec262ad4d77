//! Core type definitions: aliases, constants, and the direction table.

// ============================================================================
// Type Aliases
// ============================================================================

pub type WorldTime = u64;
pub type Revision = u64;
pub type ResourceIndex = usize;
pub type RecipeIndex = usize;
pub type Family = u64;

// ============================================================================
// Constants
// ============================================================================

pub const GRID_AXIS_MIN: usize = 1;
pub const GRID_AXIS_MAX: usize = 4096;
pub const MIN_CODE_SIZE: usize = 1;
pub const MIN_REGS_SIZE: usize = 1;
pub const SNAPSHOT_VERSION: u32 = 1;

/// Number of facing directions: 8 compass octants plus "none".
pub const DIRECTION_COUNT: u8 = 9;
pub const DIRECTION_NONE: u8 = 8;

/// Octant offsets, index 0 = north, clockwise.
pub const DIRECTION_OFFSETS: [(i64, i64); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Clamp a resource count into its configured `[0, stack_size]` band.
pub fn clamp_stock(value: i64, stack_size: i64) -> i64 {
    value.clamp(0, stack_size)
}
