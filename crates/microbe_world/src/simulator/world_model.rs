//! World entities: Cell, Microbe, WorldModel, and aggregate stats.

use serde::{Deserialize, Serialize};

use super::config::SimulationConfig;
use super::context::SimContext;
use super::types::{clamp_stock, Family, WorldTime, DIRECTION_COUNT};

// ============================================================================
// Grid addressing
// ============================================================================

/// Row-major cell index for `(x, y)`; bijective with [`index_to_xy`].
pub fn xy_to_index(x: usize, y: usize, x_max: usize) -> usize {
    x + x_max * y
}

pub fn index_to_xy(index: usize, x_max: usize) -> (usize, usize) {
    (index % x_max, index / x_max)
}

// ============================================================================
// Microbe
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microbe {
    pub alive: bool,
    /// Fixed-length instruction buffer; read-mostly, replaced on cloning.
    pub code: Vec<u8>,
    /// Fixed-length scratch buffer; slot 0 is the program counter.
    pub registers: Vec<u8>,
    /// Lineage tag: first 8 bytes of `blake3(code)`, recomputed on validation.
    pub family: Family,
    /// Per-resource inventory, parallel to the config resource table.
    pub resources: Vec<i64>,
    pub x: usize,
    pub y: usize,
    /// Remaining lifetime in ticks; the agent dies when it reaches zero.
    pub age: u32,
    /// Facing octant, `0..8` compass plus `8` = none.
    pub direction: u8,
    /// Per-tick interpreter budget; transient, never persisted.
    #[serde(skip)]
    pub energy_remaining: u32,
}

impl Microbe {
    /// A fresh agent with random code and a random initial age, placed at
    /// `(x, y)`. Registers start zeroed.
    pub fn spawn(config: &SimulationConfig, ctx: &mut SimContext, x: usize, y: usize) -> Self {
        let mut code = vec![0u8; config.code_size];
        ctx.fill_bytes(&mut code);
        let family = family_of(&code);
        Self {
            alive: true,
            code,
            registers: vec![0u8; config.regs_size],
            family,
            resources: vec![0; config.resource_count()],
            x,
            y,
            age: config.age_max.saturating_add(ctx.age_delta(config.age_max_delta)),
            direction: ctx.index(DIRECTION_COUNT as usize) as u8,
            energy_remaining: 0,
        }
    }

    /// Checks the hard invariants and normalizes the soft ones.
    ///
    /// Wrong buffer lengths or an out-of-bounds position reject the agent;
    /// direction, age, and the resource vector are clamped into range, and
    /// the family tag is recomputed from the (possibly mutated) code.
    pub fn validate(mut self, config: &SimulationConfig) -> Result<Self, ValidationError> {
        if self.code.len() != config.code_size {
            return Err(ValidationError::CodeLength {
                expected: config.code_size,
                actual: self.code.len(),
            });
        }
        if self.registers.len() != config.regs_size {
            return Err(ValidationError::RegisterLength {
                expected: config.regs_size,
                actual: self.registers.len(),
            });
        }
        if self.x >= config.x_max || self.y >= config.y_max {
            return Err(ValidationError::OutOfBounds {
                x: self.x,
                y: self.y,
            });
        }
        self.direction %= DIRECTION_COUNT;
        if self.age > config.age_limit() {
            self.age = config.age_limit();
        }
        self.resources.resize(config.resource_count(), 0);
        for (index, amount) in self.resources.iter_mut().enumerate() {
            *amount = clamp_stock(*amount, config.stack_size(index));
        }
        self.family = family_of(&self.code);
        Ok(self)
    }

    pub fn cell_index(&self, config: &SimulationConfig) -> usize {
        xy_to_index(self.x, self.y, config.x_max)
    }
}

/// Lineage tag of a code buffer.
pub fn family_of(code: &[u8]) -> Family {
    let hash = blake3::hash(code);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    CodeLength { expected: usize, actual: usize },
    RegisterLength { expected: usize, actual: usize },
    OutOfBounds { x: usize, y: usize },
    CellOccupied { x: usize, y: usize },
}

// ============================================================================
// Cell
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Cell {
    #[serde(default)]
    pub agent: Option<Microbe>,
    /// Local stock, parallel to the config resource table.
    #[serde(default)]
    pub resources: Vec<i64>,
}

impl Cell {
    pub fn empty(resource_count: usize) -> Self {
        Self {
            agent: None,
            resources: vec![0; resource_count],
        }
    }

    /// Adds `amount` to the stock of `resource`, clamped to `[0, stack_size]`.
    pub fn deposit(&mut self, resource: usize, amount: i64, stack_size: i64) {
        if let Some(stock) = self.resources.get_mut(resource) {
            *stock = clamp_stock(stock.saturating_add(amount), stack_size);
        }
    }
}

// ============================================================================
// Aggregate stats
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorldStats {
    /// Completed ticks.
    pub age: WorldTime,
    /// Living agents counted at the last tick's lifecycle pass.
    pub count: u64,
    pub mean_age: f64,
}

// ============================================================================
// WorldModel
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorldModel {
    pub cells: Vec<Cell>,
    pub stats: WorldStats,
}

impl WorldModel {
    pub fn empty(config: &SimulationConfig) -> Self {
        Self {
            cells: (0..config.cell_count())
                .map(|_| Cell::empty(config.resource_count()))
                .collect(),
            stats: WorldStats::default(),
        }
    }

    pub fn live_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.agent.as_ref().is_some_and(|agent| agent.alive))
            .count()
    }

    /// Re-validates every cell and agent against `config`, discarding agents
    /// that fail and resizing stocks to the resource table. Used after load
    /// and on reload with a possibly-changed config.
    pub fn revalidate(&mut self, config: &SimulationConfig) {
        self.cells.resize_with(config.cell_count(), || {
            Cell::empty(config.resource_count())
        });
        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.resources.resize(config.resource_count(), 0);
            for (resource, stock) in cell.resources.iter_mut().enumerate() {
                *stock = clamp_stock(*stock, config.stack_size(resource));
            }
            cell.agent = cell.agent.take().and_then(|agent| {
                if !agent.alive {
                    return None;
                }
                let agent = agent.validate(config).ok()?;
                // The agent must actually live in this cell.
                (agent.cell_index(config) == index).then_some(agent)
            });
        }
    }
}
