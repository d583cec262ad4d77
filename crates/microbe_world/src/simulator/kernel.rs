//! WorldKernel: the deterministic tick orchestrator.
//!
//! One `tick()` is one atomic state transition: diffusion, budgeted
//! interpreter execution per cell, lifecycle (death, metabolism), population
//! top-up, stats. The tick is single-threaded and runs to completion; nothing
//! inside it blocks or suspends. Determinism holds for a fixed seed and a
//! fixed tick sequence. External consumers read only tick-boundary snapshots
//! (see the `snapshot` module), never mid-tick state.

use super::config::SimulationConfig;
use super::context::SimContext;
use super::diffusion::diffuse;
use super::mind;
use super::persist::{PersistError, WorldSnapshot};
use super::recipe::apply_recipe_index;
use super::types::Revision;
use super::world_model::{xy_to_index, Microbe, ValidationError, WorldModel, WorldStats};

use std::path::Path;

/// Placement draws allowed per missing agent during top-up, so a crowded
/// spawn disk cannot stall the tick.
const SPAWN_ATTEMPTS_PER_AGENT: usize = 16;

#[derive(Debug, Clone)]
pub struct WorldKernel {
    config: SimulationConfig,
    model: WorldModel,
    ctx: SimContext,
    revision: Revision,
}

impl WorldKernel {
    /// A fresh, empty world. `config` must have passed
    /// [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Self {
        let model = WorldModel::empty(&config);
        let ctx = SimContext::new(config.seed);
        Self {
            config,
            model,
            ctx,
            revision: 0,
        }
    }

    /// Resumes from a loaded model, re-validating every cell and agent
    /// against the (possibly changed) config and discarding invalid agents.
    pub fn with_model(config: SimulationConfig, mut model: WorldModel) -> Self {
        model.revalidate(&config);
        let ctx = SimContext::new(config.seed);
        Self {
            config,
            model,
            ctx,
            revision: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn model(&self) -> &WorldModel {
        &self.model
    }

    pub fn stats(&self) -> &WorldStats {
        &self.model.stats
    }

    /// Increments once per completed tick.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn live_count(&self) -> usize {
        self.model.live_count()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::of(&self.model)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        self.snapshot().save_json_atomic(path)
    }

    pub fn load_from_path(
        config: SimulationConfig,
        path: impl AsRef<Path>,
    ) -> Result<Self, PersistError> {
        let snapshot = WorldSnapshot::load_json(path)?;
        Ok(Self::with_model(config, snapshot.model))
    }

    /// Validates an agent and places it into its (empty) cell.
    pub fn place_agent(&mut self, agent: Microbe) -> Result<(), ValidationError> {
        let agent = agent.validate(&self.config)?;
        let index = agent.cell_index(&self.config);
        if self.model.cells[index].agent.is_some() {
            return Err(ValidationError::CellOccupied {
                x: agent.x,
                y: agent.y,
            });
        }
        self.model.cells[index].agent = Some(agent);
        Ok(())
    }

    /// Performs one full simulation step.
    pub fn tick(&mut self) {
        // 1. Resource diffusion.
        diffuse(&mut self.model.cells, &self.config, &mut self.ctx);

        // 2. Refill every agent's per-tick action budget.
        for cell in &mut self.model.cells {
            if let Some(agent) = cell.agent.as_mut() {
                agent.energy_remaining = self.config.energy_remaining;
            }
        }

        // 3 + 4. Budgeted execution and lifecycle, per cell in index order.
        // `arrived` marks cells that received an agent mid-tick (relocation
        // or clone); such agents are not processed again this tick.
        let cell_count = self.model.cells.len();
        let mut arrived = vec![false; cell_count];
        let mut count: u64 = 0;
        let mut age_sum: u64 = 0;

        for index in 0..cell_count {
            if arrived[index] {
                continue;
            }
            let Some(mut agent) = self.model.cells[index].agent.take() else {
                continue;
            };
            if !agent.alive {
                continue;
            }

            while agent.alive && agent.energy_remaining > 0 {
                agent.energy_remaining -= 1;
                let step = mind::step(&mut agent, &mut self.model.cells, &self.config, &mut self.ctx);
                if let Some(child) = step.placed_child {
                    arrived[child] = true;
                }
                if step.relocated {
                    // Never two cells' worth of budget in one tick.
                    break;
                }
            }

            let energy = self.config.energy_resource_index();
            if agent.age == 0 || agent.resources[energy] <= 0 {
                self.bury(&agent);
                continue;
            }

            // Metabolism; insufficient resources simply mean no effect.
            apply_recipe_index(
                self.config.recipe_step_index(),
                &mut agent.resources,
                &self.config,
            );
            agent.age -= 1;
            count += 1;
            age_sum += agent.age as u64;

            let dest = agent.cell_index(&self.config);
            if dest != index {
                arrived[dest] = true;
            }
            self.model.cells[dest].agent = Some(agent);
        }

        // 5. Population maintenance. Clone children placed this tick are
        // masked from execution but alive, so the gate counts the grid, not
        // the step-4 survivor fold.
        let mut live = self.model.live_count();
        if live <= self.config.spawn_min_count {
            let missing = self.config.spawn_max_count.saturating_sub(live);
            let mut attempts = missing.saturating_mul(SPAWN_ATTEMPTS_PER_AGENT);
            while live < self.config.spawn_max_count && attempts > 0 {
                attempts -= 1;
                if self.try_spawn() {
                    live += 1;
                }
            }
        }

        // 6. Aggregate stats and the snapshot revision.
        self.model.stats.age += 1;
        self.model.stats.count = count;
        self.model.stats.mean_age = age_sum as f64 / count.max(1) as f64;
        self.revision += 1;
    }

    /// Death: half of each resource goes to the cell, the rest is discarded,
    /// and the slot is cleared.
    fn bury(&mut self, agent: &Microbe) {
        let index = agent.cell_index(&self.config);
        for (resource, &amount) in agent.resources.iter().enumerate() {
            let half = amount / 2;
            if half > 0 {
                self.model.cells[index].deposit(resource, half, self.config.stack_size(resource));
            }
        }
    }

    /// One placement attempt within the spawn disk. Fails quietly on an
    /// out-of-bounds draw or an occupied cell.
    fn try_spawn(&mut self) -> bool {
        let (sx, sy) = self.config.spawn_pos;
        let x = sx as i64 + self.ctx.offset(self.config.spawn_radius);
        let y = sy as i64 + self.ctx.offset(self.config.spawn_radius);
        if x < 0 || y < 0 || x >= self.config.x_max as i64 || y >= self.config.y_max as i64 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let index = xy_to_index(x, y, self.config.x_max);
        if self.model.cells[index].agent.is_some() {
            return false;
        }
        let candidate = Microbe::spawn(&self.config, &mut self.ctx, x, y);
        let Ok(mut agent) = candidate.validate(&self.config) else {
            return false;
        };
        // Birth endowment.
        apply_recipe_index(self.config.recipe_init_index(), &mut agent.resources, &self.config);
        self.model.cells[index].agent = Some(agent);
        true
    }
}
