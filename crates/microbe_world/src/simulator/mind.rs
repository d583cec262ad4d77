//! The Mind: a total, fixed-instruction-set interpreter.
//!
//! Each call executes exactly one instruction against one agent's code and
//! register buffers. Every index into either buffer is taken modulo the
//! buffer's length, unknown opcodes are defined no-ops, and 8-bit arithmetic
//! wraps, so a step never fails or panics regardless of buffer contents,
//! including post-mutation garbage. Unmet preconditions (occupied target
//! cell, unaffordable recipe, out-of-bounds move) leave the world unchanged.

use super::config::SimulationConfig;
use super::context::SimContext;
use super::recipe::apply_recipe_index;
use super::types::{clamp_stock, DIRECTION_COUNT, DIRECTION_OFFSETS};
use super::world_model::{index_to_xy, xy_to_index, Cell, Microbe};

// ============================================================================
// Opcodes
// ============================================================================

pub const OP_NOP: u8 = 0;
pub const OP_BR: u8 = 1;
pub const OP_BR_ABS: u8 = 2;
pub const OP_SET_U8: u8 = 3;
pub const OP_SET_U16: u8 = 4;
pub const OP_ADD_U8: u8 = 5;
pub const OP_SUB_U8: u8 = 6;
pub const OP_TURN: u8 = 16;
pub const OP_MOVE: u8 = 18;
pub const OP_CLONE: u8 = 19;
pub const OP_RECIPE: u8 = 20;
pub const OP_ATTACK: u8 = 21;
pub const OP_EXCHANGE: u8 = 22;

// ============================================================================
// Step
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// The instruction moved the agent into a different cell; its turn ends.
    pub relocated: bool,
    /// Cell index where a clone child was placed this step.
    pub placed_child: Option<usize>,
}

/// Executes one instruction. The agent has been taken out of its cell, so
/// `cells[agent.cell_index()]` holds no agent for the duration of the step.
pub fn step(
    agent: &mut Microbe,
    cells: &mut [Cell],
    config: &SimulationConfig,
    ctx: &mut SimContext,
) -> StepResult {
    let mut result = StepResult::default();
    let code_len = agent.code.len();
    let regs_len = agent.registers.len();
    if code_len == 0 || regs_len == 0 {
        return result;
    }

    let pc = agent.registers[0];
    let fetch = |agent: &Microbe, k: u8| agent.code[pc.wrapping_add(k) as usize % code_len];
    let reg = |agent: &Microbe, addr: u8| agent.registers[addr as usize % regs_len];

    let op = agent.code[pc as usize % code_len];
    match op {
        OP_BR => {
            let addr = fetch(agent, 1);
            let delta = reg(agent, addr) as i8;
            agent.registers[0] = pc.wrapping_add_signed(delta);
        }
        OP_BR_ABS => {
            let addr = fetch(agent, 1);
            agent.registers[0] = reg(agent, addr);
        }
        OP_SET_U8 => {
            let addr = fetch(agent, 1) as usize % regs_len;
            let imm = fetch(agent, 2);
            agent.registers[addr] = imm;
            advance(agent, 3);
        }
        OP_SET_U16 => {
            let addr = fetch(agent, 1) as usize;
            let lo = fetch(agent, 2);
            let hi = fetch(agent, 3);
            agent.registers[addr % regs_len] = lo;
            agent.registers[(addr + 1) % regs_len] = hi;
            advance(agent, 4);
        }
        OP_ADD_U8 | OP_SUB_U8 => {
            let a = reg(agent, fetch(agent, 1));
            let b = reg(agent, fetch(agent, 2));
            let dst = fetch(agent, 3) as usize % regs_len;
            agent.registers[dst] = if op == OP_ADD_U8 {
                a.wrapping_add(b)
            } else {
                a.wrapping_sub(b)
            };
            advance(agent, 4);
        }
        OP_TURN => {
            let turn = reg(agent, fetch(agent, 1));
            agent.direction =
                ((agent.direction as u16 + turn as u16) % DIRECTION_COUNT as u16) as u8;
            advance(agent, 2);
        }
        OP_MOVE => {
            if let Some(target) = target_cell(agent, config) {
                if cells[target].agent.is_none() {
                    let (x, y) = index_to_xy(target, config.x_max);
                    agent.x = x;
                    agent.y = y;
                    result.relocated = true;
                }
            }
            advance(agent, 1);
        }
        OP_CLONE => {
            result.placed_child = try_clone(agent, cells, config, ctx);
            advance(agent, 1);
        }
        OP_RECIPE => {
            let selector = reg(agent, fetch(agent, 1));
            let index = selector as usize % config.recipes.len();
            apply_recipe_index(index, &mut agent.resources, config);
            advance(agent, 2);
        }
        OP_ATTACK => {
            attack(agent, cells, config);
            advance(agent, 1);
        }
        OP_EXCHANGE => {
            let resource = reg(agent, fetch(agent, 1)) as usize % config.resource_count();
            let amount = reg(agent, fetch(agent, 2)) as i8 as i64;
            exchange(agent, cells, config, resource, amount);
            advance(agent, 3);
        }
        // NOP and every unassigned opcode.
        _ => advance(agent, 1),
    }

    result
}

fn advance(agent: &mut Microbe, width: u8) {
    agent.registers[0] = agent.registers[0].wrapping_add(width);
}

/// The cell one step ahead in the agent's facing direction, if it exists.
/// Direction "none" and off-grid targets yield `None`; the grid does not wrap.
pub fn target_cell(agent: &Microbe, config: &SimulationConfig) -> Option<usize> {
    let (dx, dy) = *DIRECTION_OFFSETS.get(agent.direction as usize)?;
    let nx = agent.x as i64 + dx;
    let ny = agent.y as i64 + dy;
    if nx < 0 || ny < 0 || nx >= config.x_max as i64 || ny >= config.y_max as i64 {
        return None;
    }
    Some(xy_to_index(nx as usize, ny as usize, config.x_max))
}

/// Reproduction into the cell ahead: the destination must be empty and the
/// clone recipe affordable. The child copies code and registers, each byte
/// independently mutated, starts with an empty inventory plus the birth
/// endowment, and does not act until the next tick.
fn try_clone(
    parent: &mut Microbe,
    cells: &mut [Cell],
    config: &SimulationConfig,
    ctx: &mut SimContext,
) -> Option<usize> {
    let target = target_cell(parent, config)?;
    if cells[target].agent.is_some() {
        return None;
    }
    if !apply_recipe_index(config.recipe_clone_index(), &mut parent.resources, config) {
        return None;
    }

    let mut child = parent.clone();
    mutate_buffer(&mut child.code, config.mutation_probability, ctx);
    mutate_buffer(&mut child.registers, config.mutation_probability, ctx);
    let (x, y) = index_to_xy(target, config.x_max);
    child.x = x;
    child.y = y;
    child.age = config
        .age_max
        .saturating_add(ctx.age_delta(config.age_max_delta));
    child.resources = vec![0; config.resource_count()];
    child.energy_remaining = 0;
    let mut child = child.validate(config).ok()?;
    apply_recipe_index(config.recipe_init_index(), &mut child.resources, config);

    if cells[target].agent.is_some() {
        return None;
    }
    cells[target].agent = Some(child);
    Some(target)
}

/// Mutates each byte independently: a uniform draw below the probability
/// replaces the byte with a random one.
fn mutate_buffer(buf: &mut [u8], probability: f64, ctx: &mut SimContext) {
    for byte in buf.iter_mut() {
        if ctx.chance(probability) {
            *byte = ctx.byte();
        }
    }
}

/// Directed damage: both the attacker and the victim lose `attack_strength`
/// of the designated energy resource, provided the attacker's energy exceeds
/// the strength and a living victim stands in the cell ahead.
fn attack(attacker: &mut Microbe, cells: &mut [Cell], config: &SimulationConfig) {
    let Some(target) = target_cell(attacker, config) else {
        return;
    };
    let energy = config.energy_resource_index();
    let strength = config.attack_strength;
    let stack_size = config.stack_size(energy);
    let Some(victim) = cells[target].agent.as_mut() else {
        return;
    };
    if !victim.alive || attacker.resources[energy] <= strength {
        return;
    }
    attacker.resources[energy] = clamp_stock(attacker.resources[energy] - strength, stack_size);
    victim.resources[energy] = clamp_stock(victim.resources[energy] - strength, stack_size);
}

/// Bidirectional agent↔cell transfer of one resource. Positive amounts flow
/// cell → agent. Applied only if both resulting values stay in bounds.
fn exchange(
    agent: &mut Microbe,
    cells: &mut [Cell],
    config: &SimulationConfig,
    resource: usize,
    amount: i64,
) {
    let own = agent.cell_index(config);
    let stack_size = config.stack_size(resource);
    let cell = &mut cells[own];
    let agent_next = agent.resources[resource].saturating_add(amount);
    let cell_next = cell.resources[resource].saturating_sub(amount);
    if agent_next < 0 || agent_next > stack_size || cell_next < 0 || cell_next > stack_size {
        return;
    }
    agent.resources[resource] = agent_next;
    cell.resources[resource] = cell_next;
}
