//! Transactional recipe application.
//!
//! A recipe is an ordered list of signed resource deltas. Application is
//! all-or-nothing: if any resulting value would leave `[0, stack_size]`, no
//! resource changes at all. Insufficient resources are a normal outcome, not
//! an error; the caller observes a `bool` and proceeds.

use super::config::{RecipeConfig, SimulationConfig};
use super::types::clamp_stock;

/// Applies `recipe` to `inventory` (parallel to the config resource table).
/// Returns `true` and mutates the inventory only if every delta fits.
pub fn apply_recipe(recipe: &RecipeConfig, inventory: &mut [i64], config: &SimulationConfig) -> bool {
    for &(resource, delta) in &recipe.effects {
        let Some(&current) = inventory.get(resource) else {
            return false;
        };
        let next = current.saturating_add(delta);
        if next < 0 || next > config.stack_size(resource) {
            return false;
        }
    }
    for &(resource, delta) in &recipe.effects {
        let stack_size = config.stack_size(resource);
        if let Some(stock) = inventory.get_mut(resource) {
            *stock = clamp_stock(stock.saturating_add(delta), stack_size);
        }
    }
    true
}

/// Applies the recipe at `index` if it exists and is flagged available.
pub fn apply_recipe_index(index: usize, inventory: &mut [i64], config: &SimulationConfig) -> bool {
    match config.recipes.get(index) {
        Some(recipe) if recipe.available => apply_recipe(recipe, inventory, config),
        _ => false,
    }
}
