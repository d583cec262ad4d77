//! Simulation configuration: validated once at startup, immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use super::types::{
    RecipeIndex, ResourceIndex, GRID_AXIS_MAX, GRID_AXIS_MIN, MIN_CODE_SIZE, MIN_REGS_SIZE,
};

// ============================================================================
// Resource / Recipe tables
// ============================================================================

/// A circular zone in which a resource is periodically replenished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    pub center: (f64, f64),
    pub radius: f64,
    pub frequency: f64,
    pub factor: f64,
    pub sigma: f64,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            center: (0.0, 0.0),
            radius: 1.0,
            frequency: 0.0,
            factor: 0.0,
            sigma: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub name: String,
    pub stack_size: i64,
    pub areas: Vec<AreaConfig>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            stack_size: 1,
            areas: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecipeConfig {
    pub name: String,
    pub available: bool,
    /// Ordered `(resource_index, signed_delta)` pairs.
    pub effects: Vec<(ResourceIndex, i64)>,
}

// ============================================================================
// SimulationConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub x_max: usize,
    pub y_max: usize,
    pub code_size: usize,
    pub regs_size: usize,
    pub age_max: u32,
    pub age_max_delta: u32,
    /// Interpreter steps each agent may execute per tick.
    pub energy_remaining: u32,
    pub mutation_probability: f64,
    pub attack_strength: i64,
    pub resources: Vec<ResourceConfig>,
    pub recipes: Vec<RecipeConfig>,
    pub recipe_init: String,
    pub recipe_step: String,
    pub recipe_clone: String,
    pub energy_resource: String,
    pub spawn_pos: (usize, usize),
    pub spawn_radius: i64,
    pub spawn_min_count: usize,
    pub spawn_max_count: usize,
    pub seed: u64,
    #[serde(skip)]
    resolved: ResolvedIndices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ResolvedIndices {
    recipe_init: RecipeIndex,
    recipe_step: RecipeIndex,
    recipe_clone: RecipeIndex,
    energy_resource: ResourceIndex,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            x_max: 64,
            y_max: 48,
            code_size: 64,
            regs_size: 16,
            age_max: 500,
            age_max_delta: 100,
            energy_remaining: 8,
            mutation_probability: 0.01,
            attack_strength: 10,
            resources: vec![ResourceConfig {
                name: "energy".to_string(),
                stack_size: 1000,
                areas: vec![AreaConfig {
                    center: (32.0, 24.0),
                    radius: 16.0,
                    frequency: 0.05,
                    factor: 2.0,
                    sigma: 1.0,
                }],
            }],
            recipes: vec![
                RecipeConfig {
                    name: "init".to_string(),
                    available: true,
                    effects: vec![(0, 500)],
                },
                RecipeConfig {
                    name: "step".to_string(),
                    available: true,
                    effects: vec![(0, -1)],
                },
                RecipeConfig {
                    name: "clone".to_string(),
                    available: true,
                    effects: vec![(0, -100)],
                },
            ],
            recipe_init: "init".to_string(),
            recipe_step: "step".to_string(),
            recipe_clone: "clone".to_string(),
            energy_resource: "energy".to_string(),
            spawn_pos: (32, 24),
            spawn_radius: 10,
            spawn_min_count: 5,
            spawn_max_count: 20,
            seed: 42,
            resolved: ResolvedIndices::default(),
        }
    }
}

impl SimulationConfig {
    /// Validates ranges and resolves recipe/resource names to table indices.
    /// Any failure here is fatal at startup.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.x_max < GRID_AXIS_MIN || self.x_max > GRID_AXIS_MAX {
            return Err(ConfigError::GridOutOfRange {
                axis: "x_max",
                value: self.x_max,
            });
        }
        if self.y_max < GRID_AXIS_MIN || self.y_max > GRID_AXIS_MAX {
            return Err(ConfigError::GridOutOfRange {
                axis: "y_max",
                value: self.y_max,
            });
        }
        if self.code_size < MIN_CODE_SIZE {
            return Err(ConfigError::CodeSizeTooSmall {
                value: self.code_size,
            });
        }
        if self.regs_size < MIN_REGS_SIZE {
            return Err(ConfigError::RegsSizeTooSmall {
                value: self.regs_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(ConfigError::MutationProbabilityOutOfRange {
                value: self.mutation_probability,
            });
        }
        if self.attack_strength < 0 {
            return Err(ConfigError::NegativeAttackStrength {
                value: self.attack_strength,
            });
        }
        if self.resources.is_empty() {
            return Err(ConfigError::EmptyResourceTable);
        }
        if self.recipes.is_empty() {
            return Err(ConfigError::EmptyRecipeTable);
        }
        for resource in &self.resources {
            if resource.stack_size <= 0 {
                return Err(ConfigError::ZeroStackSize {
                    resource: resource.name.clone(),
                });
            }
            for area in &resource.areas {
                if area.radius <= 0.0 || area.frequency < 0.0 || area.sigma <= 0.0 {
                    return Err(ConfigError::InvalidArea {
                        resource: resource.name.clone(),
                    });
                }
            }
        }
        for recipe in &self.recipes {
            for &(index, _) in &recipe.effects {
                if index >= self.resources.len() {
                    return Err(ConfigError::EffectIndexOutOfRange {
                        recipe: recipe.name.clone(),
                        index,
                    });
                }
            }
        }
        if self.spawn_min_count > self.spawn_max_count {
            return Err(ConfigError::SpawnCountsInverted {
                min: self.spawn_min_count,
                max: self.spawn_max_count,
            });
        }
        if self.spawn_pos.0 >= self.x_max || self.spawn_pos.1 >= self.y_max {
            return Err(ConfigError::SpawnPosOutOfBounds {
                x: self.spawn_pos.0,
                y: self.spawn_pos.1,
            });
        }
        if self.spawn_radius < 0 {
            return Err(ConfigError::NegativeSpawnRadius {
                value: self.spawn_radius,
            });
        }

        self.resolved = ResolvedIndices {
            recipe_init: self.resolve_recipe("recipe_init", &self.recipe_init)?,
            recipe_step: self.resolve_recipe("recipe_step", &self.recipe_step)?,
            recipe_clone: self.resolve_recipe("recipe_clone", &self.recipe_clone)?,
            energy_resource: self.resolve_resource(&self.energy_resource)?,
        };
        Ok(self)
    }

    fn resolve_recipe(&self, role: &'static str, name: &str) -> Result<RecipeIndex, ConfigError> {
        self.recipes
            .iter()
            .position(|recipe| recipe.name == name)
            .ok_or_else(|| ConfigError::UnknownRecipe {
                role,
                name: name.to_string(),
            })
    }

    fn resolve_resource(&self, name: &str) -> Result<ResourceIndex, ConfigError> {
        self.resources
            .iter()
            .position(|resource| resource.name == name)
            .ok_or_else(|| ConfigError::UnknownResource {
                name: name.to_string(),
            })
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read(path.as_ref())?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate()
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()
    }

    pub fn cell_count(&self) -> usize {
        self.x_max * self.y_max
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn recipe_init_index(&self) -> RecipeIndex {
        self.resolved.recipe_init
    }

    pub fn recipe_step_index(&self) -> RecipeIndex {
        self.resolved.recipe_step
    }

    pub fn recipe_clone_index(&self) -> RecipeIndex {
        self.resolved.recipe_clone
    }

    pub fn energy_resource_index(&self) -> ResourceIndex {
        self.resolved.energy_resource
    }

    pub fn stack_size(&self, resource: ResourceIndex) -> i64 {
        self.resources[resource].stack_size
    }

    /// Upper bound of the initial age range.
    pub fn age_limit(&self) -> u32 {
        self.age_max.saturating_add(self.age_max_delta)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io(String),
    Serde(String),
    GridOutOfRange { axis: &'static str, value: usize },
    CodeSizeTooSmall { value: usize },
    RegsSizeTooSmall { value: usize },
    MutationProbabilityOutOfRange { value: f64 },
    NegativeAttackStrength { value: i64 },
    EmptyResourceTable,
    EmptyRecipeTable,
    ZeroStackSize { resource: String },
    InvalidArea { resource: String },
    EffectIndexOutOfRange { recipe: String, index: usize },
    UnknownRecipe { role: &'static str, name: String },
    UnknownResource { name: String },
    SpawnCountsInverted { min: usize, max: usize },
    SpawnPosOutOfBounds { x: usize, y: usize },
    NegativeSpawnRadius { value: i64 },
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}
