//! Resource diffusion: per-tick replenishment of circular resource areas.

use std::f64::consts::PI;

use super::config::SimulationConfig;
use super::context::SimContext;
use super::world_model::{xy_to_index, Cell};

/// Seeds every configured resource area into the grid for one tick.
///
/// For each area, `frequency * PI * radius^2` sample points are drawn
/// uniformly in the circle's bounding square (no disk rejection; falloff
/// zeroes contributions past the radius). Each in-bounds sample deposits
/// `factor * max(0, 1 - |d/radius|^sigma)` (rounded) into the cell under it,
/// where `d` is the Euclidean distance to the area center; stocks stay
/// clamped to `[0, stack_size]`.
pub fn diffuse(cells: &mut [Cell], config: &SimulationConfig, ctx: &mut SimContext) {
    for (resource, table) in config.resources.iter().enumerate() {
        for area in &table.areas {
            let samples = (area.frequency * PI * area.radius * area.radius).floor() as u64;
            for _ in 0..samples {
                let (cx, cy) = area.center;
                let sx = ctx.uniform(cx - area.radius, cx + area.radius);
                let sy = ctx.uniform(cy - area.radius, cy + area.radius);
                if sx < 0.0 || sy < 0.0 {
                    continue;
                }
                let (x, y) = (sx.floor() as usize, sy.floor() as usize);
                if x >= config.x_max || y >= config.y_max {
                    continue;
                }
                let distance = ((sx - cx).powi(2) + (sy - cy).powi(2)).sqrt();
                let falloff = 1.0 - (distance / area.radius).abs().powf(area.sigma);
                let amount = (area.factor * falloff.max(0.0)).round() as i64;
                if amount == 0 {
                    continue;
                }
                let index = xy_to_index(x, y, config.x_max);
                cells[index].deposit(resource, amount, table.stack_size);
            }
        }
    }
}
