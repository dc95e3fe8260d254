//! Hydraulic (droplet) erosion.
//!
//! Simulates independent water droplets that follow the terrain gradient,
//! pick up sediment while accelerating downhill and deposit it when they
//! slow, overfill, or climb. All terrain changes go through a radial brush
//! and are damped near protected cells so roadside grades survive the
//! carving. A droplet that leaves the grid or rolls onto a protected cell
//! simply ends; that is the expected fate of most droplets, not a failure.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use relief_grid::{CellMask, DistanceField, HeightField, INFINITE_DISTANCE};
use relief_noise::seeded_rng;
use serde::{Deserialize, Serialize};

use crate::road::nearest_protected;
use crate::{Brush, ErodeError};

/// Water volume below which a droplet is considered dry.
const MIN_WATER: f32 = 0.01;

/// Parameters for hydraulic erosion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydraulicErosionConfig {
    /// Number of droplets to simulate.
    pub droplet_count: u32,
    /// Maximum steps a single droplet lives.
    pub max_droplet_lifetime: u32,
    /// Blend factor between the previous flow direction and the gradient.
    /// 0 follows the gradient exactly; 1 never turns.
    pub inertia: f32,
    /// Scale of the speed·water·slope sediment capacity term.
    pub sediment_capacity_factor: f32,
    /// Lower bound on sediment capacity, keeping flat-ground droplets alive.
    pub min_sediment_capacity: f32,
    /// Fraction of excess sediment dropped per step.
    pub deposit_speed: f32,
    /// Fraction of the remaining capacity eroded per step.
    pub erode_speed: f32,
    /// Per-step water loss fraction.
    pub evaporation_rate: f32,
    /// Gravity term in the speed update.
    pub gravity: f32,
    /// Droplet starting speed.
    pub initial_speed: f32,
    /// Droplet starting water volume.
    pub initial_water: f32,
    /// Radius of the erosion/deposition brush, in cells.
    pub brush_radius: u32,
    /// Falloff exponent of the brush weights.
    pub brush_falloff: f32,
    /// Maximum depth a cell may be carved below its nearest protected
    /// neighbor's height.
    pub max_erosion_depth: f32,
    /// Distance (in field steps) over which road damping fades out.
    /// 0 disables damping and the undercut clamp.
    pub road_influence_distance: f32,
    /// RNG seed; 0 means non-deterministic.
    pub seed: u64,
}

impl Default for HydraulicErosionConfig {
    fn default() -> Self {
        Self {
            droplet_count: 10_000,
            max_droplet_lifetime: 30,
            inertia: 0.05,
            sediment_capacity_factor: 4.0,
            min_sediment_capacity: 0.01,
            deposit_speed: 0.3,
            erode_speed: 0.3,
            evaporation_rate: 0.01,
            gravity: 4.0,
            initial_speed: 1.0,
            initial_water: 1.0,
            brush_radius: 3,
            brush_falloff: 1.0,
            max_erosion_depth: 0.05,
            road_influence_distance: 10.0,
            seed: 0,
        }
    }
}

impl HydraulicErosionConfig {
    /// Run the droplet simulation over the free region.
    ///
    /// The distance field feeds the road-influence damping. A degenerate
    /// field (no protected cells anywhere) is fine here: every cell is
    /// simply "far from roads" and erosion runs undamped; the algorithm
    /// never normalizes by the field's maximum.
    pub fn apply<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        distance: &DistanceField,
    ) -> Result<(), ErodeError> {
        let width = field.width();
        let height = field.height();
        if width < 2 || height < 2 {
            return Ok(());
        }
        let mut any_free = false;
        'scan: for y in 0..height {
            for x in 0..width {
                if mask.is_free(x, y) {
                    any_free = true;
                    break 'scan;
                }
            }
        }
        if !any_free {
            log::warn!("hydraulic erosion: mask frees no cells, nothing to erode");
            return Ok(());
        }

        let mut rng = seeded_rng(self.seed);
        let brush = Brush::new(self.brush_radius, self.brush_falloff);
        let progress_step = (self.droplet_count / 10).max(1);

        for droplet in 0..self.droplet_count {
            if droplet % progress_step == 0 {
                log::debug!(
                    "hydraulic erosion: droplet {droplet}/{}",
                    self.droplet_count
                );
            }
            self.simulate_droplet(field, mask, distance, &brush, &mut rng);
        }
        Ok(())
    }

    fn simulate_droplet<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        distance: &DistanceField,
        brush: &Brush,
        rng: &mut ChaCha8Rng,
    ) {
        let width = field.width();
        let height = field.height();

        // Uniformly random free spawn cell.
        let (sx, sy) = loop {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            if mask.is_free(x, y) {
                break (x, y);
            }
        };
        let mut pos = Vec2::new(sx as f32, sy as f32);
        let mut dir = random_unit(rng);
        let mut speed = self.initial_speed;
        let mut water = self.initial_water;
        let mut sediment = 0.0f32;

        for _ in 0..self.max_droplet_lifetime {
            let cell_x = pos.x as usize;
            let cell_y = pos.y as usize;

            let (gx, gy) = field.gradient_bilinear(pos.x, pos.y);
            dir = dir * self.inertia - Vec2::new(gx, gy) * (1.0 - self.inertia);
            let len = dir.length();
            if len <= 1e-8 {
                // Flat ground and no momentum: wander off in a random direction.
                dir = random_unit(rng);
            } else {
                dir /= len;
            }

            let old_height = field.sample_bilinear(pos.x, pos.y);
            pos += dir;

            if pos.x < 0.0
                || pos.y < 0.0
                || pos.x >= (width - 1) as f32
                || pos.y >= (height - 1) as f32
            {
                break;
            }
            if !mask.is_free(pos.x as usize, pos.y as usize) {
                break;
            }

            let new_height = field.sample_bilinear(pos.x, pos.y);
            let delta = new_height - old_height;
            let capacity = (self.sediment_capacity_factor * speed * water * delta.abs())
                .max(self.min_sediment_capacity);

            if delta > 0.0 {
                // Climbing: fill the pit behind the droplet, at most up to
                // the step it just took.
                let deposit = delta.min(sediment);
                sediment -= self.apply_brush(
                    field, mask, distance, brush, cell_x, cell_y, deposit, false,
                );
            } else if sediment > capacity {
                let deposit = (sediment - capacity) * self.deposit_speed;
                sediment -= self.apply_brush(
                    field, mask, distance, brush, cell_x, cell_y, deposit, false,
                );
            } else {
                let erode = ((capacity - sediment) * self.erode_speed).min(-delta)
                    * self.road_factor(distance, cell_x, cell_y);
                let removed = self.apply_brush(
                    field, mask, distance, brush, cell_x, cell_y, erode, true,
                );
                sediment += removed;
                self.clamp_undercut(field, mask, distance, cell_x, cell_y);
            }

            speed = libm::sqrtf((speed * speed + delta * self.gravity).max(0.0));
            water *= 1.0 - self.evaporation_rate;
            if water < MIN_WATER {
                break;
            }
        }
    }

    /// Distribute `amount` through the brush around `(cx, cy)`, skipping
    /// protected and out-of-bounds cells and damping each brush cell by its
    /// road influence. Returns the total actually applied.
    #[allow(clippy::too_many_arguments)]
    fn apply_brush<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        distance: &DistanceField,
        brush: &Brush,
        cx: usize,
        cy: usize,
        amount: f32,
        eroding: bool,
    ) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        let width = field.width();
        let height = field.height();
        let mut applied = 0.0f32;
        for (dx, dy, weight) in brush.cells() {
            let bx = cx as i32 + dx;
            let by = cy as i32 + dy;
            if bx < 0 || by < 0 || bx >= width as i32 || by >= height as i32 {
                continue;
            }
            let (bx, by) = (bx as usize, by as usize);
            if !mask.is_free(bx, by) {
                continue;
            }
            let portion = amount * weight * self.road_factor(distance, bx, by);
            field.add(bx, by, if eroding { -portion } else { portion });
            applied += portion;
        }
        applied
    }

    /// Linear road-influence damping: 0 at a protected cell, 1 at or beyond
    /// the influence distance.
    fn road_factor(&self, distance: &DistanceField, x: usize, y: usize) -> f32 {
        if self.road_influence_distance <= 0.0 {
            return 1.0;
        }
        let d = distance.at(x, y);
        if d == INFINITE_DISTANCE {
            return 1.0;
        }
        (d as f32 / self.road_influence_distance).min(1.0)
    }

    /// Keep a carved cell from undercutting the grade of the nearest
    /// protected cell when it sits within half the influence distance.
    fn clamp_undercut<M: CellMask + ?Sized>(
        &self,
        field: &mut HeightField,
        mask: &M,
        distance: &DistanceField,
        cx: usize,
        cy: usize,
    ) {
        if self.road_influence_distance <= 0.0 {
            return;
        }
        let d = distance.at(cx, cy);
        if d == INFINITE_DISTANCE || (d as f32) >= self.road_influence_distance * 0.5 {
            return;
        }
        let radius = self.road_influence_distance as u32 + 1;
        if let Some((px, py, _)) =
            nearest_protected(mask, field.width(), field.height(), cx, cy, radius)
        {
            let floor = field.at(px, py) - self.max_erosion_depth;
            if field.at(cx, cy) < floor {
                field.set(cx, cy, floor);
            }
        }
    }
}

fn random_unit(rng: &mut ChaCha8Rng) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(libm::cosf(angle), libm::sinf(angle))
}
