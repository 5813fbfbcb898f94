//! The ray caster: per-column DDA grid traversal.
//!
//! For every pixel column one ray is traced by two interleaved walks, one
//! crossing vertical grid lines and one crossing horizontal grid lines. Each
//! walk jumps whole cells at a time, so cost scales with cells crossed rather
//! than distance sampled. The nearer of the two hits is the wall for that
//! column.

use glam::DVec2;
use rayon::prelude::*;

use crate::core::config::EngineConfig;
use crate::render::FrameContext;
use crate::world::World;

/// One column's wall hit before fish-eye correction.
#[derive(Debug, Clone, Copy)]
struct WallHit {
    distance: i32,
    /// Sub-cell offset along the wall face, in world units; selects the
    /// texture column.
    grid_index: i32,
    /// Wall cell code as a small integer, selects the texture image.
    texture_id: i32,
}

/// Casts all columns for a frame and derives the projected wall geometry.
pub struct RayCaster {
    fov: i32,
    resolution_x: usize,
    resolution_y: i32,
    /// Distance from the eye to the projection plane, in pixels; fixed by
    /// resolution and field of view.
    distance_to_projection_plane: i32,
}

impl RayCaster {
    pub fn new(config: &EngineConfig) -> Self {
        let mut caster = Self {
            fov: 0,
            resolution_x: 0,
            resolution_y: 0,
            distance_to_projection_plane: 0,
        };
        caster.apply_config(config);
        caster
    }

    pub fn apply_config(&mut self, config: &EngineConfig) {
        self.fov = config.fov;
        self.resolution_x = config.resolution_x as usize;
        self.resolution_y = config.resolution_y;
        self.distance_to_projection_plane = (f64::from(config.resolution_x) / 2.0
            / (f64::from(config.fov).to_radians() / 2.0).tan())
            as i32;
    }

    pub fn distance_to_projection_plane(&self) -> i32 {
        self.distance_to_projection_plane
    }

    /// Traces every column and fills the frame context's distance, texture
    /// and wall-geometry arrays.
    pub fn cast(&self, world: &World, ctx: &mut FrameContext) {
        let rads_per_ray = f64::from(self.fov).to_radians() / self.resolution_x as f64;
        let leftmost = ctx.viewer_direction - rads_per_ray * self.resolution_x as f64 / 2.0;
        let origin = DVec2::new(f64::from(ctx.viewer_x), f64::from(ctx.viewer_y));

        let columns: Vec<WallHit> = (0..self.resolution_x)
            .into_par_iter()
            .map(|i| {
                let ray_direction = leftmost + rads_per_ray * i as f64;
                let vertical = cast_vertical_walls(world, origin, ray_direction);
                let horizontal = cast_horizontal_walls(world, origin, ray_direction);
                // Nearer walk wins; on an exact tie the horizontal hit wins.
                let mut hit = if vertical.distance < horizontal.distance {
                    vertical
                } else {
                    horizontal
                };
                // Fish-eye correction: radial distance to perpendicular
                // distance from the view plane.
                let offset = ctx.viewer_direction - ray_direction;
                hit.distance = (f64::from(hit.distance) * offset.cos()) as i32;
                hit
            })
            .collect();

        let mut min_height = self.resolution_y;
        for (i, hit) in columns.iter().enumerate() {
            ctx.distances[i] = hit.distance;
            ctx.grid_indexes[i] = hit.grid_index;
            ctx.texture_ids[i] = hit.texture_id;
            let height =
                world.grid_size() * self.distance_to_projection_plane / hit.distance.max(1);
            min_height = min_height.min(height);
            ctx.wall_heights[i] = height;
        }

        // Looking up or down shifts the whole wall band on screen.
        let grid_size = world.grid_size();
        ctx.wall_draw_shift =
            (ctx.viewer_height - grid_size / 2) * self.resolution_y / grid_size;
        ctx.furthest_wall_top = (self.resolution_y - min_height) / 2 - ctx.wall_draw_shift;
    }
}

/// Walks the ray across vertical grid lines until it enters a wall cell.
fn cast_vertical_walls(world: &World, origin: DVec2, direction: f64) -> WallHit {
    let grid_size = world.grid_size();
    let step_x = octant_sign(direction.cos());
    let step_y = octant_sign(direction.sin());

    // First vertical grid line in the ray's horizontal direction.
    let mut intersect_x = world.snap(origin.x as i32);
    intersect_x += if step_x < 0 { -1 } else { grid_size };
    let intersect_y = origin.y + (f64::from(intersect_x) - origin.x) * direction.tan();

    let step = DVec2::new(
        f64::from(grid_size * step_x),
        (f64::from(grid_size) * direction.tan()).abs() * f64::from(step_y),
    );
    let mut intersect = DVec2::new(f64::from(intersect_x), intersect_y);
    while !world.wall_at(intersect.x as i32, intersect.y as i32) {
        intersect += step;
    }

    WallHit {
        // Trigonometry is cheaper than the Pythagorean distance here.
        distance: ((origin.x - intersect.x) / direction.cos()).abs() as i32,
        grid_index: (intersect.y as i32).rem_euclid(grid_size),
        texture_id: texture_id_at(world, intersect),
    }
}

/// Walks the ray across horizontal grid lines until it enters a wall cell.
fn cast_horizontal_walls(world: &World, origin: DVec2, direction: f64) -> WallHit {
    let grid_size = world.grid_size();
    let step_x = octant_sign(direction.cos());
    let step_y = octant_sign(direction.sin());

    // First horizontal grid line in the ray's vertical direction.
    let mut intersect_y = world.snap(origin.y as i32);
    intersect_y += if step_y < 0 { -1 } else { grid_size };
    let intersect_x = origin.x + (f64::from(intersect_y) - origin.y) / direction.tan();

    let step = DVec2::new(
        (f64::from(grid_size) / direction.tan()).abs() * f64::from(step_x),
        f64::from(grid_size * step_y),
    );
    let mut intersect = DVec2::new(intersect_x, f64::from(intersect_y));
    while !world.wall_at(intersect.x as i32, intersect.y as i32) {
        intersect += step;
    }

    WallHit {
        // The y axis is this walk's exact one; deriving the length from x
        // loses the whole distance to rounding when the ray runs parallel
        // to it.
        distance: ((origin.y - intersect.y) / direction.sin()).abs() as i32,
        grid_index: (intersect.x as i32).rem_euclid(grid_size),
        texture_id: texture_id_at(world, intersect),
    }
}

fn texture_id_at(world: &World, intersect: DVec2) -> i32 {
    i32::from(world.cell_at(intersect.x as i32, intersect.y as i32) as u8) - i32::from(b'0')
}

fn octant_sign(component: f64) -> i32 {
    if component < 0.0 {
        -1
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const GRID: i32 = 1024;

    fn closed_room() -> World {
        let matrix = vec![
            vec!['1', '1', '1'],
            vec!['1', '0', '1'],
            vec!['1', '1', '1'],
        ];
        World::new(matrix, GRID)
    }

    fn caster(resolution_x: i32) -> RayCaster {
        let mut config = EngineConfig::default();
        config.resolution_x = resolution_x;
        config.resolution_y = 480;
        RayCaster::new(&config)
    }

    fn centered_ctx(resolution_x: usize, direction: f64) -> FrameContext {
        let mut ctx = FrameContext::new(resolution_x);
        ctx.viewer_x = GRID + GRID / 2;
        ctx.viewer_y = GRID + GRID / 2;
        ctx.viewer_height = GRID / 2;
        ctx.viewer_direction = direction;
        ctx
    }

    #[test]
    fn test_center_ray_hits_half_cell_away() {
        // Viewer centered in the single open cell of a 3x3 room: the wall
        // straight ahead is half a cell away, whichever axis it faces.
        let world = closed_room();
        let caster = caster(4);
        // With an even column count, column resolution_x/2 looks exactly
        // along the viewer direction. Rays stepping toward negative axes
        // sample one unit inside the previous cell, hence the extra unit.
        for (direction, expected) in [
            (0.0, GRID / 2),
            (FRAC_PI_2, GRID / 2),
            (PI, GRID / 2 + 1),
            (-FRAC_PI_2, GRID / 2 + 1),
        ] {
            let mut ctx = centered_ctx(4, direction);
            caster.cast(&world, &mut ctx);
            assert_eq!(ctx.distances[2], expected, "direction {direction}");
        }
    }

    #[test]
    fn test_corrected_distance_never_exceeds_radial() {
        let world = closed_room();
        let caster = caster(64);
        let mut ctx = centered_ctx(64, 0.3);
        caster.cast(&world, &mut ctx);
        // Every corrected distance fits inside the 3x3 room's diagonal.
        for i in 0..64 {
            assert!(ctx.distances[i] > 0);
            assert!(ctx.distances[i] <= 3 * GRID);
        }
    }

    #[test]
    fn test_texture_ids_come_from_wall_cells() {
        let matrix = vec![
            vec!['2', '2', '2'],
            vec!['2', '0', '3'],
            vec!['2', '2', '2'],
        ];
        let world = World::new(matrix, GRID);
        let caster = caster(4);
        let mut ctx = centered_ctx(4, 0.0); // facing +x, into the '3' wall
        caster.cast(&world, &mut ctx);
        assert_eq!(ctx.texture_ids[2], 3);

        let mut ctx = centered_ctx(4, PI); // facing -x, into a '2' wall
        caster.cast(&world, &mut ctx);
        assert_eq!(ctx.texture_ids[2], 2);
    }

    #[test]
    fn test_wall_heights_and_band_shift() {
        let world = closed_room();
        let caster = caster(4);
        let mut ctx = centered_ctx(4, 0.0);
        caster.cast(&world, &mut ctx);

        let dpp = caster.distance_to_projection_plane();
        assert_eq!(ctx.wall_heights[2], GRID * dpp / (GRID / 2));
        // Eye at half wall height: no vertical shift.
        assert_eq!(ctx.wall_draw_shift, 0);

        let min_height = *ctx.wall_heights.iter().min().unwrap();
        assert_eq!(ctx.furthest_wall_top, (480 - min_height) / 2);

        // Looking up moves the band down the screen.
        let mut raised = centered_ctx(4, 0.0);
        raised.viewer_height = GRID;
        caster.cast(&world, &mut raised);
        assert_eq!(raised.wall_draw_shift, 480 / 2);
        let min_height = *raised.wall_heights.iter().min().unwrap();
        assert_eq!(raised.furthest_wall_top, (480 - min_height) / 2 - 240);
    }

    #[test]
    fn test_grid_index_is_sub_cell_offset() {
        let world = closed_room();
        let caster = caster(4);
        let mut ctx = centered_ctx(4, 0.0);
        caster.cast(&world, &mut ctx);
        // The straight-ahead ray hits the wall at the viewer's own y offset
        // within the cell.
        assert_eq!(ctx.grid_indexes[2], GRID / 2);
        for i in 0..4 {
            assert!(ctx.grid_indexes[i] >= 0 && ctx.grid_indexes[i] < GRID);
        }
    }
}
