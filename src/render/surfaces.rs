//! Precomputed floor and ceiling bands.
//!
//! Each screen row below the horizon sees the floor at a fixed distance, so
//! its shading never changes between frames. Both bands are computed once per
//! configuration as one color per row; the ceiling is the floor band mirrored
//! about the horizon in a darker base color.

use crate::core::config::EngineConfig;
use crate::render::shader::shade;

const FLOOR_BASE: [u8; 3] = [192, 192, 192];
const CEILING_BASE: [u8; 3] = [64, 64, 64];

pub struct SurfaceBands {
    pub floor_rows: Vec<[u8; 3]>,
    pub ceiling_rows: Vec<[u8; 3]>,
}

impl SurfaceBands {
    pub fn new(config: &EngineConfig, distance_to_projection_plane: i32) -> Self {
        let resolution_y = config.resolution_y as usize;
        // Shading assumes the eye at half wall height; the per-frame band
        // offset handles looking up and down.
        let eye_height = config.grid_size / 2;
        let rads_per_row = (1.0 / f64::from(distance_to_projection_plane)).atan();
        let mut angle = 1e-20f64; // avoids division by zero on the horizon row

        let mut intensities = Vec::with_capacity(resolution_y);
        for _ in 0..resolution_y {
            let distance = (f64::from(eye_height) / angle.sin()) as i32;
            intensities.push(shade(distance, config.view_distance, config.grid_size));
            angle += rads_per_row;
        }

        let floor_rows = intensities.iter().map(|&i| scale(FLOOR_BASE, i)).collect();
        let ceiling_rows = intensities
            .iter()
            .rev()
            .map(|&i| scale(CEILING_BASE, i))
            .collect();

        SurfaceBands {
            floor_rows,
            ceiling_rows,
        }
    }
}

fn scale(base: [u8; 3], intensity: f32) -> [u8; 3] {
    [
        (base[0] as f32 * intensity) as u8,
        (base[1] as f32 * intensity) as u8,
        (base[2] as f32 * intensity) as u8,
    ]
}
