//! The renderer: turns the predicted viewer pose into an RGBA frame.
//!
//! The pipeline is pure CPU and writes into a caller-supplied buffer, so it
//! runs identically under a window surface or headless in tests. Stages run
//! in a fixed order each frame: predict, cast, shade, then composite the
//! ceiling and floor bands and the wall strips.

pub mod caster;
pub mod predictor;
pub mod shader;
pub mod strips;
pub mod surfaces;
pub mod textures;

use crate::core::config::EngineConfig;
use crate::entity::Entity;
use crate::render::caster::RayCaster;
use crate::render::surfaces::SurfaceBands;
use crate::render::textures::TextureSet;
use crate::world::World;

const UNTEXTURED_WALL: [u8; 3] = [64, 64, 64];
const FPS_COLOR: [u8; 3] = [255, 0, 0];

/// Per-frame scratch state shared by the render stages.
///
/// Every field is rewritten from scratch each frame, so no stage can observe
/// a value left over from the previous one.
pub struct FrameContext {
    pub viewer_x: i32,
    pub viewer_y: i32,
    pub viewer_direction: f64,
    pub viewer_height: i32,
    pub distances: Vec<i32>,
    pub wall_heights: Vec<i32>,
    pub grid_indexes: Vec<i32>,
    pub texture_ids: Vec<i32>,
    pub intensities: Vec<f32>,
    pub wall_draw_shift: i32,
    pub furthest_wall_top: i32,
}

impl FrameContext {
    pub fn new(resolution_x: usize) -> Self {
        Self {
            viewer_x: 0,
            viewer_y: 0,
            viewer_direction: 0.0,
            viewer_height: 0,
            distances: vec![0; resolution_x],
            wall_heights: vec![0; resolution_x],
            grid_indexes: vec![0; resolution_x],
            texture_ids: vec![0; resolution_x],
            intensities: vec![0.0; resolution_x],
            wall_draw_shift: 0,
            furthest_wall_top: 0,
        }
    }
}

/// Composites frames from the viewer's point of view.
pub struct Renderer {
    caster: RayCaster,
    textures: TextureSet,
    surfaces: SurfaceBands,
    ctx: FrameContext,
    resolution_x: i32,
    resolution_y: i32,
    view_distance: i32,
    grid_size: i32,
    show_fps: bool,
    last_draw_ms: u64,
}

impl Renderer {
    pub fn new(config: &EngineConfig, textures: TextureSet) -> Self {
        let caster = RayCaster::new(config);
        let surfaces = SurfaceBands::new(config, caster.distance_to_projection_plane());
        Self {
            surfaces,
            textures,
            ctx: FrameContext::new(config.resolution_x as usize),
            resolution_x: config.resolution_x,
            resolution_y: config.resolution_y,
            view_distance: config.view_distance,
            grid_size: config.grid_size,
            show_fps: config.show_fps,
            last_draw_ms: 0,
            caster,
        }
    }

    /// Bytes per frame for the configured resolution (RGBA).
    pub fn frame_len(&self) -> usize {
        (self.resolution_x * self.resolution_y * 4) as usize
    }

    pub fn apply_config(&mut self, config: &EngineConfig, textures: TextureSet) {
        self.caster.apply_config(config);
        self.surfaces = SurfaceBands::new(config, self.caster.distance_to_projection_plane());
        self.textures = textures;
        self.ctx = FrameContext::new(config.resolution_x as usize);
        self.resolution_x = config.resolution_x;
        self.resolution_y = config.resolution_y;
        self.view_distance = config.view_distance;
        self.grid_size = config.grid_size;
        self.show_fps = config.show_fps;
    }

    /// Renders one frame into `frame` (RGBA, `frame_len()` bytes).
    ///
    /// `interpolation` is the tick fraction used to predict the viewer pose;
    /// `now_ms` only feeds the FPS overlay.
    pub fn render(
        &mut self,
        world: &World,
        viewer: &Entity,
        interpolation: f64,
        now_ms: u64,
        frame: &mut [u8],
    ) {
        let pose = predictor::predict(viewer, interpolation);
        self.ctx.viewer_x = pose.x;
        self.ctx.viewer_y = pose.y;
        self.ctx.viewer_direction = pose.direction;
        self.ctx.viewer_height = viewer.height;

        self.caster.cast(world, &mut self.ctx);
        shader::shade_columns(&mut self.ctx, self.view_distance, self.grid_size);

        frame.fill(0);
        let shift = self.ctx.wall_draw_shift;
        self.blit_band(frame, &self.surfaces.ceiling_rows, -self.resolution_y / 2 - shift);
        self.blit_band(frame, &self.surfaces.floor_rows, self.resolution_y / 2 - shift);
        self.draw_walls(frame);

        if self.show_fps {
            let fps = 1000 / (now_ms - self.last_draw_ms).max(1);
            self.last_draw_ms = now_ms;
            self.draw_fps(frame, fps as u32);
        }
        for px in frame.chunks_exact_mut(4) {
            px[3] = 0xff;
        }
    }

    fn blit_band(&self, frame: &mut [u8], rows: &[[u8; 3]], y_offset: i32) {
        for (row, color) in rows.iter().enumerate() {
            let y = y_offset + row as i32;
            if y < 0 || y >= self.resolution_y {
                continue;
            }
            let start = (y * self.resolution_x * 4) as usize;
            for px in frame[start..start + self.resolution_x as usize * 4].chunks_exact_mut(4) {
                px[..3].copy_from_slice(color);
            }
        }
    }

    fn draw_walls(&self, frame: &mut [u8]) {
        for i in 0..self.resolution_x as usize {
            let height = self.ctx.wall_heights[i];
            let top = (self.resolution_y - height) / 2 - self.ctx.wall_draw_shift;
            let intensity = self.ctx.intensities[i];

            let strip = if self.textures.is_empty() {
                None
            } else {
                Some(strips::select_strip(
                    self.textures.count(),
                    self.textures.width(),
                    self.ctx.texture_ids[i],
                    self.ctx.grid_indexes[i],
                    self.grid_size,
                ))
            };

            let y_start = top.max(0);
            let y_end = (top + height).min(self.resolution_y);
            for y in y_start..y_end {
                let color = match strip {
                    Some((id, column)) => {
                        // Texture height equals the screen height, scaled to
                        // the projected wall height.
                        let texel_row = (y - top) * self.resolution_y / height;
                        scale(self.textures.texel(id, column, texel_row), intensity)
                    }
                    None => scale(UNTEXTURED_WALL, intensity),
                };
                let at = ((y * self.resolution_x + i as i32) * 4) as usize;
                frame[at..at + 3].copy_from_slice(&color);
            }
        }
    }

    // 3x5 block digits, one bitmask row per byte, drawn at 2x.
    fn draw_fps(&self, frame: &mut [u8], fps: u32) {
        const DIGITS: [[u8; 5]; 10] = [
            [0b111, 0b101, 0b101, 0b101, 0b111],
            [0b010, 0b110, 0b010, 0b010, 0b111],
            [0b111, 0b001, 0b111, 0b100, 0b111],
            [0b111, 0b001, 0b111, 0b001, 0b111],
            [0b101, 0b101, 0b111, 0b001, 0b001],
            [0b111, 0b100, 0b111, 0b001, 0b111],
            [0b111, 0b100, 0b111, 0b101, 0b111],
            [0b111, 0b001, 0b001, 0b001, 0b001],
            [0b111, 0b101, 0b111, 0b101, 0b111],
            [0b111, 0b101, 0b111, 0b001, 0b111],
        ];
        const SCALE: i32 = 2;

        let digits: Vec<u32> = {
            let mut out = Vec::new();
            let mut value = fps;
            loop {
                out.push(value % 10);
                value /= 10;
                if value == 0 {
                    break;
                }
            }
            out.reverse();
            out
        };

        let mut x0 = 5;
        for digit in digits {
            let glyph = &DIGITS[digit as usize];
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) == 0 {
                        continue;
                    }
                    for dy in 0..SCALE {
                        for dx in 0..SCALE {
                            let x = x0 + col * SCALE + dx;
                            let y = 5 + row as i32 * SCALE + dy;
                            if x < self.resolution_x && y < self.resolution_y {
                                let at = ((y * self.resolution_x + x) * 4) as usize;
                                frame[at..at + 3].copy_from_slice(&FPS_COLOR);
                            }
                        }
                    }
                }
            }
            x0 += 4 * SCALE;
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

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    const GRID: i32 = 1024;

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.resolution_x = 16;
        config.resolution_y = 16;
        config.wall_textures = 0;
        config.show_fps = false;
        config
    }

    fn closed_room() -> World {
        let mut world = World::new(vec![vec!['0'; 3]; 3], GRID);
        world.fill_outer_walls();
        world
    }

    #[test]
    fn test_renders_opaque_frame() {
        let world = closed_room();
        let viewer = Entity::spawn_at(IVec2::new(1, 1), 'v', GRID);
        let mut renderer = Renderer::new(&small_config(), TextureSet::empty());
        let mut frame = vec![0u8; renderer.frame_len()];
        renderer.render(&world, &viewer, 1.0, 0, &mut frame);
        for px in frame.chunks_exact(4) {
            assert_eq!(px[3], 0xff);
        }
    }

    #[test]
    fn test_untextured_walls_darker_than_floor() {
        // A wider room keeps the facing wall small enough to leave floor
        // visible at the bottom of the frame.
        let mut world = World::new(vec![vec!['0'; 5]; 5], GRID);
        world.fill_outer_walls();
        let viewer = Entity::spawn_at(IVec2::new(1, 1), 'v', GRID);
        let mut renderer = Renderer::new(&small_config(), TextureSet::empty());
        let mut frame = vec![0u8; renderer.frame_len()];
        renderer.render(&world, &viewer, 1.0, 0, &mut frame);
        // Center pixel is wall (walls half a cell away fill the view);
        // bottom row is floor.
        let center = ((8 * 16 + 8) * 4) as usize;
        let bottom = ((15 * 16 + 8) * 4) as usize;
        assert!(frame[center] <= 64);
        assert!(frame[bottom] > frame[center]);
    }

    #[test]
    fn test_fps_overlay_paints_red() {
        let world = closed_room();
        let viewer = Entity::spawn_at(IVec2::new(1, 1), 'v', GRID);
        let mut config = small_config();
        config.resolution_x = 64;
        config.resolution_y = 64;
        config.show_fps = true;
        let mut renderer = Renderer::new(&config, TextureSet::empty());
        let mut frame = vec![0u8; renderer.frame_len()];
        renderer.render(&world, &viewer, 1.0, 0, &mut frame);
        renderer.render(&world, &viewer, 1.0, 100, &mut frame); // 10 fps
        let red = frame
            .chunks_exact(4)
            .any(|px| px[0] == 255 && px[1] == 0 && px[2] == 0);
        assert!(red);
    }
}
