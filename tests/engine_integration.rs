//! Integration tests for the full load-simulate-render path.

use glam::IVec2;
use proptest::prelude::*;

use raca::core::config::EngineConfig;
use raca::core::settings::Settings;
use raca::engine::Engine;
use raca::entity::scan_spawns;
use raca::render::shader::shade;
use raca::render::textures::TextureSet;
use raca::world::loader::parse_level;
use raca::world::World;

const GRID: i32 = 1024;

fn test_config() -> EngineConfig {
    let mut settings = Settings::new();
    settings.put("RESOLUTION_X", 64);
    settings.put("RESOLUTION_Y", 48);
    settings.put("WALL_TEXTURES", 0);
    let config = EngineConfig::from_settings(&settings).unwrap();
    config.validate().unwrap();
    config
}

fn boot(level: &str) -> Engine {
    let world = World::new(parse_level(level).unwrap(), GRID);
    Engine::new(&test_config(), world, TextureSet::empty(), 0).unwrap()
}

#[test]
fn test_level_text_to_populated_world() {
    let mut world = World::new(parse_level("3 3\n111\n1v1\n111").unwrap(), GRID);
    let spawns = scan_spawns(&mut world).unwrap();
    assert_eq!(spawns.entities.len(), 1);
    assert_eq!(spawns.viewer().grid_pos(GRID), IVec2::new(1, 1));
    // Spawn letter consumed; the cell is walkable now.
    assert!(!world.wall_at(GRID + GRID / 2, GRID + GRID / 2));
}

#[test]
fn test_engine_runs_a_level_end_to_end() {
    let mut engine = boot("5 5\n11111\n10001\n10v01\n1n001\n11111");
    let mut frame = vec![0u8; engine.frame_len()];

    engine.key_event(38, true); // forward
    let mut frames = 0;
    for step in 1..=100 {
        let now = step * 5;
        engine.pump(now);
        if engine.render_frame(now, &mut frame) {
            frames += 1;
        }
    }
    // 500 ms: 20 ticks of 25 ms, 50 frames of 10 ms.
    assert_eq!(frames, 50);
    assert!(engine.viewer().velocity > 0.0);
    for px in frame.chunks_exact(4) {
        assert_eq!(px[3], 0xff);
    }
}

#[test]
fn test_tick_total_is_exact_under_uneven_polling() {
    let mut engine = boot("3 3\n111\n1v1\n111");
    let mut total = 0;
    // Irregular poll instants, including a long stall.
    for now in [3u64, 7, 90, 91, 400, 401, 1000] {
        total += engine.pump(now);
    }
    assert_eq!(total, 1000 / 25);
}

#[test]
fn test_forward_drive_never_tunnels_through_walls() {
    let mut engine = boot("4 4\n1111\n1v01\n1001\n1111");
    engine.key_event(38, true);
    for step in 1..=2000 {
        engine.pump(step * 25);
        let viewer = engine.viewer();
        assert!(!engine.world().wall_at(viewer.x, viewer.y));
        // The interior of the collision disc stays out of walls; the rim may
        // rest exactly on a wall boundary.
        let radius = GRID / 5;
        assert!(!engine.world().wall_at(viewer.x + radius - 1, viewer.y));
        assert!(!engine.world().wall_at(viewer.x, viewer.y + radius - 1));
    }
}

#[test]
fn test_world_change_swaps_population() {
    let mut engine = boot("3 3\n111\n1v1\n111");
    let next = World::new(parse_level("5 5\n11111\n10001\n10v01\n1nn01\n11111").unwrap(), GRID);
    engine.change_world(next).unwrap();
    assert_eq!(engine.world().width(), 5);
    assert_eq!(engine.viewer().grid_pos(GRID), IVec2::new(2, 2));
}

proptest! {
    #[test]
    fn test_outside_coordinates_always_walled(
        width in 1usize..12,
        height in 1usize..12,
        x in -100_000i32..200_000,
        y in -100_000i32..200_000,
    ) {
        let world = World::new(vec![vec!['0'; width]; height], GRID);
        let inside = x >= 0
            && y >= 0
            && (x / GRID) < width as i32
            && (y / GRID) < height as i32;
        if !inside {
            prop_assert!(world.wall_at(x, y));
        }
    }

    #[test]
    fn test_shading_monotone_in_distance(
        near in 1i32..1_000_000,
        delta in 1i32..1_000_000,
    ) {
        let far = near + delta;
        let view_distance = 3;
        prop_assert!(shade(near, view_distance, GRID) >= shade(far, view_distance, GRID));
        prop_assert!(shade(far, view_distance, GRID) > 0.0);
    }
}
