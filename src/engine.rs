//! The engine aggregate.
//!
//! Owns the world, its entity population and every subsystem, and exposes the
//! two pump points a frontend needs: advance due simulation ticks, render a
//! frame when one is due. Timestamps come from the caller, so the whole
//! engine runs headless under a synthetic clock in tests.

use tracing::{debug, info};

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::entity::{scan_spawns, Entity};
use crate::input::InputController;
use crate::render::textures::TextureSet;
use crate::render::Renderer;
use crate::simulation::npc::NpcController;
use crate::simulation::physics::step_entities;
use crate::simulation::scheduler::TickScheduler;
use crate::world::World;

pub struct Engine {
    world: World,
    entities: Vec<Entity>,
    viewer: usize,
    input: InputController,
    npcs: NpcController,
    scheduler: TickScheduler,
    renderer: Renderer,
}

impl Engine {
    /// Boots the engine in `world`. Fails if the world has no viewer spawn.
    pub fn new(
        config: &EngineConfig,
        mut world: World,
        textures: TextureSet,
        now_ms: u64,
    ) -> Result<Self> {
        let spawns = scan_spawns(&mut world)?;
        info!(
            width = world.width(),
            height = world.height(),
            entities = spawns.entities.len(),
            "world populated"
        );
        Ok(Self {
            world,
            entities: spawns.entities,
            viewer: spawns.viewer,
            input: InputController::new(config),
            npcs: NpcController::new(now_ms),
            scheduler: TickScheduler::new(config, now_ms),
            renderer: Renderer::new(config, textures),
        })
    }

    /// Swaps in a new world, respawning the entity population.
    ///
    /// The new world is validated before anything is replaced; on error the
    /// running world stays untouched.
    pub fn change_world(&mut self, mut world: World) -> Result<()> {
        let spawns = scan_spawns(&mut world)?;
        self.world = world;
        self.entities = spawns.entities;
        self.viewer = spawns.viewer;
        self.input.reset();
        debug!(entities = self.entities.len(), "world changed");
        Ok(())
    }

    /// Forwards a key-down or key-up event to the input layer.
    pub fn key_event(&mut self, key_code: i32, pressed: bool) {
        self.input.key_event(key_code, pressed);
    }

    /// Releases every held key, for focus loss.
    pub fn reset_input(&mut self) {
        self.input.reset();
    }

    /// Runs every simulation tick due at `now_ms`; returns how many ran.
    pub fn pump(&mut self, now_ms: u64) -> u32 {
        let due = self.scheduler.due_ticks(now_ms);
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Renders a frame into `frame` if one is due; returns whether it was.
    pub fn render_frame(&mut self, now_ms: u64, frame: &mut [u8]) -> bool {
        match self.scheduler.frame_due(now_ms) {
            Some(interpolation) => {
                self.renderer.render(
                    &self.world,
                    &self.entities[self.viewer],
                    interpolation,
                    now_ms,
                    frame,
                );
                true
            }
            None => false,
        }
    }

    /// The next instant anything becomes due; frontends sleep until this.
    pub fn next_deadline(&self) -> u64 {
        self.scheduler.next_deadline()
    }

    /// Bytes per frame buffer for the current configuration.
    pub fn frame_len(&self) -> usize {
        self.renderer.frame_len()
    }

    pub fn viewer(&self) -> &Entity {
        &self.entities[self.viewer]
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Broadcasts a configuration change to every subsystem.
    pub fn apply_config(&mut self, config: &EngineConfig, textures: TextureSet) {
        self.world.apply_config(config);
        self.input.apply_config(config);
        self.scheduler.apply_config(config);
        self.renderer.apply_config(config, textures);
    }

    fn tick(&mut self) {
        self.input.apply(&mut self.entities[self.viewer]);
        self.npcs.drive(&mut self.entities);
        step_entities(&self.world, &mut self.entities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EngineError;

    const GRID: i32 = 1024;

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.resolution_x = 16;
        config.resolution_y = 16;
        config.wall_textures = 0;
        config
    }

    fn open_room(size: usize) -> World {
        let mut world = World::new(vec![vec!['0'; size]; size], GRID);
        world.fill_outer_walls();
        world
    }

    fn room_with_viewer(size: usize) -> World {
        let mut world = open_room(size);
        world.set_cell_at_grid(1, 1, 'v');
        world
    }

    fn engine() -> Engine {
        Engine::new(&config(), room_with_viewer(6), TextureSet::empty(), 0).unwrap()
    }

    #[test]
    fn test_boot_requires_a_viewer() {
        match Engine::new(&config(), open_room(4), TextureSet::empty(), 0) {
            Err(EngineError::ViewerMissing) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("engine booted without a viewer"),
        }
    }

    #[test]
    fn test_pump_runs_due_ticks_and_moves_viewer() {
        let mut engine = engine();
        engine.key_event(38, true); // forward
        let (x0, y0) = (engine.viewer().x, engine.viewer().y);
        assert_eq!(engine.pump(250), 10); // 25 ms per tick
        let viewer = engine.viewer();
        assert!(viewer.x != x0 || viewer.y != y0);
        assert!(viewer.velocity > 0.0);
    }

    #[test]
    fn test_change_world_keeps_old_world_on_error() {
        let mut engine = engine();
        let before = engine.world().width();
        let err = engine.change_world(open_room(9)).unwrap_err();
        assert!(matches!(err, EngineError::ViewerMissing));
        assert_eq!(engine.world().width(), before);

        engine.change_world(room_with_viewer(9)).unwrap();
        assert_eq!(engine.world().width(), 9);
    }

    #[test]
    fn test_change_world_releases_held_keys() {
        let mut engine = engine();
        engine.key_event(38, true);
        engine.pump(25);
        engine.change_world(room_with_viewer(6)).unwrap();
        engine.pump(50);
        // No acceleration carried across worlds.
        assert_eq!(engine.viewer().acceleration, 0.0);
    }

    #[test]
    fn test_frames_render_at_their_own_cadence() {
        let mut engine = engine();
        let mut frame = vec![0u8; engine.frame_len()];
        assert!(!engine.render_frame(5, &mut frame)); // 10 ms per frame
        assert!(engine.render_frame(10, &mut frame));
        assert!(!engine.render_frame(15, &mut frame));
        assert_eq!(frame[3], 0xff);
    }

    #[test]
    fn test_apply_config_rebinds_and_resizes() {
        let mut engine = engine();
        let mut next = config();
        next.bindings.up = 500;
        next.resolution_x = 8;
        next.resolution_y = 8;
        engine.apply_config(&next, TextureSet::empty());

        assert_eq!(engine.frame_len(), 8 * 8 * 4);
        engine.key_event(38, true); // old binding, no longer forward
        engine.key_event(500, true);
        engine.pump(25);
        assert!(engine.viewer().acceleration > 0.0);
    }

    #[test]
    fn test_viewer_never_escapes_the_world() {
        let mut engine = engine();
        engine.key_event(38, true);
        for now in 1..400 {
            engine.pump(now * 25);
            let viewer = engine.viewer();
            assert!(!engine.world().wall_at(viewer.x, viewer.y));
        }
    }
}
