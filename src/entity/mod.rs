//! Entities: continuous-space actors living in the grid world.
//!
//! There is no subclassing; an entity's physical limits come from its
//! [`EntityKind`] variant, fixed at creation.

use glam::IVec2;

use crate::core::error::{EngineError, Result};
use crate::world::World;

/// Per-kind physical limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_vel: f64,
    pub acceleration: f64,
    pub dir_change_speed: f64,
}

/// The three entity variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Fast, player-controlled.
    Viewer,
    /// Slow, autonomous.
    Npc,
    /// Immobile scenery.
    Static,
}

impl EntityKind {
    pub fn limits(self) -> Limits {
        match self {
            EntityKind::Viewer => Limits {
                max_vel: 100.0,
                acceleration: 30.0,
                dir_change_speed: 0.1,
            },
            EntityKind::Npc => Limits {
                max_vel: 20.0,
                acceleration: 10.0,
                dir_change_speed: 0.2,
            },
            EntityKind::Static => Limits {
                max_vel: 0.0,
                acceleration: 0.0,
                dir_change_speed: 0.0,
            },
        }
    }

    /// Maps a level-file spawn letter to a kind. Unrecognized letters spawn
    /// immobile scenery.
    pub fn from_spawn_code(code: char) -> Self {
        match code {
            'v' => EntityKind::Viewer,
            'n' => EntityKind::Npc,
            _ => EntityKind::Static,
        }
    }
}

/// A single actor: committed pose plus the proposed next position.
///
/// Positions are integer world units. `new_x`/`new_y` carry the intent of the
/// current physics step until collision resolution commits them.
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: i32,
    pub y: i32,
    pub new_x: i32,
    pub new_y: i32,
    /// Facing in radians.
    pub direction: f64,
    pub velocity: f64,
    pub acceleration: f64,
    /// Turn rate applied each tick, in radians.
    pub direction_change: f64,
    /// -1 left, 0 none, 1 right.
    pub strafe: i32,
    /// Vertical look offset in world units, clamped to `[0, grid_size]`.
    pub height: i32,
}

impl Entity {
    pub fn new(kind: EntityKind, grid_size: i32) -> Self {
        Self {
            kind,
            x: 0,
            y: 0,
            new_x: 0,
            new_y: 0,
            direction: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
            direction_change: 0.0,
            strafe: 0,
            // Eye level at half wall height.
            height: grid_size / 2,
        }
    }

    pub fn limits(&self) -> Limits {
        self.kind.limits()
    }

    /// Creates an entity of the kind named by a spawn code, centered in the
    /// given grid cell.
    pub fn spawn_at(grid_pos: IVec2, code: char, grid_size: i32) -> Self {
        let mut entity = Self::new(EntityKind::from_spawn_code(code), grid_size);
        entity.x = grid_pos.x * grid_size + grid_size / 2;
        entity.y = grid_pos.y * grid_size + grid_size / 2;
        entity.new_x = entity.x;
        entity.new_y = entity.y;
        entity
    }

    /// The entity's grid cell.
    pub fn grid_pos(&self, grid_size: i32) -> IVec2 {
        IVec2::new(self.x / grid_size, self.y / grid_size)
    }
}

/// The entity population of a world, with the viewer singled out.
pub struct SpawnSet {
    pub entities: Vec<Entity>,
    /// Index of the viewer entity in `entities`.
    pub viewer: usize,
}

impl SpawnSet {
    pub fn viewer(&self) -> &Entity {
        &self.entities[self.viewer]
    }

    pub fn viewer_mut(&mut self) -> &mut Entity {
        &mut self.entities[self.viewer]
    }
}

/// Scans the world for spawn letters, creating an entity for each and
/// clearing the letter from the matrix.
///
/// Exactly one viewer must be present; a world without one is unusable for
/// rendering and is rejected. If several viewers are present the last one
/// scanned wins.
pub fn scan_spawns(world: &mut World) -> Result<SpawnSet> {
    let mut entities = Vec::new();
    let mut viewer = None;
    let grid_size = world.grid_size();

    for y in 0..world.height() {
        for x in 0..world.width() {
            let code = world.cell_at_grid(x, y);
            if code.is_ascii_alphabetic() {
                if code == 'v' {
                    viewer = Some(entities.len());
                }
                entities.push(Entity::spawn_at(
                    IVec2::new(x as i32, y as i32),
                    code,
                    grid_size,
                ));
                world.set_cell_at_grid(x, y, '0');
            }
        }
    }

    let viewer = viewer.ok_or(EngineError::ViewerMissing)?;
    Ok(SpawnSet { entities, viewer })
}
