//! The physics step: integrates entity motion and resolves grid collisions.
//!
//! Runs once per simulation tick for every entity. The step order is fixed:
//! turn, accelerate (or decay), strafe, propose, resolve collisions, commit.

use crate::entity::Entity;
use crate::world::World;

/// Velocity divisor applied when an entity coasts with zero acceleration.
/// Exponential decay: the speed never snaps to zero, it fades below notice.
const FRICTION_DIVISOR: f64 = 1.4;

/// Acceleration magnitudes below this count as "not accelerating" for the
/// strafe rules.
const ACCEL_EPSILON: f64 = 0.1;

/// Advances every entity one tick.
pub fn step_entities(world: &World, entities: &mut [Entity]) {
    for entity in entities.iter_mut() {
        step_entity(world, entity);
    }
}

/// Advances a single entity one tick.
pub fn step_entity(world: &World, entity: &mut Entity) {
    let limits = entity.limits();
    entity.direction += entity.direction_change;
    let mut effective_direction = entity.direction;

    entity.velocity += entity.acceleration;
    if entity.velocity > limits.max_vel {
        entity.velocity = limits.max_vel;
    } else if entity.velocity < -limits.max_vel {
        entity.velocity = -limits.max_vel;
    } else if entity.acceleration == 0.0 {
        entity.velocity /= FRICTION_DIVISOR;
    }

    let mut effective_velocity = entity.velocity;
    if entity.strafe != 0 {
        if entity.acceleration.abs() < ACCEL_EPSILON {
            // Pure sideways step: full speed regardless of current velocity.
            effective_direction += f64::from(entity.strafe) * std::f64::consts::FRAC_PI_2;
            effective_velocity = limits.max_vel;
        } else if entity.velocity > 0.0 {
            // Diagonal skew, mirrored when moving backward.
            effective_direction += f64::from(entity.strafe) * std::f64::consts::FRAC_PI_4;
        } else {
            effective_direction -= f64::from(entity.strafe) * std::f64::consts::FRAC_PI_4;
        }
    }

    entity.new_x = entity.x + (effective_velocity * effective_direction.cos()) as i32;
    entity.new_y = entity.y + (effective_velocity * effective_direction.sin()) as i32;
    resolve_collision(world, entity);
}

/// Clamps the proposed position out of walls, then commits it.
///
/// The Y axis is checked first, then X against the already-clamped Y. Diagonal
/// motion into a corner therefore slides along the X check; that ordering is
/// the canonical corner tie-break.
fn resolve_collision(world: &World, entity: &mut Entity) {
    // Safe distance to a wall; keeps the view from clipping into wall faces.
    let radius = world.grid_size() / 5;

    if world.wall_at(entity.x, entity.new_y - radius) {
        entity.new_y = world.snap(entity.y) + radius;
    } else if world.wall_at(entity.x, entity.new_y + radius) {
        entity.new_y = world.snap(entity.new_y + radius) - radius;
    }
    if world.wall_at(entity.new_x - radius, entity.new_y) {
        entity.new_x = world.snap(entity.x) + radius;
    } else if world.wall_at(entity.new_x + radius, entity.new_y) {
        entity.new_x = world.snap(entity.new_x + radius) - radius;
    }

    entity.x = entity.new_x;
    entity.y = entity.new_y;
}
