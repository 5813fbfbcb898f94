//! Pose prediction between simulation ticks.

use crate::entity::Entity;

/// A predicted viewer pose for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: i32,
    pub y: i32,
    pub direction: f64,
}

/// Extrapolates an entity's pose by `interpolation` of a tick.
///
/// Direction extrapolates forward along the current turn rate. Position
/// extrapolates along the committed-minus-proposed delta, which points
/// opposite the motion; frames therefore trail the simulation by up to one
/// tick rather than leading it, and can never show a pose the collision pass
/// has not yet vetted.
pub fn predict(entity: &Entity, interpolation: f64) -> Pose {
    Pose {
        x: (f64::from(entity.x) + f64::from(entity.x - entity.new_x) * interpolation) as i32,
        y: (f64::from(entity.y) + f64::from(entity.y - entity.new_y) * interpolation) as i32,
        direction: entity.direction_change * interpolation + entity.direction,
    }
}
