//! Autonomous steering for NPC entities.
//!
//! A deliberately small wander behavior: each NPC periodically re-rolls a
//! turn impulse and decides whether to push forward. The physics step does
//! the rest; NPCs collide with walls like every other entity.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::entity::{Entity, EntityKind};

/// Ticks between wander re-rolls, inclusive bounds.
const RETARGET_TICKS: std::ops::RangeInclusive<u32> = 20..=60;

/// Chance per re-roll that an NPC pushes forward instead of coasting.
const ADVANCE_CHANCE: f64 = 0.7;

/// Drives every NPC entity with random wander impulses.
///
/// Seeded explicitly so a fixed seed replays the same wander, which keeps
/// simulation runs reproducible.
pub struct NpcController {
    rng: ChaCha8Rng,
    ticks_until_retarget: u32,
}

impl NpcController {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ticks_until_retarget: 0,
        }
    }

    /// Samples wander intent for this tick. Call before the physics step.
    pub fn drive(&mut self, entities: &mut [Entity]) {
        if self.ticks_until_retarget > 0 {
            self.ticks_until_retarget -= 1;
            return;
        }
        self.ticks_until_retarget = self.rng.gen_range(RETARGET_TICKS);

        for entity in entities.iter_mut().filter(|e| e.kind == EntityKind::Npc) {
            let limits = entity.limits();
            entity.direction_change = self
                .rng
                .gen_range(-limits.dir_change_speed..=limits.dir_change_speed);
            entity.acceleration = if self.rng.gen_bool(ADVANCE_CHANCE) {
                limits.acceleration
            } else {
                0.0
            };
        }
    }
}
