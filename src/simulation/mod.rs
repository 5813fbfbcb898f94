//! Simulation: the fixed-tick physics step and its scheduling.

pub mod npc;
pub mod physics;
pub mod scheduler;
