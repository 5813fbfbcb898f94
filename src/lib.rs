//! RaCa - A 2.5D Grid Ray-Casting Engine

pub mod core;
pub mod editor;
pub mod engine;
pub mod entity;
pub mod input;
pub mod render;
pub mod simulation;
pub mod world;
