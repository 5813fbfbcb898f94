//! Keyboard input mapped to semantic actions driving the viewer.
//!
//! The frontend delivers key-down/key-up events as integer key codes; this
//! module tracks which actions are held and converts them into acceleration,
//! turn rate, strafe, and look-height deltas once per tick. Nothing here
//! depends on a windowing system.

use crate::core::config::{EngineConfig, KeyBindings};
use crate::entity::Entity;

/// World units the look height moves per tick while a look key is held.
const LOOK_STEP: i32 = 10;

/// The eight semantic movement actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Back,
    TurnLeft,
    TurnRight,
    StrafeLeft,
    StrafeRight,
    LookUp,
    LookDown,
}

impl Action {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        match self {
            Action::Forward => 0,
            Action::Back => 1,
            Action::TurnLeft => 2,
            Action::TurnRight => 3,
            Action::StrafeLeft => 4,
            Action::StrafeRight => 5,
            Action::LookUp => 6,
            Action::LookDown => 7,
        }
    }
}

/// Which actions are currently held.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionState {
    held: [bool; Action::COUNT],
}

impl ActionState {
    pub fn set(&mut self, action: Action, held: bool) {
        self.held[action.index()] = held;
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    pub fn clear(&mut self) {
        self.held = [false; Action::COUNT];
    }
}

/// A keyboard interface to the viewer entity.
pub struct InputController {
    bindings: KeyBindings,
    state: ActionState,
    grid_size: i32,
}

impl InputController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            bindings: config.bindings,
            state: ActionState::default(),
            grid_size: config.grid_size,
        }
    }

    /// Resolves a key code against the current bindings.
    pub fn action_for(&self, key_code: i32) -> Option<Action> {
        let b = &self.bindings;
        match key_code {
            c if c == b.up => Some(Action::Forward),
            c if c == b.down => Some(Action::Back),
            c if c == b.left => Some(Action::TurnLeft),
            c if c == b.right => Some(Action::TurnRight),
            c if c == b.strafe_left => Some(Action::StrafeLeft),
            c if c == b.strafe_right => Some(Action::StrafeRight),
            c if c == b.look_up => Some(Action::LookUp),
            c if c == b.look_down => Some(Action::LookDown),
            _ => None,
        }
    }

    /// Records a key-down or key-up event.
    pub fn key_event(&mut self, key_code: i32, pressed: bool) {
        if let Some(action) = self.action_for(key_code) {
            self.state.set(action, pressed);
        }
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    /// Releases every held action, for world changes and focus loss.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Applies the held actions to the viewer for one tick.
    ///
    /// Sampling happens-before the physics step within a tick, so the derived
    /// acceleration, turn rate and strafe are what physics integrates.
    pub fn apply(&self, viewer: &mut Entity) {
        let limits = viewer.limits();
        let state = &self.state;

        viewer.acceleration = if state.is_held(Action::Forward) {
            limits.acceleration
        } else if state.is_held(Action::Back) {
            -limits.acceleration
        } else {
            0.0
        };

        viewer.direction_change = if state.is_held(Action::TurnLeft) {
            -limits.dir_change_speed
        } else if state.is_held(Action::TurnRight) {
            limits.dir_change_speed
        } else {
            0.0
        };

        viewer.strafe = if state.is_held(Action::StrafeLeft) {
            -1
        } else if state.is_held(Action::StrafeRight) {
            1
        } else {
            0
        };

        if state.is_held(Action::LookUp) {
            viewer.height = (viewer.height + LOOK_STEP).min(self.grid_size);
        } else if state.is_held(Action::LookDown) {
            viewer.height = (viewer.height - LOOK_STEP).max(0);
        }
    }

    /// Rebinds keys and adopts a new world scale.
    pub fn apply_config(&mut self, config: &EngineConfig) {
        self.bindings = config.bindings;
        self.grid_size = config.grid_size;
    }
}
