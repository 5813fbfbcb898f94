//! Typed engine configuration.
//!
//! The configuration is built once from a [`Settings`](crate::core::settings::Settings)
//! store and passed by reference to each component at construction. Components
//! that cache derived values implement `apply_config` so a settings change can
//! be broadcast synchronously before the next tick or frame runs. There is no
//! ambient global; the world scale (`grid_size`) travels with this struct.

use crate::core::error::Result;
use crate::core::settings::Settings;

/// Key bindings as integer key codes, as stored in the settings file.
///
/// The frontend translates its windowing-system keys to these codes; the
/// engine core never sees a windowing-system type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: i32,
    pub down: i32,
    pub left: i32,
    pub right: i32,
    pub strafe_left: i32,
    pub strafe_right: i32,
    pub look_up: i32,
    pub look_down: i32,
}

/// Engine-wide configuration, resolved from settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on the render rate.
    pub max_fps: i32,
    /// Fixed simulation step length in milliseconds.
    pub ms_per_tick: i32,
    /// Horizontal render resolution (one ray per pixel column).
    pub resolution_x: i32,
    /// Vertical render resolution.
    pub resolution_y: i32,
    /// Cell edge length in overhead-map pixels.
    pub pixels_per_square: i32,
    /// World units per grid cell. Shared by every component that converts
    /// between continuous and cell coordinates.
    pub grid_size: i32,
    /// Horizontal field of view in degrees.
    pub fov: i32,
    /// Number of wall texture images to load (`wall1.png` .. `wallN.png`).
    pub wall_textures: i32,
    /// Shading range in cells: walls closer than `view_distance * grid_size`
    /// are drawn at full brightness.
    pub view_distance: i32,
    /// Draw the FPS overlay.
    pub show_fps: bool,
    pub bindings: KeyBindings,
}

impl EngineConfig {
    /// Resolves a configuration from the given settings.
    ///
    /// Fails only if a required key is missing from both the supplied set and
    /// the defaults, which means the default table itself is incomplete.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            max_fps: settings.get("MAX_FPS")?,
            ms_per_tick: settings.get("MS_PER_TICK")?,
            resolution_x: settings.get("RESOLUTION_X")?,
            resolution_y: settings.get("RESOLUTION_Y")?,
            pixels_per_square: settings.get("PIXELS_PER_SQUARE")?,
            grid_size: settings.get("GRID_SIZE")?,
            fov: settings.get("FOV")?,
            wall_textures: settings.get("WALL_TEXTURES")?,
            view_distance: settings.get("VIEW_DISTANCE")?,
            show_fps: settings.get("SHOW_FPS")? == 1,
            bindings: KeyBindings {
                up: settings.get("KEY_UP")?,
                down: settings.get("KEY_DOWN")?,
                left: settings.get("KEY_LEFT")?,
                right: settings.get("KEY_RIGHT")?,
                strafe_left: settings.get("KEY_STRAFE_LEFT")?,
                strafe_right: settings.get("KEY_STRAFE_RIGHT")?,
                look_up: settings.get("KEY_LOOK_UP")?,
                look_down: settings.get("KEY_LOOK_DOWN")?,
            },
        })
    }

    /// Milliseconds per rendered frame, derived from the FPS cap.
    pub fn ms_per_frame(&self) -> i32 {
        1000 / self.max_fps
    }

    /// Validates the configuration for internal consistency.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_fps <= 0 {
            return Err(format!("MAX_FPS ({}) must be positive", self.max_fps));
        }
        if self.ms_per_tick <= 0 {
            return Err(format!("MS_PER_TICK ({}) must be positive", self.ms_per_tick));
        }
        if self.resolution_x <= 0 || self.resolution_y <= 0 {
            return Err(format!(
                "resolution ({}x{}) must be positive",
                self.resolution_x, self.resolution_y
            ));
        }
        if self.grid_size <= 0 {
            return Err(format!("GRID_SIZE ({}) must be positive", self.grid_size));
        }
        if !(1..180).contains(&self.fov) {
            return Err(format!("FOV ({}) must be in 1..180", self.fov));
        }
        if self.wall_textures < 0 {
            return Err(format!(
                "WALL_TEXTURES ({}) must not be negative",
                self.wall_textures
            ));
        }
        if self.view_distance <= 0 {
            return Err(format!(
                "VIEW_DISTANCE ({}) must be positive",
                self.view_distance
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        // The defaults table is complete, so this cannot fail.
        Self::from_settings(&Settings::defaults())
            .unwrap_or_else(|_| unreachable!("built-in settings defaults are complete"))
    }
}
