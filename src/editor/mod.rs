//! Headless level editing.
//!
//! Owns a working copy of a level and enforces the placement rules; a GUI or
//! test drives it through cell-level operations. The edited matrix still
//! carries spawn letters, they are only consumed when a world is handed to
//! the engine for a test run.

use std::path::Path;

use glam::IVec2;
use tracing::warn;

use crate::core::error::{EngineError, Result};
use crate::world::loader::{load_level, save_level};
use crate::world::World;

const FRESH_WIDTH: usize = 10;
const FRESH_HEIGHT: usize = 10;

/// The editor's working level and viewer bookkeeping.
pub struct LevelEditor {
    world: World,
    viewer_pos: Option<IVec2>,
}

impl LevelEditor {
    /// Starts with a fresh empty level, viewer in the upper-left corner.
    pub fn new(grid_size: i32) -> Self {
        let mut editor = Self {
            world: World::new(vec![vec!['0']], grid_size),
            viewer_pos: None,
        };
        editor.new_level(FRESH_WIDTH, FRESH_HEIGHT);
        editor
    }

    /// Replaces the level with an empty walled room of the given size.
    pub fn new_level(&mut self, width: usize, height: usize) {
        let mut matrix = vec![vec!['0'; width]; height];
        matrix[1][1] = 'v';
        self.world.re_init(matrix);
        self.world.fill_outer_walls();
        self.viewer_pos = Some(IVec2::new(1, 1));
    }

    /// Places a wall cell. Refused on the viewer's cell so a test run cannot
    /// start inside a wall.
    pub fn place_wall(&mut self, cell: IVec2, code: char) {
        if !self.world.inside_world(cell) || !code.is_ascii_digit() || code == '0' {
            return;
        }
        if self.viewer_pos == Some(cell) {
            return;
        }
        self.world
            .set_cell_at_grid(cell.x as usize, cell.y as usize, code);
    }

    /// Places the viewer, clearing its previous cell.
    pub fn place_viewer(&mut self, cell: IVec2) {
        if !self.world.inside_world(cell) {
            return;
        }
        if let Some(previous) = self.viewer_pos {
            self.world
                .set_cell_at_grid(previous.x as usize, previous.y as usize, '0');
        }
        self.world
            .set_cell_at_grid(cell.x as usize, cell.y as usize, 'v');
        self.viewer_pos = Some(cell);
    }

    /// Places a non-viewer spawn marker. Overwriting the viewer's cell
    /// leaves the level without a viewer until a new one is placed.
    pub fn place_spawn(&mut self, cell: IVec2, code: char) {
        if !self.world.inside_world(cell) || !code.is_ascii_lowercase() || code == 'v' {
            return;
        }
        if self.viewer_pos == Some(cell) {
            self.viewer_pos = None;
        }
        self.world
            .set_cell_at_grid(cell.x as usize, cell.y as usize, code);
    }

    /// Clears a cell. Deleting the viewer leaves the level unsaveable until
    /// a new viewer is placed.
    pub fn delete(&mut self, cell: IVec2) {
        if !self.world.inside_world(cell) {
            return;
        }
        if self.viewer_pos == Some(cell) {
            self.viewer_pos = None;
        }
        self.world
            .set_cell_at_grid(cell.x as usize, cell.y as usize, '0');
    }

    /// Loads a level file into the editor. A corrupt or unreadable file is
    /// replaced by a fresh level; returns whether the file loaded cleanly.
    pub fn load(&mut self, path: &Path) -> bool {
        match load_level(path) {
            Ok(matrix) => {
                self.world.re_init(matrix);
                self.viewer_pos = find_viewer(&self.world);
                true
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "corrupt level, starting fresh");
                self.new_level(FRESH_WIDTH, FRESH_HEIGHT);
                false
            }
        }
    }

    /// Saves the level. A level without a viewer cannot be saved; the matrix
    /// is re-scanned so the check cannot trust a stale cached position.
    pub fn save(&self, path: &Path) -> Result<()> {
        if find_viewer(&self.world).is_none() {
            return Err(EngineError::ViewerMissing);
        }
        save_level(&self.world, path)
    }

    /// An independent copy of the level for a test run in the engine.
    pub fn test_world(&self) -> World {
        World::new(self.world.copy_matrix(), self.world.grid_size())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn viewer_pos(&self) -> Option<IVec2> {
        self.viewer_pos
    }
}

fn find_viewer(world: &World) -> Option<IVec2> {
    for y in 0..world.height() {
        for x in 0..world.width() {
            if world.cell_at_grid(x, y) == 'v' {
                return Some(IVec2::new(x as i32, y as i32));
            }
        }
    }
    None
}
