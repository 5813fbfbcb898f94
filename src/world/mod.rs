//! The grid world: a char matrix of walls and empty cells.
//!
//! Cell codes: `'0'` is empty, `'1'`..`'9'` are wall variants (the digit picks
//! the wall texture), letters are entity spawn markers that are consumed and
//! cleared when the world is populated.

pub mod loader;

use glam::IVec2;

use crate::core::config::EngineConfig;

/// A level: immutable-shape char matrix plus the world scale.
///
/// Continuous coordinates are in world units; each cell spans `grid_size`
/// units per axis. Everything outside the matrix counts as solid wall, so
/// rays and entities can never escape the level.
pub struct World {
    width: usize,
    height: usize,
    matrix: Vec<Vec<char>>,
    grid_size: i32,
}

impl World {
    /// Constructs a world from a parsed level matrix.
    pub fn new(matrix: Vec<Vec<char>>, grid_size: i32) -> Self {
        let mut world = Self {
            width: 0,
            height: 0,
            matrix: Vec::new(),
            grid_size,
        };
        world.re_init(matrix);
        world
    }

    /// Re-seeds the world in place with a new matrix.
    ///
    /// Used when the same world instance is shared between the engine and the
    /// level editor, so dependent views need not be recreated.
    pub fn re_init(&mut self, matrix: Vec<Vec<char>>) {
        self.width = matrix.first().map_or(0, |row| row.len());
        self.height = matrix.len();
        self.matrix = matrix;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    /// Checks for a solid wall at continuous world coordinates.
    ///
    /// Any coordinate outside the matrix is a wall: the level has an implicit
    /// infinite border.
    pub fn wall_at(&self, x: i32, y: i32) -> bool {
        match self.cell_index(x, y) {
            Some((cx, cy)) => self.matrix[cy][cx] != '0',
            None => true,
        }
    }

    /// Returns the cell code at continuous world coordinates.
    ///
    /// Out-of-bounds lookups report `'1'` so a ray that leaves the matrix
    /// still yields a drawable wall texture.
    pub fn cell_at(&self, x: i32, y: i32) -> char {
        match self.cell_index(x, y) {
            Some((cx, cy)) => self.matrix[cy][cx],
            None => '1',
        }
    }

    /// Rounds a world coordinate down to the origin of its cell.
    pub fn snap(&self, position: i32) -> i32 {
        position / self.grid_size * self.grid_size
    }

    /// Cell code at grid coordinates. Callers must stay in bounds.
    pub fn cell_at_grid(&self, x: usize, y: usize) -> char {
        self.matrix[y][x]
    }

    /// Writes a cell code at grid coordinates.
    pub fn set_cell_at_grid(&mut self, x: usize, y: usize, code: char) {
        self.matrix[y][x] = code;
    }

    /// Forces the outermost ring of cells to wall code `'1'`, guaranteeing
    /// entities can never be placed in an unbounded border gap.
    pub fn fill_outer_walls(&mut self) {
        for x in 0..self.width {
            self.matrix[0][x] = '1';
            self.matrix[self.height - 1][x] = '1';
        }
        for y in 0..self.height {
            self.matrix[y][0] = '1';
            self.matrix[y][self.width - 1] = '1';
        }
    }

    /// True if the grid position lies strictly inside the outer wall ring.
    pub fn inside_world(&self, pos: IVec2) -> bool {
        pos.x >= 1
            && pos.y >= 1
            && (pos.x as usize) < self.width.saturating_sub(1)
            && (pos.y as usize) < self.height.saturating_sub(1)
    }

    /// Deep copy of the level matrix, for the editor's test-run worlds.
    pub fn copy_matrix(&self) -> Vec<Vec<char>> {
        self.matrix.clone()
    }

    pub fn matrix(&self) -> &[Vec<char>] {
        &self.matrix
    }

    /// Adopts a new world scale. Already-placed entities are not repositioned;
    /// callers that change `grid_size` mid-run must re-spawn or reposition
    /// them.
    pub fn apply_config(&mut self, config: &EngineConfig) {
        self.grid_size = config.grid_size;
    }

    fn cell_index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 {
            return None;
        }
        let cx = (x / self.grid_size) as usize;
        let cy = (y / self.grid_size) as usize;
        if cx >= self.width || cy >= self.height {
            return None;
        }
        Some((cx, cy))
    }
}
