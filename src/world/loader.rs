//! Level file parsing and persistence.
//!
//! Format: the first line is `"<width> <height>"`, followed by exactly
//! `height` lines of exactly `width` cell codes each.

use std::path::Path;

use crate::core::error::{EngineError, Result};
use crate::world::World;

/// Parses level text into a matrix for [`World::new`].
///
/// Each malformation is a distinct error: a bad header, too few data lines,
/// and a line of the wrong width are reported separately so the editor can
/// tell the user what to fix.
pub fn parse_level(text: &str) -> Result<Vec<Vec<char>>> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| EngineError::MalformedLevelHeader("empty level file".to_string()))?;

    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(EngineError::MalformedLevelHeader(format!(
            "expected \"<width> <height>\", got \"{header}\""
        )));
    }
    let width: usize = tokens[0].parse().map_err(|_| {
        EngineError::MalformedLevelHeader(format!("width \"{}\" is not a number", tokens[0]))
    })?;
    let height: usize = tokens[1].parse().map_err(|_| {
        EngineError::MalformedLevelHeader(format!("height \"{}\" is not a number", tokens[1]))
    })?;

    let mut matrix = Vec::with_capacity(height);
    for i in 0..height {
        let line = lines.next().ok_or(EngineError::LevelHeightMismatch {
            expected: height,
            found: i,
        })?;
        let row: Vec<char> = line.chars().collect();
        if row.len() != width {
            return Err(EngineError::LevelWidthMismatch {
                line: i,
                expected: width,
                found: row.len(),
            });
        }
        matrix.push(row);
    }
    Ok(matrix)
}

/// Loads and parses a level file from disk.
pub fn load_level(path: &Path) -> Result<Vec<Vec<char>>> {
    let text = std::fs::read_to_string(path)?;
    parse_level(&text)
}

/// Writes a world back out in the level file format.
pub fn save_level(world: &World, path: &Path) -> Result<()> {
    let mut out = format!("{} {}\n", world.width(), world.height());
    for row in world.matrix() {
        out.extend(row.iter());
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}
