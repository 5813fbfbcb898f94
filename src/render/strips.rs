//! Maps wall hits to texture strips.

/// Selects the texture id and texture column for one wall strip.
///
/// Wall cell codes outside the loaded set fall back to texture 1. The
/// sub-cell hit offset scales linearly onto the texture width.
pub fn select_strip(
    texture_count: i32,
    texture_width: i32,
    texture_id: i32,
    grid_index: i32,
    grid_size: i32,
) -> (i32, i32) {
    let id = if texture_id < 1 || texture_id > texture_count {
        1
    } else {
        texture_id
    };
    let column = grid_index * texture_width / grid_size;
    (id, column.clamp(0, texture_width - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_offset_scales_onto_texture_width() {
        assert_eq!(select_strip(3, 480, 2, 0, 1024), (2, 0));
        assert_eq!(select_strip(3, 480, 2, 512, 1024), (2, 240));
        assert_eq!(select_strip(3, 480, 2, 1023, 1024), (2, 479));
    }

    #[test]
    fn test_unknown_wall_code_falls_back_to_first_texture() {
        assert_eq!(select_strip(3, 480, 9, 0, 1024).0, 1);
        assert_eq!(select_strip(3, 480, 0, 0, 1024).0, 1);
    }
}
