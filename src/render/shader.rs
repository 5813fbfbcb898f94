//! Distance shading.

use crate::render::FrameContext;

/// Brightness multiplier for an object at `distance`.
///
/// Hyperbolic falloff, clamped so nearby objects render at full brightness
/// instead of blowing out.
pub fn shade(distance: i32, view_distance: i32, grid_size: i32) -> f32 {
    let intensity = (view_distance * grid_size) as f32 / distance as f32;
    intensity.min(1.0)
}

/// Fills the per-column intensity array from the corrected wall distances.
pub fn shade_columns(ctx: &mut FrameContext, view_distance: i32, grid_size: i32) {
    for i in 0..ctx.distances.len() {
        ctx.intensities[i] = shade(ctx.distances[i], view_distance, grid_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_walls_render_at_full_brightness() {
        assert_eq!(shade(1, 3, 1024), 1.0);
        assert_eq!(shade(3 * 1024, 3, 1024), 1.0);
    }

    #[test]
    fn test_intensity_decreases_monotonically_beyond_threshold() {
        let mut previous = shade(3 * 1024, 3, 1024);
        for distance in (3 * 1024 + 1..20 * 1024).step_by(97) {
            let intensity = shade(distance, 3, 1024);
            assert!(intensity < previous);
            assert!(intensity > 0.0);
            previous = intensity;
        }
    }

    #[test]
    fn test_zero_distance_saturates() {
        // Degenerate input from a viewer inside a wall; must not panic.
        assert_eq!(shade(0, 3, 1024), 1.0);
    }
}
