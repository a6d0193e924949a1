//! Point patterns for arrays of features.

use glam::DVec2;

/// Grid of `x_count` by `y_count` points centred on the origin.
pub fn rect_array(x_spacing: f64, y_spacing: f64, x_count: u32, y_count: u32) -> Vec<DVec2> {
    let x_offset = x_count.saturating_sub(1) as f64 * x_spacing / 2.0;
    let y_offset = y_count.saturating_sub(1) as f64 * y_spacing / 2.0;
    (0..x_count)
        .flat_map(|i| {
            (0..y_count).map(move |j| {
                DVec2::new(
                    i as f64 * x_spacing - x_offset,
                    j as f64 * y_spacing - y_offset,
                )
            })
        })
        .collect()
}

/// `count` points on a circle of `radius`, starting at `start_angle` and
/// spread over `angle` (both in degrees).
///
/// A full turn places the points `360 / count` apart so the first and last
/// do not coincide; any other sweep includes both end points.
pub fn polar_array(radius: f64, start_angle: f64, angle: f64, count: u32) -> Vec<DVec2> {
    let remainder = angle.abs() % 360.0;
    let full_turn = angle != 0.0 && remainder.min(360.0 - remainder) < 1e-9;
    let step = if full_turn {
        angle / count.max(1) as f64
    } else if count > 1 {
        angle / (count - 1) as f64
    } else {
        0.0
    };
    (0..count)
        .map(|i| {
            let a = (start_angle + step * i as f64).to_radians();
            DVec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_array_is_centred() {
        let points = rect_array(10.0, 4.0, 3, 2);
        assert_eq!(points.len(), 6);
        let sum = points.iter().fold(DVec2::ZERO, |acc, p| acc + *p);
        assert_relative_eq!(sum.length(), 0.0, epsilon = 1e-12);
        assert!(points.contains(&DVec2::new(-10.0, -2.0)));
        assert!(points.contains(&DVec2::new(10.0, 2.0)));
    }

    #[test]
    fn test_single_point_array_is_origin() {
        assert_eq!(rect_array(5.0, 5.0, 1, 1), vec![DVec2::ZERO]);
    }

    #[test]
    fn test_full_polar_array_has_no_duplicate() {
        let points = polar_array(2.0, 0.0, 360.0, 4);
        assert_eq!(points.len(), 4);
        assert_relative_eq!(points[1].y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(points[3].y, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_polar_array_includes_both_ends() {
        let points = polar_array(1.0, 0.0, 90.0, 3);
        assert_relative_eq!(points[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(points[1].x, 45f64.to_radians().cos(), epsilon = 1e-12);
        assert_relative_eq!(points[2].y, 1.0, epsilon = 1e-12);
    }
}
