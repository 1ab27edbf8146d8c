//! Parametric point generation for sketch geometry.

use std::f32::consts::TAU;

/// Sample `points` positions on a circle of `radius` around (`cx`, `cy`).
///
/// Returns a flat (x, y) list, one pair per point, with consecutive angles
/// advancing by exactly `TAU / points`. Feed it to a 2-component
/// [`Polygon`](crate::Polygon) as a line loop or strip.
pub fn circle_points(points: usize, radius: f32, cx: f32, cy: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(points * 2);
    let slice = TAU / points as f32;
    for i in 0..points {
        let angle = slice * i as f32;
        out.push(cx + radius * angle.cos());
        out.push(cy + radius * angle.sin());
    }
    out
}

/// Two 3-component endpoints as a flat vertex list.
pub fn line_points(a: [f32; 3], b: [f32; 3]) -> [f32; 6] {
    [a[0], a[1], a[2], b[0], b[1], b[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_on_circle(points: usize, radius: f32) {
        let coords = circle_points(points, radius, 0.0, 0.0);
        assert_eq!(coords.len(), points * 2);
        for pair in coords.chunks_exact(2) {
            let r2 = pair[0] * pair[0] + pair[1] * pair[1];
            assert!(
                (r2 - radius * radius).abs() < 1e-3,
                "point ({}, {}) off circle r={radius}",
                pair[0],
                pair[1]
            );
        }
    }

    fn assert_uniform_angle_step(points: usize) {
        let coords = circle_points(points, 1.0, 0.0, 0.0);
        let step = TAU / points as f32;
        for (i, pair) in coords.chunks_exact(2).enumerate() {
            let angle = pair[1].atan2(pair[0]).rem_euclid(TAU);
            let expected = (step * i as f32).rem_euclid(TAU);
            let diff = (angle - expected).abs();
            let diff = diff.min(TAU - diff);
            assert!(diff < 1e-3, "point {i}: angle {angle} != {expected}");
        }
    }

    #[test]
    fn circle_points_lie_on_the_radius() {
        assert_on_circle(8, 1.0);
        assert_on_circle(1000, 0.75);
    }

    #[test]
    fn circle_angles_advance_by_tau_over_n() {
        assert_uniform_angle_step(8);
        assert_uniform_angle_step(1000);
    }

    #[test]
    fn circle_respects_center_offset() {
        let coords = circle_points(4, 2.0, 10.0, -5.0);
        // First sample is at angle 0: (cx + r, cy).
        assert!((coords[0] - 12.0).abs() < 1e-6);
        assert!((coords[1] + 5.0).abs() < 1e-6);
    }

    #[test]
    fn line_points_concatenates_endpoints() {
        assert_eq!(
            line_points([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }
}
