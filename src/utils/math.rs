//! Small geometric helpers
//! Location: src/utils/math.rs

use std::f64::consts::PI;

/// Wrap an angle into `(-π, π]`
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.sin().atan2(angle.cos());
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Clamp to `[0, 1]`, mapping NaN to `fallback`
pub fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Rotate a body-frame offset by `heading` and translate to `(x, y)`
pub fn body_to_world(x: f64, y: f64, heading: f64, offset: (f64, f64)) -> (f64, f64) {
    let (sin, cos) = heading.sin_cos();
    (
        x + offset.0 * cos - offset.1 * sin,
        y + offset.0 * sin + offset.1 * cos,
    )
}

/// Multiply a 3x3 matrix by a 3-vector
pub fn mat3_mul_vec3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_range() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(-PI), PI, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(PI / 2.0 + 4.0 * PI), PI / 2.0, epsilon = 1e-9);

        for i in -100..100 {
            let a = normalize_angle(i as f64 * 0.37);
            assert!(a > -PI && a <= PI, "{} out of range", a);
        }
    }

    #[test]
    fn test_non_finite_angle() {
        assert_eq!(normalize_angle(f64::NAN), 0.0);
        assert_eq!(normalize_angle(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_body_to_world() {
        let (x, y) = body_to_world(1.0, 1.0, PI / 2.0, (0.3, 0.0));
        assert_relative_eq!(x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y, 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_identity_matrix() {
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(mat3_mul_vec3(&identity, [1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(1.4, 0.5), 1.0);
        assert_eq!(clamp_unit(-0.2, 0.5), 0.0);
        assert_eq!(clamp_unit(f64::NAN, 0.5), 0.5);
    }
}
