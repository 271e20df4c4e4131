use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use rand::Rng;
use thiserror::Error;

/// Axis vectors with a norm at or below this value cannot be normalized.
pub const DEFAULT_AXIS_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Rotation axis ({x}, {y}, {z}) cannot be normalized")]
    InvalidAxis { x: f64, y: f64, z: f64 },
    #[error("Axis selector {0:?} must select exactly one of the x, y or z directions")]
    InvalidAxisSelector([bool; 3]),
}

/// One of the three canonical unit directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrthogonalAxis {
    X,
    Y,
    Z,
}

impl OrthogonalAxis {
    /// Interprets a one-hot `[x, y, z]` selector.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidAxisSelector`] when no direction or more than one
    /// direction is selected.
    pub fn from_selector(selector: [bool; 3]) -> Result<Self, GeometryError> {
        match selector {
            [true, false, false] => Ok(Self::X),
            [false, true, false] => Ok(Self::Y),
            [false, false, true] => Ok(Self::Z),
            _ => Err(GeometryError::InvalidAxisSelector(selector)),
        }
    }

    pub fn unit_vector(self) -> Unit<Vector3<f64>> {
        match self {
            Self::X => Vector3::x_axis(),
            Self::Y => Vector3::y_axis(),
            Self::Z => Vector3::z_axis(),
        }
    }
}

pub fn translate(point: &Point3<f64>, delta: &Vector3<f64>) -> Point3<f64> {
    point + delta
}

/// Normalizes a rotation axis, rejecting non-finite or near-zero vectors.
pub fn normalize_axis(
    axis: &Vector3<f64>,
    tolerance: f64,
) -> Result<Unit<Vector3<f64>>, GeometryError> {
    let invalid = || GeometryError::InvalidAxis {
        x: axis.x,
        y: axis.y,
        z: axis.z,
    };
    if !axis.iter().all(|c| c.is_finite()) {
        return Err(invalid());
    }
    Unit::try_new(*axis, tolerance).ok_or_else(invalid)
}

/// Rotates `point` counter-clockwise by `theta` radians about the line through `pivot`
/// running along `axis`.
///
/// The point is expressed relative to the pivot, rotated by the unit quaternion built
/// from the normalized axis, and translated back.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidAxis`] if `axis` cannot be normalized under `tolerance`.
pub fn rotate_about_axis(
    point: &Point3<f64>,
    theta: f64,
    axis: &Vector3<f64>,
    pivot: &Point3<f64>,
    tolerance: f64,
) -> Result<Point3<f64>, GeometryError> {
    let axis = normalize_axis(axis, tolerance)?;
    Ok(rotate_about_unit_axis(point, theta, &axis, pivot))
}

pub fn rotate_about_unit_axis(
    point: &Point3<f64>,
    theta: f64,
    axis: &Unit<Vector3<f64>>,
    pivot: &Point3<f64>,
) -> Point3<f64> {
    let rotation = UnitQuaternion::from_axis_angle(axis, theta);
    pivot + rotation * (point - pivot)
}

pub fn rotate_orthogonal(
    point: &Point3<f64>,
    theta: f64,
    pivot: &Point3<f64>,
    axis: OrthogonalAxis,
) -> Point3<f64> {
    rotate_about_unit_axis(point, theta, &axis.unit_vector(), pivot)
}

/// Draws a direction uniformly distributed on the unit sphere.
///
/// Candidates are sampled from the cube `[-1, 1)^3` and rejected unless they fall inside
/// the unit ball, which also discards the zero vector.
pub fn random_unit_vector(rng: &mut impl Rng) -> Unit<Vector3<f64>> {
    first_unit_candidate(|| {
        Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
    })
}

fn first_unit_candidate(mut draw: impl FnMut() -> Vector3<f64>) -> Unit<Vector3<f64>> {
    loop {
        let candidate = draw();
        let norm_squared = candidate.norm_squared();
        if norm_squared > DEFAULT_AXIS_TOLERANCE && norm_squared <= 1.0 {
            return Unit::new_normalize(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: f64 = 1e-9;

    fn points_close(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < TOLERANCE
    }

    fn distance_to_line(point: &Point3<f64>, axis: &Vector3<f64>, pivot: &Point3<f64>) -> f64 {
        let direction = axis.normalize();
        let offset = point - pivot;
        (offset - direction * offset.dot(&direction)).norm()
    }

    #[test]
    fn translate_adds_vector() {
        let p = translate(&Point3::new(1.0, 2.0, 3.0), &Vector3::new(-1.0, 0.5, 2.0));
        assert_eq!(p, Point3::new(0.0, 2.5, 5.0));
    }

    #[test]
    fn quarter_turn_about_z_is_counter_clockwise() {
        let p = rotate_about_axis(
            &Point3::new(1.0, 0.0, 0.0),
            FRAC_PI_2,
            &Vector3::new(0.0, 0.0, 1.0),
            &Point3::origin(),
            DEFAULT_AXIS_TOLERANCE,
        )
        .unwrap();
        assert!(points_close(&p, &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn rotation_uses_normalized_axis() {
        let short = rotate_about_axis(
            &Point3::new(1.0, 2.0, 3.0),
            0.7,
            &Vector3::new(0.0, 0.0, 0.01),
            &Point3::origin(),
            DEFAULT_AXIS_TOLERANCE,
        )
        .unwrap();
        let long = rotate_about_axis(
            &Point3::new(1.0, 2.0, 3.0),
            0.7,
            &Vector3::new(0.0, 0.0, 250.0),
            &Point3::origin(),
            DEFAULT_AXIS_TOLERANCE,
        )
        .unwrap();
        assert!(points_close(&short, &long));
    }

    #[test]
    fn rotation_about_offset_pivot_keeps_pivot_fixed() {
        let pivot = Point3::new(2.0, 2.0, 0.0);
        let p = rotate_about_axis(
            &Point3::new(3.0, 2.0, 0.0),
            PI,
            &Vector3::z(),
            &pivot,
            DEFAULT_AXIS_TOLERANCE,
        )
        .unwrap();
        assert!(points_close(&p, &Point3::new(1.0, 2.0, 0.0)));

        let fixed =
            rotate_about_axis(&pivot, 1.3, &Vector3::z(), &pivot, DEFAULT_AXIS_TOLERANCE).unwrap();
        assert!(points_close(&fixed, &pivot));
    }

    #[test]
    fn inverse_rotation_round_trips() {
        let axes = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(-0.3, 2.0, 0.5),
        ];
        let pivot = Point3::new(0.5, -1.0, 2.0);
        let p = Point3::new(3.0, -4.0, 1.5);
        for axis in &axes {
            for &theta in &[0.1, 1.0, 2.5, -4.0] {
                let forward = rotate_about_axis(&p, theta, axis, &pivot, DEFAULT_AXIS_TOLERANCE)
                    .unwrap();
                let back =
                    rotate_about_axis(&forward, -theta, axis, &pivot, DEFAULT_AXIS_TOLERANCE)
                        .unwrap();
                assert!(points_close(&back, &p));
            }
        }
    }

    #[test]
    fn full_turn_returns_to_start() {
        let p = Point3::new(-1.0, 7.0, 0.25);
        let axis = Vector3::new(0.2, -0.4, 0.9);
        let rotated =
            rotate_about_axis(&p, 2.0 * PI, &axis, &Point3::origin(), DEFAULT_AXIS_TOLERANCE)
                .unwrap();
        assert!(points_close(&rotated, &p));
    }

    #[test]
    fn rotation_preserves_distance_from_axis() {
        let p = Point3::new(4.0, 1.0, -2.0);
        let axis = Vector3::new(1.0, 2.0, 3.0);
        let pivot = Point3::new(1.0, 1.0, 1.0);
        let before = distance_to_line(&p, &axis, &pivot);
        let rotated = rotate_about_axis(&p, 1.1, &axis, &pivot, DEFAULT_AXIS_TOLERANCE).unwrap();
        let after = distance_to_line(&rotated, &axis, &pivot);
        assert!((before - after).abs() < TOLERANCE);
    }

    #[test]
    fn zero_axis_is_rejected() {
        let result = rotate_about_axis(
            &Point3::new(1.0, 0.0, 0.0),
            1.0,
            &Vector3::zeros(),
            &Point3::origin(),
            DEFAULT_AXIS_TOLERANCE,
        );
        assert!(matches!(result, Err(GeometryError::InvalidAxis { .. })));
    }

    #[test]
    fn non_finite_axis_is_rejected() {
        let result = normalize_axis(&Vector3::new(f64::NAN, 1.0, 0.0), DEFAULT_AXIS_TOLERANCE);
        assert!(matches!(result, Err(GeometryError::InvalidAxis { .. })));
    }

    #[test]
    fn axis_selector_accepts_only_one_hot() {
        assert_eq!(
            OrthogonalAxis::from_selector([true, false, false]),
            Ok(OrthogonalAxis::X)
        );
        assert_eq!(
            OrthogonalAxis::from_selector([false, true, false]),
            Ok(OrthogonalAxis::Y)
        );
        assert_eq!(
            OrthogonalAxis::from_selector([false, false, true]),
            Ok(OrthogonalAxis::Z)
        );
        assert_eq!(
            OrthogonalAxis::from_selector([false, false, false]),
            Err(GeometryError::InvalidAxisSelector([false, false, false]))
        );
        assert!(OrthogonalAxis::from_selector([true, true, false]).is_err());
        assert!(OrthogonalAxis::from_selector([true, true, true]).is_err());
    }

    #[test]
    fn orthogonal_rotation_matches_general_rotation() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let pivot = Point3::new(0.0, 1.0, 0.0);
        let via_selector = rotate_orthogonal(&p, 0.4, &pivot, OrthogonalAxis::Y);
        let via_axis =
            rotate_about_axis(&p, 0.4, &Vector3::y(), &pivot, DEFAULT_AXIS_TOLERANCE).unwrap();
        assert!(points_close(&via_selector, &via_axis));
    }

    #[test]
    fn random_unit_vectors_have_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.norm() - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn random_unit_vector_is_deterministic_for_a_seed() {
        let a = random_unit_vector(&mut StdRng::seed_from_u64(11));
        let b = random_unit_vector(&mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_and_outside_candidates_are_resampled() {
        let mut candidates = vec![
            Vector3::zeros(),
            Vector3::new(0.9, 0.9, 0.9),
            Vector3::new(0.0, 0.5, 0.0),
        ]
        .into_iter();
        let v = first_unit_candidate(|| candidates.next().unwrap());
        assert_eq!(v.into_inner(), Vector3::new(0.0, 1.0, 0.0));
    }
}
