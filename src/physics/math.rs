//! Scalar and vector types shared by every engine

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 3D vector type for positions, velocities, accelerations and directions
///
/// Vectors are plain values: every operation returns a new vector and nothing
/// aliases another engine's state.
pub type Vector = bevy::math::DVec3;

/// Tolerance used for containment tests and "is this effectively zero" checks
pub const EPSILON: Scalar = 1e-6;

/// Returns true when `value` is within [`EPSILON`] of zero.
#[inline]
pub fn is_near_zero(value: Scalar) -> bool {
    value.abs() <= EPSILON
}

/// Round `value` to the given number of decimal places.
pub fn round_to(value: Scalar, decimals: u32) -> Scalar {
    let factor = libm::pow(10.0, decimals as Scalar);
    libm::round(value * factor) / factor
}

/// Split `vector` into its component along the unit `normal` and the
/// remaining tangential part.
///
/// Returns `(normal_component, tangential_vector)`, so that
/// `vector == normal * normal_component + tangential_vector`.
#[inline]
pub fn decompose(vector: Vector, normal: Vector) -> (Scalar, Vector) {
    let normal_component = vector.dot(normal);
    (normal_component, vector - normal * normal_component)
}

/// Convert a user-facing `[x, y, z]` triple (z is "up") into the engine frame
/// where y is up.
#[inline]
pub fn from_user_frame(components: [Scalar; 3]) -> Vector {
    Vector::new(components[0], components[2], components[1])
}

/// Inverse of [`from_user_frame`].
#[inline]
pub fn to_user_frame(vector: Vector) -> [Scalar; 3] {
    [vector.x, vector.z, vector.y]
}
