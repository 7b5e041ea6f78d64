//! Ray chains traced through refracting geometry

use super::geometry::{BoxGeometry, Plane};
use crate::physics::math::{EPSILON, Scalar, Vector};
use bevy::log::debug;

/// What happened to a ray at a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Refraction,
    TotalInternalReflection,
}

/// Angles and indices recorded at one surface hit
///
/// Angles are in radians. `critical_angle` is only present when the ray goes
/// from a denser to a less dense medium, `refraction_angle` only when the ray
/// was refracted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub point: Vector,
    /// Surface normal facing the incoming ray
    pub normal: Vector,
    pub incidence_angle: Scalar,
    pub critical_angle: Option<Scalar>,
    pub refraction_angle: Option<Scalar>,
    pub n1: Scalar,
    pub n2: Scalar,
}

impl Interaction {
    pub const HEADER: [&'static str; 5] = ["i/rad", "c/rad", "r/rad", "n1", "n2"];

    /// `[i, c, r, n1, n2]` with absent angles as `None`.
    pub fn row(&self) -> [Option<Scalar>; 5] {
        [
            Some(self.incidence_angle),
            self.critical_angle,
            self.refraction_angle,
            Some(self.n1),
            Some(self.n2),
        ]
    }

    /// `[i, c, r]` in degrees, for display.
    pub fn angles_in_degrees(&self) -> [Option<Scalar>; 3] {
        [
            Some(self.incidence_angle),
            self.critical_angle,
            self.refraction_angle,
        ]
        .map(|angle| angle.map(Scalar::to_degrees))
    }
}

/// Critical angle for light going from index `n1` into index `n2`.
///
/// Only exists when `n2 < n1`.
pub fn critical_angle(n1: Scalar, n2: Scalar) -> Option<Scalar> {
    if n1 <= 0.0 || n2 >= n1 {
        return None;
    }
    let ratio = n2 / n1;
    Some(libm::acos(libm::sqrt(1.0 - ratio * ratio)))
}

/// Decide between refraction and total internal reflection.
pub fn classify(incidence_angle: Scalar, n1: Scalar, n2: Scalar) -> InteractionKind {
    match critical_angle(n1, n2) {
        Some(critical) if incidence_angle > critical => InteractionKind::TotalInternalReflection,
        _ => InteractionKind::Refraction,
    }
}

/// Mirror `direction` about a surface whose normal faces the incoming ray.
#[inline]
pub fn reflect(direction: Vector, normal: Vector, cos_incidence: Scalar) -> Vector {
    direction + normal * (2.0 * cos_incidence)
}

/// Bend `direction` through a surface with Snell's law.
///
/// Returns the new direction and `cos(r)`.
pub fn refract(
    direction: Vector,
    normal: Vector,
    cos_incidence: Scalar,
    n1: Scalar,
    n2: Scalar,
) -> (Vector, Scalar) {
    let ratio = n1 / n2;
    let sin_squared = ratio * ratio * (1.0 - cos_incidence * cos_incidence);
    let cos_refraction = libm::sqrt((1.0 - sin_squared).max(0.0));
    let refracted = direction * ratio + normal * (ratio * cos_incidence - cos_refraction);
    (refracted, cos_refraction)
}

/// One straight segment of a traced light path
///
/// Each ray owns the segment that follows it. A ray with no `next` carries on
/// to infinity in `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector,
    pub direction: Vector,
    pub medium_index: Scalar,
    pub is_source: bool,
    pub interaction: Option<Interaction>,
    pub next: Option<Box<Ray>>,
}

impl Ray {
    pub fn new(origin: Vector, direction: Vector, medium_index: Scalar, is_source: bool) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            medium_index,
            is_source,
            interaction: None,
            next: None,
        }
    }

    /// Number of segments in the chain starting at this ray.
    pub fn chain_len(&self) -> usize {
        self.segments().count()
    }

    /// Where this segment ends, if it hit anything.
    pub fn end(&self) -> Option<Vector> {
        self.next.as_ref().map(|next| next.origin)
    }

    /// Iterate over this ray and every ray after it.
    pub fn segments(&self) -> impl Iterator<Item = &Ray> {
        std::iter::successors(Some(self), |ray| ray.next.as_deref())
    }

    /// Surface interactions along the chain, in order.
    pub fn interactions(&self) -> Vec<Interaction> {
        self.segments().filter_map(|ray| ray.interaction).collect()
    }
}

/// Traces rays through a scene of [`BoxGeometry`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayTracer {
    /// Maximum number of segments in a chain
    pub max_depth: usize,
    pub epsilon: Scalar,
    /// Refractive index of the space around the geometry
    pub ambient_index: Scalar,
}

impl Default for RayTracer {
    fn default() -> Self {
        Self {
            max_depth: 10,
            epsilon: EPSILON,
            ambient_index: 1.0,
        }
    }
}

struct Hit<'a> {
    t: Scalar,
    point: Vector,
    plane: &'a Plane,
    geometry: &'a BoxGeometry,
}

impl RayTracer {
    /// Build the full chain for a source ray.
    pub fn trace(&self, scene: &[BoxGeometry], origin: Vector, direction: Vector, medium_index: Scalar) -> Ray {
        let mut source = Ray::new(origin, direction, medium_index, true);
        self.extend(scene, &mut source, 1);
        source
    }

    fn extend(&self, scene: &[BoxGeometry], ray: &mut Ray, depth: usize) {
        if depth >= self.max_depth {
            return;
        }
        let Some(hit) = self.first_hit(scene, ray) else {
            return;
        };

        let inside = hit.geometry.is_inside(ray.origin, self.epsilon);
        let (n1, n2, normal) = if inside {
            (hit.geometry.refractive_index(), self.ambient_index, -hit.plane.normal)
        } else {
            (ray.medium_index, hit.geometry.refractive_index(), hit.plane.normal)
        };
        if n1 <= 0.0 || n2 <= 0.0 {
            debug!("Skipping surface with non-positive refractive index");
            return;
        }

        let cos_incidence = (-normal).dot(ray.direction).clamp(-1.0, 1.0);
        let incidence_angle = libm::acos(cos_incidence);
        let critical = critical_angle(n1, n2);
        let kind = classify(incidence_angle, n1, n2);

        let (direction, refraction_angle, next_index) = match kind {
            InteractionKind::TotalInternalReflection => {
                debug!("Total internal reflection at incidence {incidence_angle:.4} rad");
                (reflect(ray.direction, normal, cos_incidence), None, n1)
            }
            InteractionKind::Refraction => {
                let (direction, cos_refraction) = refract(ray.direction, normal, cos_incidence, n1, n2);
                (direction, Some(libm::acos(cos_refraction)), n2)
            }
        };

        ray.interaction = Some(Interaction {
            kind,
            point: hit.point,
            normal,
            incidence_angle,
            critical_angle: critical,
            refraction_angle,
            n1,
            n2,
        });

        let mut next = Ray::new(hit.point, direction, next_index, false);
        self.extend(scene, &mut next, depth + 1);
        ray.next = Some(Box::new(next));
    }

    /// Nearest plane hit that lies on its geometry's surface.
    fn first_hit<'a>(&self, scene: &'a [BoxGeometry], ray: &Ray) -> Option<Hit<'a>> {
        let mut nearest: Option<Hit<'a>> = None;

        for geometry in scene {
            for plane in geometry.planes() {
                let Some(t) = plane.intersect(ray.origin, ray.direction, self.epsilon) else {
                    continue;
                };
                let point = ray.origin + ray.direction * t;
                if !geometry.is_inside(point, self.epsilon) {
                    continue;
                }
                if nearest.as_ref().is_none_or(|hit| t < hit.t) {
                    nearest = Some(Hit {
                        t,
                        point,
                        plane,
                        geometry,
                    });
                }
            }
        }

        nearest
    }
}
