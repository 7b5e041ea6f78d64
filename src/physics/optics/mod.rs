//! Geometric optics: refraction and total internal reflection in boxes

pub mod geometry;
pub mod ray;

pub use geometry::{BoxGeometry, Plane};
pub use ray::{Interaction, InteractionKind, Ray, RayTracer, critical_angle};
