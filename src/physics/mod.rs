//! Numerical engines shared by every simulation

pub mod collision;
pub mod components;
pub mod decay;
pub mod fields;
pub mod integrators;
pub mod kinematics;
pub mod math;
pub mod optics;
