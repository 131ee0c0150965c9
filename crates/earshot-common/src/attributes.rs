//! Listener pose types.
//!
//! [`Attributes3D`] is the pose as application code sees it, built on `glam`
//! vectors. [`NativeAttributes3D`] is the same pose in the audio engine's
//! plain-old-data layout. Converting between the two is a field-by-field copy.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::vector::NativeVector;

/// Forward axis given to a listener that has not been oriented yet.
pub const DEFAULT_FORWARD: Vec3 = Vec3::Y;

/// Up axis given to a listener that has not been oriented yet.
pub const DEFAULT_UP: Vec3 = Vec3::Z;

/// Cross products shorter than this count as parallel axes.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Spatial state of a listener.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes3D {
    /// Position in world space
    pub position: Vec3,
    /// Velocity in world units per second
    pub velocity: Vec3,
    /// Facing direction (unit vector)
    pub forward: Vec3,
    /// Up direction (unit vector)
    pub up: Vec3,
}

impl Default for Attributes3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            forward: DEFAULT_FORWARD,
            up: DEFAULT_UP,
        }
    }
}

impl Attributes3D {
    /// Creates a pose from all four vectors.
    #[must_use]
    pub const fn new(position: Vec3, velocity: Vec3, forward: Vec3, up: Vec3) -> Self {
        Self {
            position,
            velocity,
            forward,
            up,
        }
    }

    /// Creates a stationary pose at `position` with the default orientation.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Creates a pose on the 2D plane.
    ///
    /// All 2D inputs get `z = 0` and the up axis is the default `+Z`.
    #[must_use]
    pub fn from_2d(position: Vec2, velocity: Vec2, forward: Vec2) -> Self {
        Self {
            position: position.extend(0.0),
            velocity: velocity.extend(0.0),
            forward: forward.extend(0.0),
            up: DEFAULT_UP,
        }
    }

    /// Sets the velocity.
    #[must_use]
    pub const fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets forward and up axes.
    #[must_use]
    pub const fn with_orientation(mut self, forward: Vec3, up: Vec3) -> Self {
        self.forward = forward;
        self.up = up;
        self
    }

    /// Returns true if forward and up are non-zero and not parallel.
    #[must_use]
    pub fn has_valid_orientation(&self) -> bool {
        orientation_is_valid(self.forward, self.up)
    }
}

/// Returns true if `forward` and `up` are finite, non-zero and not parallel.
#[must_use]
pub fn orientation_is_valid(forward: Vec3, up: Vec3) -> bool {
    forward.is_finite()
        && up.is_finite()
        && forward.length_squared() > 0.0
        && up.length_squared() > 0.0
        && forward.normalize().cross(up.normalize()).length() > PARALLEL_EPSILON
}

/// Listener pose in the audio engine's native layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct NativeAttributes3D {
    /// Position
    pub position: NativeVector,
    /// Velocity
    pub velocity: NativeVector,
    /// Forward axis
    pub forward: NativeVector,
    /// Up axis
    pub up: NativeVector,
}

impl NativeAttributes3D {
    /// Returns true if every component of every vector is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.forward.is_finite()
            && self.up.is_finite()
    }
}

impl From<Attributes3D> for NativeAttributes3D {
    fn from(attributes: Attributes3D) -> Self {
        Self {
            position: attributes.position.into(),
            velocity: attributes.velocity.into(),
            forward: attributes.forward.into(),
            up: attributes.up.into(),
        }
    }
}

impl From<NativeAttributes3D> for Attributes3D {
    fn from(native: NativeAttributes3D) -> Self {
        Self {
            position: native.position.into(),
            velocity: native.velocity.into(),
            forward: native.forward.into(),
            up: native.up.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose() {
        let pose = Attributes3D::default();
        assert_eq!(pose.position, Vec3::ZERO);
        assert_eq!(pose.velocity, Vec3::ZERO);
        assert_eq!(pose.forward, Vec3::Y);
        assert_eq!(pose.up, Vec3::Z);
        assert!(pose.has_valid_orientation());
    }

    #[test]
    fn test_native_conversion_round_trip() {
        let pose = Attributes3D::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-0.5, 0.0, 4.0),
            Vec3::X,
            Vec3::Z,
        );
        let native = NativeAttributes3D::from(pose);
        assert_eq!(native.position, NativeVector::new(1.0, 2.0, 3.0));
        assert_eq!(native.velocity, NativeVector::new(-0.5, 0.0, 4.0));
        assert_eq!(Attributes3D::from(native), pose);
    }

    #[test]
    fn test_builders() {
        let pose = Attributes3D::at(Vec3::new(1.0, 0.0, 0.0))
            .with_velocity(Vec3::new(0.0, 3.0, 0.0))
            .with_orientation(Vec3::NEG_X, Vec3::Y);
        assert_eq!(
            pose,
            Attributes3D::new(Vec3::X, Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_X, Vec3::Y)
        );
    }

    #[test]
    fn test_from_2d() {
        let pose = Attributes3D::from_2d(Vec2::new(10.0, 20.0), Vec2::new(1.0, 0.0), Vec2::Y);
        assert_eq!(pose.position, Vec3::new(10.0, 20.0, 0.0));
        assert_eq!(pose.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(pose.forward, Vec3::Y);
        assert_eq!(pose.up, Vec3::Z);
    }

    #[test]
    fn test_orientation_validity() {
        assert!(orientation_is_valid(Vec3::Y, Vec3::Z));
        assert!(orientation_is_valid(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 5.0)));
        assert!(!orientation_is_valid(Vec3::ZERO, Vec3::Z));
        assert!(!orientation_is_valid(Vec3::Z, Vec3::Z));
        assert!(!orientation_is_valid(Vec3::Z, Vec3::NEG_Z * 3.0));
        assert!(!orientation_is_valid(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Z));
    }

    #[test]
    fn test_native_layout() {
        assert_eq!(std::mem::size_of::<NativeAttributes3D>(), 48);
    }
}
