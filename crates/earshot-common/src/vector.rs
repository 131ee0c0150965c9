//! Native vector representation used by the audio subsystem.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D vector laid out the way the native audio engine expects it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct NativeVector {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl NativeVector {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new native vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns true if every component is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vec3> for NativeVector {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<NativeVector> for Vec3 {
    fn from(v: NativeVector) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// 2D coordinates lie on the z = 0 plane.
impl From<Vec2> for NativeVector {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y, 0.0)
    }
}
