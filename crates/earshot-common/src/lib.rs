//! # Earshot Common
//!
//! Common types shared by the Earshot crates.
//!
//! This crate provides the value types that cross the boundary between
//! application code and the native audio engine:
//! - Native vector layout and `glam` conversions
//! - Listener poses, both domain and native
//! - Listener and registry handles
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod attributes;
pub mod error;
pub mod ids;
pub mod vector;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attributes::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::vector::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_pose_reaches_native_layout() {
        let pose = Attributes3D::at(Vec3::new(1.0, 2.0, 3.0));
        let native = NativeAttributes3D::from(pose);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&native));
        assert_eq!(
            floats,
            &[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_handles_from_distinct_registries_differ() {
        let mut a = ListenerIdGenerator::new(RegistryId::new());
        let mut b = ListenerIdGenerator::new(RegistryId::new());
        assert_ne!(a.next_id(), b.next_id());
    }
}
