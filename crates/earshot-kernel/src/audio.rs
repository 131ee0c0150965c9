//! Audio System
//!
//! This module provides the listener infrastructure for the Earshot kernel.
//! It re-exports types from the submodules for convenience.
//!
//! # Modules
//!
//! - [`audio_backend`](crate::audio_backend): The listener API of the native engine
//! - [`audio_listener`](crate::audio_listener): Handle-to-slot listener registry
//!
//! # Quick Start
//!
//! ```
//! use earshot_kernel::audio::*;
//! use glam::Vec2;
//!
//! let mut listeners = ListenerRegistry::new(HeadlessSubsystem::new());
//!
//! // One listener per split-screen player
//! let left = listeners.create()?;
//! let right = listeners.create()?;
//!
//! // Follow the players on the 2D plane
//! listeners.set_position_2d(left, Vec2::new(-100.0, 0.0))?;
//! listeners.set_position_2d(right, Vec2::new(100.0, 0.0))?;
//!
//! // The right player leaves; the left listener keeps slot 0
//! listeners.destroy(right)?;
//! assert_eq!(listeners.subsystem_listener_count()?, 1);
//! # Ok::<(), AudioError>(())
//! ```

pub use crate::audio_backend::{
    HeadlessSubsystem, ListenerSubsystem, SubsystemResult, MAX_LISTENERS,
};

pub use crate::audio_listener::{ListenerConfig, ListenerRegistry, SharedListenerRegistry};

pub use earshot_common::{
    Attributes3D, AudioError, AudioResult, ListenerId, NativeAttributes3D, NativeVector,
    SubsystemCall, SubsystemStatus,
};
