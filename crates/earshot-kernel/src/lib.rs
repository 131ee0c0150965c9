//! # Earshot Kernel
//!
//! 3D listener management over a native audio engine.
//!
//! This crate provides:
//! - The slot-indexed listener API the engine exposes, as a trait
//! - A headless in-memory engine for tests and servers
//! - A registry that keeps engine listener slots dense while handing out
//!   stable handles
//! - A lock-protected registry for multi-threaded callers
//!
//! ## Slot Density
//!
//! The engine only knows listeners by index and expects indices `0..N` to be
//! occupied. Destroying a listener from the middle of that range moves the
//! last listener into the hole, copying its pose to the new slot, so the
//! range never has gaps.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod audio;
pub mod audio_backend;
pub mod audio_listener;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::audio::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_registry() {
        let subsystem: Box<dyn ListenerSubsystem + Send> = Box::new(HeadlessSubsystem::new());
        let mut registry = ListenerRegistry::new(subsystem);
        let id = registry.create().expect("create");
        assert_eq!(registry.slot_of(id), Some(0));
        assert_eq!(registry.subsystem_listener_count().expect("count"), 1);
    }
}
