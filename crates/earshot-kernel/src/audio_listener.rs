//! 3D Listener Registry
//!
//! The native engine addresses listeners by slot index and requires the
//! occupied slots to be exactly `[0, N)`. Application code wants stable
//! handles that survive other listeners coming and going. The registry
//! bridges the two.
//!
//! # Layout
//!
//! ```text
//!   ListenerId ──lookup──▶ slot ──slots──▶ ListenerId
//!                           │
//!                           ▼
//!                 subsystem slot storage (pose)
//! ```
//!
//! `slots` is the live sequence in slot order and `lookup` is its inverse.
//! Poses live only in the subsystem, so whenever a listener changes slot its
//! pose has to be copied along with it.
//!
//! # Destroy
//!
//! Destroying a listener that is not in the last slot moves the last
//! listener into the freed slot:
//!
//! 1. read the last listener's pose through its old slot
//! 2. write that pose through the freed slot
//! 3. point the last listener's handle at the freed slot
//! 4. drop the destroyed handle and shrink the subsystem count
//!
//! # Example
//!
//! ```
//! use earshot_kernel::audio_backend::HeadlessSubsystem;
//! use earshot_kernel::audio_listener::ListenerRegistry;
//! use earshot_common::Attributes3D;
//! use glam::Vec3;
//!
//! let mut registry = ListenerRegistry::new(HeadlessSubsystem::new());
//! let player = registry.create()?;
//! let camera = registry.create()?;
//!
//! registry.set_attributes(camera, &Attributes3D::at(Vec3::new(0.0, 5.0, 0.0)))?;
//! registry.destroy(player)?;
//!
//! assert_eq!(registry.slot_of(camera), Some(0));
//! assert_eq!(registry.attributes(camera)?.position, Vec3::new(0.0, 5.0, 0.0));
//! # Ok::<(), earshot_common::AudioError>(())
//! ```

use std::sync::Arc;

use ahash::AHashMap;
use earshot_common::{
    orientation_is_valid, Attributes3D, AudioError, AudioResult, ListenerId,
    ListenerIdGenerator, NativeAttributes3D, RegistryId, SubsystemCall, DEFAULT_FORWARD,
    DEFAULT_UP,
};
use glam::{Vec2, Vec3};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::audio_backend::ListenerSubsystem;

/// Listener registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Forward axis of a newly created listener
    pub default_forward: [f32; 3],
    /// Up axis of a newly created listener
    pub default_up: [f32; 3],
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            default_forward: DEFAULT_FORWARD.to_array(),
            default_up: DEFAULT_UP.to_array(),
        }
    }
}

impl ListenerConfig {
    /// Sets the orientation given to new listeners.
    #[must_use]
    pub fn with_default_orientation(mut self, forward: Vec3, up: Vec3) -> Self {
        self.default_forward = forward.to_array();
        self.default_up = up.to_array();
        self
    }

    /// Normalizes the default axes, or resets them if they are unusable.
    pub fn validate(&mut self) {
        let forward = Vec3::from_array(self.default_forward);
        let up = Vec3::from_array(self.default_up);
        if orientation_is_valid(forward, up) {
            self.default_forward = forward.normalize().to_array();
            self.default_up = up.normalize().to_array();
        } else {
            warn!(
                "Listener default orientation {:?}/{:?} is degenerate, using defaults",
                self.default_forward, self.default_up
            );
            let defaults = Self::default();
            self.default_forward = defaults.default_forward;
            self.default_up = defaults.default_up;
        }
    }

    /// Returns the pose given to new listeners.
    #[must_use]
    pub fn default_pose(&self) -> Attributes3D {
        Attributes3D::default().with_orientation(
            Vec3::from_array(self.default_forward),
            Vec3::from_array(self.default_up),
        )
    }
}

/// Maps stable listener handles onto the subsystem's dense slot range.
#[derive(Debug)]
pub struct ListenerRegistry<S: ListenerSubsystem> {
    /// Handle source, bound to this registry's ID.
    ids: ListenerIdGenerator,
    /// Live listeners in slot order.
    slots: Vec<ListenerId>,
    /// Inverse of `slots`.
    lookup: AHashMap<ListenerId, usize>,
    /// Pose written into a freshly created listener's slot.
    default_pose: NativeAttributes3D,
    /// The engine whose listener slots this registry drives.
    subsystem: S,
}

impl<S: ListenerSubsystem> ListenerRegistry<S> {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new(subsystem: S) -> Self {
        Self::with_config(subsystem, ListenerConfig::default())
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(subsystem: S, mut config: ListenerConfig) -> Self {
        config.validate();
        let id = RegistryId::new();
        debug!("Created listener registry {id}");
        Self {
            ids: ListenerIdGenerator::new(id),
            slots: Vec::new(),
            lookup: AHashMap::new(),
            default_pose: config.default_pose().into(),
            subsystem,
        }
    }

    /// Returns this registry's ID.
    #[must_use]
    pub const fn id(&self) -> RegistryId {
        self.ids.registry()
    }

    /// Returns the number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no listener is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if `id` is a live listener of this registry.
    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.lookup.contains_key(&id)
    }

    /// Returns the slot `id` currently occupies.
    #[must_use]
    pub fn slot_of(&self, id: ListenerId) -> Option<usize> {
        self.lookup.get(&id).copied()
    }

    /// Iterates live listeners in slot order.
    pub fn listeners(&self) -> impl ExactSizeIterator<Item = ListenerId> + '_ {
        self.slots.iter().copied()
    }

    /// Returns the wrapped subsystem.
    #[must_use]
    pub const fn subsystem(&self) -> &S {
        &self.subsystem
    }

    /// Returns the wrapped subsystem mutably.
    ///
    /// Changing listener state through it bypasses the registry.
    pub fn subsystem_mut(&mut self) -> &mut S {
        &mut self.subsystem
    }

    /// Consumes the registry and returns the subsystem.
    pub fn into_subsystem(self) -> S {
        self.subsystem
    }

    /// Creates a listener in the next free slot with the default pose.
    ///
    /// On failure the registry is unchanged. If the default pose cannot be
    /// written and the engine then refuses to shrink back, the count error is
    /// returned instead; call [`Self::sync_listener_count`] to recover.
    pub fn create(&mut self) -> AudioResult<ListenerId> {
        let id = self.ids.next_id();
        let slot = self.slots.len();
        self.slots.push(id);
        self.lookup.insert(id, slot);

        if let Err(status) = self.subsystem.set_listener_count(self.slots.len()) {
            self.undo_create(id);
            warn!("Failed to grow listener count to {}: {status}", slot + 1);
            return Err(AudioError::subsystem(SubsystemCall::SetListenerCount, status));
        }

        if let Err(status) = self
            .subsystem
            .set_listener_attributes(slot, &self.default_pose)
        {
            self.undo_create(id);
            warn!("Failed to initialize listener slot {slot}: {status}");
            if let Err(shrink) = self.subsystem.set_listener_count(self.slots.len()) {
                error!(
                    "Listener count stuck at {} after rollback: {shrink}",
                    slot + 1
                );
                return Err(AudioError::subsystem(SubsystemCall::SetListenerCount, shrink));
            }
            return Err(AudioError::subsystem(
                SubsystemCall::SetListenerAttributes,
                status,
            ));
        }

        debug!("Created {id} in slot {slot}");
        Ok(id)
    }

    /// Reads the current pose of a listener.
    pub fn attributes(&self, id: ListenerId) -> AudioResult<Attributes3D> {
        let slot = self.resolve(id)?;
        self.subsystem
            .listener_attributes(slot)
            .map(Attributes3D::from)
            .map_err(|status| AudioError::subsystem(SubsystemCall::GetListenerAttributes, status))
    }

    /// Replaces the pose of a listener.
    pub fn set_attributes(&mut self, id: ListenerId, attributes: &Attributes3D) -> AudioResult<()> {
        let slot = self.resolve(id)?;
        self.subsystem
            .set_listener_attributes(slot, &NativeAttributes3D::from(*attributes))
            .map_err(|status| AudioError::subsystem(SubsystemCall::SetListenerAttributes, status))
    }

    /// Places a listener on the 2D plane, stationary and facing `+Y`.
    pub fn set_position_2d(&mut self, id: ListenerId, position: Vec2) -> AudioResult<()> {
        self.set_attributes(id, &Attributes3D::from_2d(position, Vec2::ZERO, Vec2::Y))
    }

    /// Sets a 2D pose. The up axis is `+Z` and every 2D input gets `z = 0`.
    pub fn set_attributes_2d(
        &mut self,
        id: ListenerId,
        position: Vec2,
        velocity: Vec2,
        forward: Vec2,
    ) -> AudioResult<()> {
        self.set_attributes(id, &Attributes3D::from_2d(position, velocity, forward))
    }

    /// Destroys a listener and compacts the slot range.
    ///
    /// If the pose copy fails the registry is unchanged. If the final count
    /// update fails the listener is still destroyed and the error is
    /// returned; [`Self::sync_listener_count`] can push the count again.
    pub fn destroy(&mut self, id: ListenerId) -> AudioResult<()> {
        let slot = self.resolve(id)?;
        let last_slot = self.slots.len() - 1;

        if slot != last_slot {
            let last = self.slots[last_slot];
            // Must read through the old slot before `last` is reassigned.
            let moved = self
                .subsystem
                .listener_attributes(last_slot)
                .map_err(|status| {
                    AudioError::subsystem(SubsystemCall::GetListenerAttributes, status)
                })?;
            self.subsystem
                .set_listener_attributes(slot, &moved)
                .map_err(|status| {
                    AudioError::subsystem(SubsystemCall::SetListenerAttributes, status)
                })?;
            self.lookup.insert(last, slot);
            debug!("Moved {last} from slot {last_slot} to slot {slot}");
        }

        self.slots.swap_remove(slot);
        self.lookup.remove(&id);
        debug!("Destroyed {id}");

        let count = self.slots.len();
        self.subsystem.set_listener_count(count).map_err(|status| {
            error!("{id} destroyed but listener count could not shrink to {count}: {status}");
            AudioError::subsystem(SubsystemCall::SetListenerCount, status)
        })
    }

    /// Queries the subsystem's own listener count.
    pub fn subsystem_listener_count(&self) -> AudioResult<usize> {
        self.subsystem
            .listener_count()
            .map_err(|status| AudioError::subsystem(SubsystemCall::GetListenerCount, status))
    }

    /// Pushes the registry's live count to the subsystem.
    pub fn sync_listener_count(&mut self) -> AudioResult<()> {
        self.subsystem
            .set_listener_count(self.slots.len())
            .map_err(|status| AudioError::subsystem(SubsystemCall::SetListenerCount, status))
    }

    fn resolve(&self, id: ListenerId) -> AudioResult<usize> {
        if id.registry() != self.id() {
            return Err(AudioError::ForeignHandle {
                handle: id,
                registry: self.id(),
            });
        }
        self.slot_of(id).ok_or(AudioError::InvalidHandle(id))
    }

    fn undo_create(&mut self, id: ListenerId) {
        self.slots.pop();
        self.lookup.remove(&id);
    }
}

/// Listener registry shared between threads.
///
/// Every call holds the lock for its whole duration, so a destroy's
/// read-then-write pose copy never interleaves with another mutation.
#[derive(Debug)]
pub struct SharedListenerRegistry<S: ListenerSubsystem> {
    inner: Arc<Mutex<ListenerRegistry<S>>>,
}

impl<S: ListenerSubsystem> Clone for SharedListenerRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListenerSubsystem> From<ListenerRegistry<S>> for SharedListenerRegistry<S> {
    fn from(registry: ListenerRegistry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}

impl<S: ListenerSubsystem> SharedListenerRegistry<S> {
    /// Wraps a new registry around `subsystem`.
    #[must_use]
    pub fn new(subsystem: S) -> Self {
        ListenerRegistry::new(subsystem).into()
    }

    /// Locks the registry for a batch of operations.
    pub fn lock(&self) -> MutexGuard<'_, ListenerRegistry<S>> {
        self.inner.lock()
    }

    /// See [`ListenerRegistry::create`].
    pub fn create(&self) -> AudioResult<ListenerId> {
        self.inner.lock().create()
    }

    /// See [`ListenerRegistry::destroy`].
    pub fn destroy(&self, id: ListenerId) -> AudioResult<()> {
        self.inner.lock().destroy(id)
    }

    /// See [`ListenerRegistry::attributes`].
    pub fn attributes(&self, id: ListenerId) -> AudioResult<Attributes3D> {
        self.inner.lock().attributes(id)
    }

    /// See [`ListenerRegistry::set_attributes`].
    pub fn set_attributes(&self, id: ListenerId, attributes: &Attributes3D) -> AudioResult<()> {
        self.inner.lock().set_attributes(id, attributes)
    }

    /// See [`ListenerRegistry::len`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// See [`ListenerRegistry::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
