//! ID types for listeners and the registries that own them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Global counter for registry IDs.
static REGISTRY_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Unique identifier for a listener registry within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryId(u32);

impl RegistryId {
    /// Creates a new unique registry ID.
    #[must_use]
    pub fn new() -> Self {
        Self(REGISTRY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a registry ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for RegistryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registry#{}", self.0)
    }
}

/// Opaque handle to a listener.
///
/// The serial is never reused by the registry that minted it, so a handle
/// stays invalid once its listener is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId {
    serial: u64,
    registry: RegistryId,
}

impl ListenerId {
    /// Creates a listener ID from its parts.
    #[must_use]
    pub const fn new(serial: u64, registry: RegistryId) -> Self {
        Self { serial, registry }
    }

    /// Returns the per-registry serial number.
    #[must_use]
    pub const fn serial(self) -> u64 {
        self.serial
    }

    /// Returns the registry that minted this handle.
    #[must_use]
    pub const fn registry(self) -> RegistryId {
        self.registry
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}@{}", self.serial, self.registry.raw())
    }
}

/// Mints listener handles for one registry.
#[derive(Debug)]
pub struct ListenerIdGenerator {
    registry: RegistryId,
    next_serial: u64,
}

impl ListenerIdGenerator {
    /// Creates a generator bound to `registry`.
    #[must_use]
    pub const fn new(registry: RegistryId) -> Self {
        Self {
            registry,
            next_serial: 0,
        }
    }

    /// Returns the registry this generator mints handles for.
    #[must_use]
    pub const fn registry(&self) -> RegistryId {
        self.registry
    }

    /// Mints the next handle.
    pub fn next_id(&mut self) -> ListenerId {
        let id = ListenerId::new(self.next_serial, self.registry);
        self.next_serial += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ids_are_unique() {
        let a = RegistryId::new();
        let b = RegistryId::new();
        assert_ne!(a, b);
        assert_eq!(RegistryId::from_raw(a.raw()), a);
    }

    #[test]
    fn test_generator_never_repeats() {
        let mut generator = ListenerIdGenerator::new(RegistryId::from_raw(7));
        let first = generator.next_id();
        let second = generator.next_id();
        assert_ne!(first, second);
        assert_eq!(first.registry(), RegistryId::from_raw(7));
        assert_eq!(second.serial(), first.serial() + 1);
    }

    #[test]
    fn test_same_serial_different_registry() {
        let a = ListenerId::new(0, RegistryId::from_raw(1));
        let b = ListenerId::new(0, RegistryId::from_raw(2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let id = ListenerId::new(3, RegistryId::from_raw(9));
        assert_eq!(id.to_string(), "listener#3@9");
        assert_eq!(RegistryId::from_raw(9).to_string(), "registry#9");
    }
}
