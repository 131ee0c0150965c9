//! Listener Subsystem Seam
//!
//! The native audio engine owns listener state. It exposes a slot-indexed
//! listener API: callers declare how many listener slots exist and then read
//! or write the pose stored in each slot. [`ListenerSubsystem`] captures that
//! API so the registry can drive any engine binding.
//!
//! [`HeadlessSubsystem`] is an in-memory implementation with the same
//! validation rules as the native engine. It backs tests and headless runs.
//!
//! # Example
//!
//! ```
//! use earshot_kernel::audio_backend::{HeadlessSubsystem, ListenerSubsystem};
//!
//! let mut subsystem = HeadlessSubsystem::new();
//! subsystem.set_listener_count(2).expect("within capacity");
//! assert_eq!(subsystem.listener_count(), Ok(2));
//! ```

use std::cell::Cell;

use earshot_common::{orientation_is_valid, NativeAttributes3D, SubsystemCall, SubsystemStatus};
use glam::Vec3;
use tracing::debug;

/// Listener cap of the native engine.
pub const MAX_LISTENERS: usize = 8;

/// Result type for raw subsystem calls.
pub type SubsystemResult<T> = Result<T, SubsystemStatus>;

/// Slot-indexed listener API of a 3D audio engine.
pub trait ListenerSubsystem {
    /// Declares how many listener slots exist.
    fn set_listener_count(&mut self, count: usize) -> SubsystemResult<()>;

    /// Returns how many listener slots exist.
    fn listener_count(&self) -> SubsystemResult<usize>;

    /// Reads the pose stored in slot `index`.
    fn listener_attributes(&self, index: usize) -> SubsystemResult<NativeAttributes3D>;

    /// Writes the pose stored in slot `index`.
    fn set_listener_attributes(
        &mut self,
        index: usize,
        attributes: &NativeAttributes3D,
    ) -> SubsystemResult<()>;
}

impl<S: ListenerSubsystem + ?Sized> ListenerSubsystem for Box<S> {
    fn set_listener_count(&mut self, count: usize) -> SubsystemResult<()> {
        (**self).set_listener_count(count)
    }

    fn listener_count(&self) -> SubsystemResult<usize> {
        (**self).listener_count()
    }

    fn listener_attributes(&self, index: usize) -> SubsystemResult<NativeAttributes3D> {
        (**self).listener_attributes(index)
    }

    fn set_listener_attributes(
        &mut self,
        index: usize,
        attributes: &NativeAttributes3D,
    ) -> SubsystemResult<()> {
        (**self).set_listener_attributes(index, attributes)
    }
}

/// A failure armed to fire on the next matching call.
#[derive(Debug, Clone, Copy)]
struct InjectedFault {
    call: SubsystemCall,
    status: SubsystemStatus,
}

/// In-memory listener subsystem.
///
/// New slots start with the engine's default pose. Slot counts above
/// `max_listeners` and out-of-range slot indices are rejected with
/// [`SubsystemStatus::InvalidParam`]. A count of zero is accepted.
#[derive(Debug)]
pub struct HeadlessSubsystem {
    /// Per-slot poses, `len()` is the declared listener count.
    slots: Vec<NativeAttributes3D>,
    /// Maximum number of slots.
    max_listeners: usize,
    /// Failure to return on the next matching call.
    fault: Cell<Option<InjectedFault>>,
    /// Number of successful count changes, for diagnostics.
    count_changes: usize,
}

impl Default for HeadlessSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSubsystem {
    /// Creates a subsystem with the native listener cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_listeners(MAX_LISTENERS)
    }

    /// Creates a subsystem with a custom listener cap.
    #[must_use]
    pub fn with_max_listeners(max_listeners: usize) -> Self {
        debug!("Created headless listener subsystem (max {max_listeners} listeners)");
        Self {
            slots: Vec::new(),
            max_listeners,
            fault: Cell::new(None),
            count_changes: 0,
        }
    }

    /// Returns the listener cap.
    #[must_use]
    pub const fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    /// Returns how many times the slot count was changed successfully.
    #[must_use]
    pub const fn count_changes(&self) -> usize {
        self.count_changes
    }

    /// Makes the next `call` fail with `status`.
    ///
    /// Only one fault is armed at a time; arming again replaces it.
    pub fn fail_next(&self, call: SubsystemCall, status: SubsystemStatus) {
        self.fault.set(Some(InjectedFault { call, status }));
    }

    /// Returns the pose every new slot starts with.
    #[must_use]
    pub fn default_slot() -> NativeAttributes3D {
        NativeAttributes3D {
            forward: Vec3::Z.into(),
            up: Vec3::Y.into(),
            ..NativeAttributes3D::default()
        }
    }

    /// Consumes an armed fault if it targets `call`.
    fn take_fault(&self, call: SubsystemCall) -> SubsystemResult<()> {
        match self.fault.get() {
            Some(fault) if fault.call == call => {
                self.fault.set(None);
                debug!("Injected failure on {call}: {}", fault.status);
                Err(fault.status)
            },
            _ => Ok(()),
        }
    }

    fn check_index(&self, index: usize) -> SubsystemResult<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(SubsystemStatus::InvalidParam)
        }
    }
}

impl ListenerSubsystem for HeadlessSubsystem {
    fn set_listener_count(&mut self, count: usize) -> SubsystemResult<()> {
        self.take_fault(SubsystemCall::SetListenerCount)?;
        if count > self.max_listeners {
            return Err(SubsystemStatus::InvalidParam);
        }
        self.slots.resize(count, Self::default_slot());
        self.count_changes += 1;
        Ok(())
    }

    fn listener_count(&self) -> SubsystemResult<usize> {
        self.take_fault(SubsystemCall::GetListenerCount)?;
        Ok(self.slots.len())
    }

    fn listener_attributes(&self, index: usize) -> SubsystemResult<NativeAttributes3D> {
        self.take_fault(SubsystemCall::GetListenerAttributes)?;
        self.check_index(index)?;
        Ok(self.slots[index])
    }

    fn set_listener_attributes(
        &mut self,
        index: usize,
        attributes: &NativeAttributes3D,
    ) -> SubsystemResult<()> {
        self.take_fault(SubsystemCall::SetListenerAttributes)?;
        self.check_index(index)?;
        if !attributes.is_finite() {
            return Err(SubsystemStatus::InvalidFloat);
        }
        if !orientation_is_valid(attributes.forward.into(), attributes.up.into()) {
            return Err(SubsystemStatus::InvalidVector);
        }
        self.slots[index] = *attributes;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earshot_common::{Attributes3D, NativeVector};

    fn pose_at(x: f32) -> NativeAttributes3D {
        Attributes3D::at(Vec3::new(x, 0.0, 0.0)).into()
    }

    #[test]
    fn test_count_grows_and_shrinks() {
        let mut subsystem = HeadlessSubsystem::new();
        assert_eq!(subsystem.listener_count(), Ok(0));

        subsystem.set_listener_count(3).expect("grow");
        assert_eq!(subsystem.listener_count(), Ok(3));
        assert_eq!(
            subsystem.listener_attributes(2),
            Ok(HeadlessSubsystem::default_slot())
        );

        subsystem.set_listener_count(1).expect("shrink");
        assert_eq!(subsystem.listener_count(), Ok(1));
        assert_eq!(
            subsystem.listener_attributes(1),
            Err(SubsystemStatus::InvalidParam)
        );

        subsystem.set_listener_count(0).expect("empty");
        assert_eq!(subsystem.count_changes(), 3);
    }

    #[test]
    fn test_count_above_cap_rejected() {
        let mut subsystem = HeadlessSubsystem::with_max_listeners(2);
        assert_eq!(subsystem.max_listeners(), 2);
        assert_eq!(
            subsystem.set_listener_count(3),
            Err(SubsystemStatus::InvalidParam)
        );
        assert_eq!(subsystem.listener_count(), Ok(0));
        assert_eq!(subsystem.count_changes(), 0);
    }

    #[test]
    fn test_attributes_round_trip() {
        let mut subsystem = HeadlessSubsystem::new();
        subsystem.set_listener_count(2).expect("grow");
        subsystem
            .set_listener_attributes(1, &pose_at(5.0))
            .expect("write");
        assert_eq!(subsystem.listener_attributes(1), Ok(pose_at(5.0)));
        assert_eq!(
            subsystem.listener_attributes(0),
            Ok(HeadlessSubsystem::default_slot())
        );
    }

    #[test]
    fn test_out_of_range_write_rejected() {
        let mut subsystem = HeadlessSubsystem::new();
        subsystem.set_listener_count(1).expect("grow");
        assert_eq!(
            subsystem.set_listener_attributes(1, &pose_at(1.0)),
            Err(SubsystemStatus::InvalidParam)
        );
    }

    #[test]
    fn test_invalid_orientation_rejected() {
        let mut subsystem = HeadlessSubsystem::new();
        subsystem.set_listener_count(1).expect("grow");

        let mut parallel = pose_at(0.0);
        parallel.up = parallel.forward;
        assert_eq!(
            subsystem.set_listener_attributes(0, &parallel),
            Err(SubsystemStatus::InvalidVector)
        );

        let mut nan = pose_at(0.0);
        nan.position = NativeVector::new(f32::NAN, 0.0, 0.0);
        assert_eq!(
            subsystem.set_listener_attributes(0, &nan),
            Err(SubsystemStatus::InvalidFloat)
        );
    }

    #[test]
    fn test_fault_fires_once_on_matching_call() {
        let mut subsystem = HeadlessSubsystem::new();
        subsystem.fail_next(SubsystemCall::SetListenerCount, SubsystemStatus::Memory);

        // Other calls are unaffected.
        assert_eq!(subsystem.listener_count(), Ok(0));

        assert_eq!(
            subsystem.set_listener_count(1),
            Err(SubsystemStatus::Memory)
        );
        assert_eq!(subsystem.set_listener_count(1), Ok(()));
    }

    #[test]
    fn test_boxed_subsystem() {
        let mut boxed: Box<dyn ListenerSubsystem> = Box::new(HeadlessSubsystem::new());
        boxed.set_listener_count(1).expect("grow");
        assert_eq!(boxed.listener_count(), Ok(1));
    }
}
