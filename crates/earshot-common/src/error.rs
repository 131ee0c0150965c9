//! Error types for Earshot.

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::ids::{ListenerId, RegistryId};

/// Top-level error type for listener operations.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Handle was destroyed or never created
    #[error("Invalid listener handle: {0}")]
    InvalidHandle(ListenerId),

    /// Handle was minted by a different registry
    #[error("Listener {handle} does not belong to {registry}")]
    ForeignHandle {
        /// The offending handle
        handle: ListenerId,
        /// The registry it was passed to
        registry: RegistryId,
    },

    /// The audio subsystem reported a failure
    #[error("Audio subsystem call {call} failed: {status}")]
    Subsystem {
        /// Which call failed
        call: SubsystemCall,
        /// Status code returned by the subsystem
        status: SubsystemStatus,
    },
}

impl AudioError {
    /// Builds a subsystem error for `call`.
    #[must_use]
    pub const fn subsystem(call: SubsystemCall, status: SubsystemStatus) -> Self {
        Self::Subsystem { call, status }
    }

    /// Returns the subsystem status if this is a subsystem failure.
    #[must_use]
    pub const fn status(&self) -> Option<SubsystemStatus> {
        match self {
            Self::Subsystem { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Listener calls the registry makes into the audio subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemCall {
    /// Declare the number of listener slots
    SetListenerCount,
    /// Query the number of listener slots
    GetListenerCount,
    /// Read one slot's pose
    GetListenerAttributes,
    /// Write one slot's pose
    SetListenerAttributes,
}

impl SubsystemCall {
    /// Returns the call name as the native API spells it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SetListenerCount => "set3DNumListeners",
            Self::GetListenerCount => "get3DNumListeners",
            Self::GetListenerAttributes => "get3DListenerAttributes",
            Self::SetListenerAttributes => "set3DListenerAttributes",
        }
    }
}

impl fmt::Display for SubsystemCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-OK status codes returned by the native audio engine.
///
/// Discriminants match the engine's result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(i32)]
pub enum SubsystemStatus {
    /// Internal engine error
    #[error("internal error")]
    Internal = 28,
    /// A float argument was NaN or infinite
    #[error("invalid float value")]
    InvalidFloat = 29,
    /// An engine object handle was invalid
    #[error("invalid handle")]
    InvalidHandle = 30,
    /// An argument was out of range
    #[error("invalid parameter")]
    InvalidParam = 31,
    /// Orientation vectors were zero or not orthogonal
    #[error("invalid orientation vector")]
    InvalidVector = 36,
    /// Allocation failed
    #[error("out of memory")]
    Memory = 38,
    /// The engine has not been initialized
    #[error("audio engine not initialized")]
    Uninitialized = 67,
    /// The call is not supported by this engine
    #[error("unsupported operation")]
    Unsupported = 68,
}

impl SubsystemStatus {
    /// Translates a raw engine result code.
    ///
    /// `0` is success. Codes without a dedicated variant map to
    /// [`SubsystemStatus::Internal`].
    pub fn from_code(code: i32) -> Result<(), Self> {
        let status = match code {
            0 => return Ok(()),
            28 => Self::Internal,
            29 => Self::InvalidFloat,
            30 => Self::InvalidHandle,
            31 => Self::InvalidParam,
            36 => Self::InvalidVector,
            38 => Self::Memory,
            67 => Self::Uninitialized,
            68 => Self::Unsupported,
            other => {
                warn!("Unrecognized audio engine result code {other}");
                Self::Internal
            },
        };
        Err(status)
    }

    /// Returns the raw engine result code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Result type alias for listener operations.
pub type AudioResult<T> = Result<T, AudioError>;
