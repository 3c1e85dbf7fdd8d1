//! Error handling primitives for the ADS1292R driver.

use crate::device::SessionState;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying transport.
    Interface(E),
    /// The ID register did not hold the ADS1292R identifier.
    DeviceNotFound {
        /// Value read back from the ID register.
        found: u8,
    },
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The operation is not permitted in the current session state.
    InvalidState(SessionState),
    /// Attempted to write a read-only register.
    ReadOnlyRegister(u8),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
