// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Level, NumberingMode, PinId, PullBias, Result};

/// Access to GPIO lines via the Linux GPIO character device.
#[cfg(feature = "cdev")]
pub mod cdev;

/// A scripted in-memory backend that records the calls made on it.
pub mod mock;

/// The operations a [`PinReader`] requires of the GPIO hardware.
///
/// The numbering mode is set once, before any pin is configured.
/// Pins are identified within that numbering mode.
///
/// [`PinReader`]: crate::PinReader
pub trait Backend {
    /// Select the scheme used to interpret pin identifiers.
    ///
    /// Fails with [`BackendUnavailable`] if the hardware cannot be accessed.
    ///
    /// [`BackendUnavailable`]: crate::Error::BackendUnavailable
    fn set_numbering_mode(&mut self, mode: NumberingMode) -> Result<()>;

    /// Claim the pin as an input with the given bias.
    ///
    /// Claiming a pin that is already claimed fails with [`PinBusy`]
    /// and leaves the existing configuration unchanged.
    ///
    /// [`PinBusy`]: crate::Error::PinBusy
    fn configure_input(&mut self, pin: PinId, bias: PullBias) -> Result<()>;

    /// Read the current level of a claimed pin.
    fn read(&mut self, pin: PinId) -> Result<Level>;

    /// Release a claimed pin so it may be claimed again.
    fn release(&mut self, pin: PinId) -> Result<()>;
}

