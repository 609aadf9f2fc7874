// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::backend::Backend;
use crate::{Error, Interrupt, Level, NumberingMode, PinId, PullBias, Result};
use log::{debug, warn};
use std::iter::FusedIterator;

/// Reads the level of input pins using a [`Backend`].
///
/// The numbering mode is selected when the reader is created and applies to
/// all pins subsequently claimed through it.
#[derive(Debug)]
pub struct PinReader<B: Backend> {
    backend: B,
    mode: NumberingMode,
}

impl<B: Backend> PinReader<B> {
    /// Take ownership of the backend and select the numbering mode.
    ///
    /// The backend is consumed, so the mode is set exactly once and before any
    /// pin is configured.
    pub fn initialize(mut backend: B, mode: NumberingMode) -> Result<Self> {
        backend.set_numbering_mode(mode)?;
        debug!("initialized with {} numbering", mode);
        Ok(PinReader { backend, mode })
    }

    pub fn mode(&self) -> NumberingMode {
        self.mode
    }

    /// Claim a pin as an input with the given bias.
    ///
    /// The pin remains claimed until the returned [`Claim`] is released or dropped.
    pub fn configure_input(&mut self, pin: PinId, bias: PullBias) -> Result<Claim<'_, B>> {
        self.backend.configure_input(pin, bias)?;
        Ok(Claim {
            backend: &mut self.backend,
            pin,
            bias,
            released: false,
        })
    }

    /// Return the backend, consuming the reader.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

/// A pin claimed as an input.
///
/// The pin is released when the claim is dropped, whether sampling ended
/// normally, failed, or was interrupted.
#[derive(Debug)]
pub struct Claim<'a, B: Backend> {
    backend: &'a mut B,
    pin: PinId,
    bias: PullBias,
    released: bool,
}

impl<B: Backend> Claim<'_, B> {
    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn bias(&self) -> PullBias {
        self.bias
    }

    /// Read the current level of the pin.
    pub fn read(&mut self) -> Result<Level> {
        self.backend.read(self.pin)
    }

    /// An unbounded sequence of the levels read from the pin.
    ///
    /// Reads are performed back to back as the sequence is consumed, with no
    /// delay, filtering or buffering.
    ///
    /// The sequence ends after yielding the first error.
    /// Once the interrupt is triggered the sequence yields [`Error::Interrupted`]
    /// in place of the next read.
    pub fn samples(&mut self, interrupt: &Interrupt) -> Samples<'_, B> {
        Samples {
            backend: &mut *self.backend,
            pin: self.pin,
            interrupt: interrupt.clone(),
            count: 0,
            done: false,
        }
    }

    /// Release the pin, reporting any failure to do so.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.backend.release(self.pin)
    }
}

impl<B: Backend> Drop for Claim<'_, B> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.backend.release(self.pin) {
            warn!("failed to release pin {}: {}", self.pin, e);
        }
    }
}

/// The sequence of levels read from a claimed pin.
///
/// Returned by [`Claim::samples`].
#[derive(Debug)]
pub struct Samples<'a, B: Backend> {
    backend: &'a mut B,
    pin: PinId,
    interrupt: Interrupt,
    count: u64,
    done: bool,
}

impl<B: Backend> Samples<'_, B> {
    /// The number of levels successfully read so far.
    pub fn samples_read(&self) -> u64 {
        self.count
    }
}

impl<B: Backend> Iterator for Samples<'_, B> {
    type Item = Result<Level>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.interrupt.is_triggered() {
            self.done = true;
            debug!("pin {} interrupted after {} samples", self.pin, self.count);
            return Some(Err(Error::Interrupted));
        }
        match self.backend.read(self.pin) {
            Ok(level) => {
                self.count += 1;
                Some(Ok(level))
            }
            Err(e) => {
                self.done = true;
                debug!("pin {} read failed after {} samples", self.pin, self.count);
                Some(Err(e))
            }
        }
    }
}

impl<B: Backend> FusedIterator for Samples<'_, B> {}
