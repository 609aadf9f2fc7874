// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::Backend;
use crate::{Error, Interrupt, Level, NumberingMode, PinId, PullBias, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A call made on a [`MockBackend`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Call {
    SetNumberingMode(NumberingMode),
    ConfigureInput(PinId, PullBias),
    Read(PinId),
    Release(PinId),
}

#[derive(Clone, Debug)]
enum Reading {
    Level(Level),
    Fault(String),
}

#[derive(Debug, Default)]
struct State {
    num_lines: u32,
    unavailable: bool,
    mode: Option<NumberingMode>,
    claimed: HashMap<PinId, PullBias>,
    foreign: HashMap<PinId, String>,
    denied: HashSet<PinId>,
    readings: VecDeque<Reading>,
    drained: Option<Interrupt>,
    calls: Vec<Call>,
}

/// A deterministic backend for exercising a [`PinReader`] without hardware.
///
/// Reads return the scripted levels and faults in order.
/// Reading past the end of the script fails.
///
/// Clones share state, so a clone retained by a test can inspect the calls
/// made after the original has been handed to a [`PinReader`].
///
/// [`PinReader`]: crate::PinReader
#[derive(Clone, Debug, Default)]
pub struct MockBackend(Arc<Mutex<State>>);

impl MockBackend {
    /// Create a mock of a chip with `num_lines` lines.
    pub fn new(num_lines: u32) -> Self {
        let s = MockBackend::default();
        s.state().num_lines = num_lines;
        s
    }

    /// Append levels to the script, non-zero values being high.
    pub fn with_levels<I: IntoIterator<Item = u8>>(self, levels: I) -> Self {
        for v in levels {
            self.push_level(Level::from(v != 0));
        }
        self
    }

    pub fn push_level(&self, level: Level) {
        self.state().readings.push_back(Reading::Level(level));
    }

    /// Append a read failure to the script.
    pub fn push_fault(&self, msg: &str) {
        self.state().readings.push_back(Reading::Fault(msg.into()));
    }

    /// Trigger the interrupt as the last scripted reading is returned.
    pub fn interrupt_when_drained(&self, interrupt: &Interrupt) {
        self.state().drained = Some(interrupt.clone());
    }

    /// Make the backend fail to initialize.
    pub fn make_unavailable(&self) {
        self.state().unavailable = true;
    }

    /// Mark the pin as held by another consumer.
    pub fn claim_elsewhere(&self, pin: PinId, consumer: &str) {
        self.state().foreign.insert(pin, consumer.into());
    }

    /// Deny access to the pin.
    pub fn deny(&self, pin: PinId) {
        self.state().denied.insert(pin);
    }

    /// The calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// The number of calls matching the predicate.
    pub fn count<F: Fn(&Call) -> bool>(&self, f: F) -> usize {
        self.state().calls.iter().filter(|c| f(c)).count()
    }

    pub fn mode(&self) -> Option<NumberingMode> {
        self.state().mode
    }

    /// The bias applied to the pin, if it is currently claimed.
    pub fn bias(&self, pin: PinId) -> Option<PullBias> {
        self.state().claimed.get(&pin).copied()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for MockBackend {
    fn set_numbering_mode(&mut self, mode: NumberingMode) -> Result<()> {
        let mut s = self.state();
        s.calls.push(Call::SetNumberingMode(mode));
        if s.unavailable {
            return Err(Error::BackendUnavailable(
                "mock".into(),
                "no such device".into(),
            ));
        }
        s.mode = Some(mode);
        Ok(())
    }

    fn configure_input(&mut self, pin: PinId, bias: PullBias) -> Result<()> {
        let mut s = self.state();
        s.calls.push(Call::ConfigureInput(pin, bias));
        let mode = s.mode.ok_or(Error::NumberingUnset)?;
        match mode.channel(pin) {
            Some(ch) if ch < s.num_lines => {}
            _ => return Err(Error::InvalidPin(pin, mode)),
        }
        if let Some(consumer) = s.foreign.get(&pin) {
            return Err(Error::PinBusy(pin, Some(consumer.clone())));
        }
        if s.claimed.contains_key(&pin) {
            return Err(Error::PinBusy(pin, None));
        }
        if s.denied.contains(&pin) {
            return Err(Error::Permission(pin, "permission denied".into()));
        }
        s.claimed.insert(pin, bias);
        Ok(())
    }

    fn read(&mut self, pin: PinId) -> Result<Level> {
        let mut s = self.state();
        s.calls.push(Call::Read(pin));
        if s.mode.is_none() {
            return Err(Error::NumberingUnset);
        }
        if !s.claimed.contains_key(&pin) {
            return Err(Error::Read(pin, "pin is not claimed".into()));
        }
        let reading = s
            .readings
            .pop_front()
            .ok_or_else(|| Error::Read(pin, "script exhausted".into()))?;
        if s.readings.is_empty() {
            if let Some(i) = &s.drained {
                i.trigger();
            }
        }
        match reading {
            Reading::Level(l) => Ok(l),
            Reading::Fault(msg) => Err(Error::Read(pin, msg.into())),
        }
    }

    fn release(&mut self, pin: PinId) -> Result<()> {
        let mut s = self.state();
        s.calls.push(Call::Release(pin));
        s.claimed.remove(&pin);
        Ok(())
    }
}
