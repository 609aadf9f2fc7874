// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library for polling the level of a single GPIO input pin.
//!
//! A [`PinReader`] selects the pin numbering scheme, claims a pin as an input
//! with a passive bias, and yields the levels read from it.
//!
//! The hardware is accessed through the [`Backend`] capability set.
//! The [`cdev`] backend uses the Linux GPIO character device, while the
//! [`mock`] backend provides a scripted stand-in for testing.
//!
//! To claim BCM pin 17 with a pull-down and print its level until interrupted:
//! ```no_run
//! # fn main() -> pinpoll::Result<()> {
//! use pinpoll::backend::cdev::CdevBackend;
//! use pinpoll::{report, Interrupt, NumberingMode, PinId, PinReader, PullBias};
//!
//! let backend = CdevBackend::new("/dev/gpiochip0", "pinpoll");
//! let mut reader = PinReader::initialize(backend, NumberingMode::Bcm)?;
//! let mut claim = reader.configure_input(PinId(17), PullBias::PullDown)?;
//! let interrupt = Interrupt::new();
//! report(claim.samples(&interrupt), std::io::stdout().lock())?;
//! # Ok(())
//! # }
//! ```
//!
//! [`cdev`]: module@backend::cdev
//! [`mock`]: module@backend::mock

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The capability set used to access the GPIO hardware.
pub mod backend;
pub use backend::Backend;

/// Mappings between pin numbering schemes and chip line offsets.
pub mod numbering;
pub use numbering::NumberingMode;

mod reader;
pub use reader::{Claim, PinReader, Samples};

mod report;
pub use report::report;

/// The identifier of a pin within a [`NumberingMode`].
///
/// Parsing only checks that the identifier is a non-negative integer.
/// Whether the pin exists is up to the backend.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PinId(pub u32);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PinId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // u32::from_str accepts a leading '+'
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return s
                .parse()
                .map(PinId)
                .map_err(|e: ParseIntError| Error::InvalidArgument(s.into(), e.to_string()));
        }
        let reason = if s.is_empty() {
            "no pin specified"
        } else {
            "must be a non-negative integer"
        };
        Err(Error::InvalidArgument(s.into(), reason.into()))
    }
}

/// The passive bias applied to an input pin.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PullBias {
    /// An unconnected input settles low.
    #[default]
    PullDown,
    /// An unconnected input settles high.
    PullUp,
    /// No internal resistor, so an unconnected input floats.
    Disabled,
}

impl fmt::Display for PullBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PullBias::PullDown => "pull-down",
            PullBias::PullUp => "pull-up",
            PullBias::Disabled => "disabled",
        };
        write!(f, "{}", name)
    }
}

/// The logic level observed on a pin at the moment it was sampled.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl From<bool> for Level {
    fn from(b: bool) -> Self {
        if b {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for u8 {
    fn from(l: Level) -> u8 {
        match l {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A request to stop sampling, shared with a signal handler.
///
/// Cloning produces a handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that sampling stop before the next read.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The underlying cause of a backend failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`pinpoll`] functions.
///
/// [`pinpoll`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pin argument is missing or is not a non-negative integer.
    #[error("invalid pin '{0}': {1}")]
    InvalidArgument(String, String),

    /// The GPIO hardware interface could not be initialized.
    #[error("GPIO backend unavailable: {0}")]
    BackendUnavailable(String, #[source] Cause),

    /// The pin does not exist in the active numbering scheme.
    #[error("pin {0} is not a valid GPIO in {1} numbering")]
    InvalidPin(PinId, NumberingMode),

    /// The pin has already been claimed.
    #[error("pin {} is busy{}", .0, consumer_suffix(.1))]
    PinBusy(PinId, Option<String>),

    /// Access to the pin was denied.
    #[error("permission denied claiming pin {0}")]
    Permission(PinId, #[source] Cause),

    /// The backend rejected the claim for some other reason.
    #[error("failed to configure pin {0} as an input")]
    Configure(PinId, #[source] Cause),

    /// A pin was configured or read before the numbering mode was set.
    #[error("numbering mode has not been set")]
    NumberingUnset,

    /// Reading the level of a configured pin failed.
    #[error("failed to read pin {0}")]
    Read(PinId, #[source] Cause),

    /// Sampling was stopped by an external request.
    #[error("interrupted")]
    Interrupted,

    /// The samples could not be written out.
    #[error("failed to write sample")]
    Output(#[from] std::io::Error),
}

impl Error {
    /// Returns true for the orderly end of sampling rather than a failure.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Error::Interrupted)
    }
}

fn consumer_suffix(consumer: &Option<String>) -> String {
    match consumer {
        Some(c) if !c.is_empty() => format!(" - in use by '{c}'"),
        _ => String::new(),
    }
}

/// The result for [`pinpoll`] functions.
///
/// [`pinpoll`]: crate
pub type Result<T> = std::result::Result<T, Error>;
