// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::Backend;
use crate::{Error, Level, NumberingMode, PinId, PullBias, Result};
use gpiocdev::chip::Chip;
use gpiocdev::line::{Bias, Offset};
use gpiocdev::Request;
use gpiocdev_uapi::Errno;
use log::{debug, trace};
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolve a chip identifier to the path of its character device.
///
/// The identifier may be the chip number, the name of the device in `/dev`,
/// or a path.
pub fn chip_path(id: &str) -> PathBuf {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        return format!("/dev/gpiochip{id}").into();
    }
    if !id.contains('/') {
        let mut p: PathBuf = "/dev".into();
        p.push(id);
        return p;
    }
    id.into()
}

impl From<PullBias> for Bias {
    fn from(b: PullBias) -> Self {
        match b {
            PullBias::PullDown => Bias::PullDown,
            PullBias::PullUp => Bias::PullUp,
            PullBias::Disabled => Bias::Disabled,
        }
    }
}

#[derive(Debug)]
struct Claimed {
    offset: Offset,
    req: Request,
}

/// A [`Backend`] using a GPIO character device.
///
/// Pins are mapped to line offsets on a single chip, so the chip must be
/// the one hosting the SoC GPIOs for the BCM and board numberings to apply.
///
/// The chip is opened when the numbering mode is set.
/// Each claimed pin is held as a separate line request, which the kernel
/// releases when the request is dropped.
#[derive(Debug)]
pub struct CdevBackend {
    path: PathBuf,
    consumer: String,
    chip: Option<(Chip, u32)>,
    mode: Option<NumberingMode>,
    claimed: HashMap<PinId, Claimed>,
}

impl CdevBackend {
    /// Create a backend for the chip at `path`, labelling requests with `consumer`.
    pub fn new<P: Into<PathBuf>>(path: P, consumer: &str) -> Self {
        CdevBackend {
            path: path.into(),
            consumer: consumer.into(),
            chip: None,
            mode: None,
            claimed: HashMap::new(),
        }
    }

    fn offset(&self, pin: PinId) -> Result<(Offset, &Chip)> {
        let mode = self.mode.ok_or(Error::NumberingUnset)?;
        let (chip, num_lines) = self.chip.as_ref().ok_or(Error::NumberingUnset)?;
        match mode.channel(pin) {
            Some(offset) if offset < *num_lines => Ok((offset, chip)),
            _ => Err(Error::InvalidPin(pin, mode)),
        }
    }
}

impl Backend for CdevBackend {
    fn set_numbering_mode(&mut self, mode: NumberingMode) -> Result<()> {
        let unavailable = |e: gpiocdev::Error| {
            Error::BackendUnavailable(
                format!("unable to open chip '{}'", self.path.display()),
                Box::new(e),
            )
        };
        let chip = Chip::from_path(&self.path).map_err(unavailable)?;
        let info = chip.info().map_err(unavailable)?;
        debug!(
            "opened {} ({}) with {} lines using {} numbering",
            chip.name(),
            info.label,
            info.num_lines,
            mode
        );
        self.chip = Some((chip, info.num_lines));
        self.mode = Some(mode);
        Ok(())
    }

    fn configure_input(&mut self, pin: PinId, bias: PullBias) -> Result<()> {
        let (offset, chip) = self.offset(pin)?;
        if self.claimed.contains_key(&pin) {
            return Err(Error::PinBusy(pin, Some(self.consumer.clone())));
        }
        // the request would fail anyway, but the info names the holder
        if let Ok(li) = chip.line_info(offset) {
            if li.used {
                return Err(Error::PinBusy(pin, Some(li.consumer)));
            }
        }
        let req = Request::builder()
            .on_chip(&self.path)
            .with_consumer(self.consumer.as_str())
            .with_line(offset)
            .as_input()
            .with_bias(Bias::from(bias))
            .request()
            .map_err(|e| claim_error(pin, e))?;
        debug!(
            "claimed pin {} as line {} on {} with {} bias",
            pin,
            offset,
            self.path.display(),
            bias
        );
        self.claimed.insert(pin, Claimed { offset, req });
        Ok(())
    }

    fn read(&mut self, pin: PinId) -> Result<Level> {
        let c = self
            .claimed
            .get(&pin)
            .ok_or_else(|| Error::Read(pin, "pin is not claimed".into()))?;
        let value = c
            .req
            .value(c.offset)
            .map_err(|e| Error::Read(pin, Box::new(e)))?;
        trace!("pin {} is {}", pin, value);
        Ok(Level::from(bool::from(value)))
    }

    fn release(&mut self, pin: PinId) -> Result<()> {
        if let Some(c) = self.claimed.remove(&pin) {
            debug!("released pin {} (line {})", pin, c.offset);
        }
        Ok(())
    }
}

fn claim_error(pin: PinId, e: gpiocdev::Error) -> Error {
    match os_errno(&e) {
        Some(libc::EBUSY) => Error::PinBusy(pin, None),
        Some(libc::EACCES) | Some(libc::EPERM) => Error::Permission(pin, Box::new(e)),
        _ => Error::Configure(pin, Box::new(e)),
    }
}

fn os_errno(e: &gpiocdev::Error) -> Option<i32> {
    match e {
        gpiocdev::Error::Os(Errno(n))
        | gpiocdev::Error::Uapi(_, gpiocdev_uapi::Error::Os(Errno(n))) => Some(*n),
        _ => None,
    }
}
