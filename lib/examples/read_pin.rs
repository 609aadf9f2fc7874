// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Basic example of reading a pin once.

use pinpoll::backend::cdev::CdevBackend;
use pinpoll::{NumberingMode, PinId, PinReader, PullBias};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let backend = CdevBackend::new("/dev/gpiochip0", "read-pin");
    let mut reader = PinReader::initialize(backend, NumberingMode::Bcm)?;
    let pin = PinId(22);
    let mut claim = reader.configure_input(pin, PullBias::PullDown)?;

    println!("{pin}={}", claim.read()?);

    Ok(())
}
