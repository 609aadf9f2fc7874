// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::PinId;
use std::fmt;

/// The scheme used to interpret a [`PinId`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum NumberingMode {
    /// Broadcom SoC channel numbering.
    ///
    /// The channel is the line offset on the SoC gpiochip.
    #[default]
    Bcm,

    /// Physical position on the Raspberry Pi 40-pin header.
    Board,
}

impl fmt::Display for NumberingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberingMode::Bcm => write!(f, "BCM"),
            NumberingMode::Board => write!(f, "board"),
        }
    }
}

impl NumberingMode {
    /// The BCM channel for the pin, if the pin names a GPIO in this scheme.
    ///
    /// The channel is not range checked against any particular chip.
    pub fn channel(&self, pin: PinId) -> Option<u32> {
        match self {
            NumberingMode::Bcm => Some(pin.0),
            NumberingMode::Board => board_to_bcm(pin.0),
        }
    }
}

// Header positions without an entry are power, ground or the ID EEPROM pins.
const BOARD_TO_BCM: [Option<u32>; 41] = [
    None,     // 0 - no such pin
    None,     // 1 - 3V3
    None,     // 2 - 5V
    Some(2),  // 3
    None,     // 4 - 5V
    Some(3),  // 5
    None,     // 6 - GND
    Some(4),  // 7
    Some(14), // 8
    None,     // 9 - GND
    Some(15), // 10
    Some(17), // 11
    Some(18), // 12
    Some(27), // 13
    None,     // 14 - GND
    Some(22), // 15
    Some(23), // 16
    None,     // 17 - 3V3
    Some(24), // 18
    Some(10), // 19
    None,     // 20 - GND
    Some(9),  // 21
    Some(25), // 22
    Some(11), // 23
    Some(8),  // 24
    None,     // 25 - GND
    Some(7),  // 26
    None,     // 27 - ID_SD
    None,     // 28 - ID_SC
    Some(5),  // 29
    None,     // 30 - GND
    Some(6),  // 31
    Some(12), // 32
    Some(13), // 33
    None,     // 34 - GND
    Some(19), // 35
    Some(16), // 36
    Some(26), // 37
    Some(20), // 38
    None,     // 39 - GND
    Some(21), // 40
];

fn board_to_bcm(pin: u32) -> Option<u32> {
    BOARD_TO_BCM.get(pin as usize).copied().flatten()
}
