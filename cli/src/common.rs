// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{Context, Result};
use clap::ValueEnum;
use pinpoll::{Interrupt, NumberingMode};

// common helper functions

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum NumberingFlags {
    /// Broadcom SoC channel numbers
    #[default]
    Bcm,
    /// Physical positions on the 40-pin header
    Board,
}
impl From<NumberingFlags> for NumberingMode {
    fn from(n: NumberingFlags) -> Self {
        match n {
            NumberingFlags::Bcm => NumberingMode::Bcm,
            NumberingFlags::Board => NumberingMode::Board,
        }
    }
}

pub fn format_error(verbose: bool, e: &anyhow::Error) -> String {
    if verbose {
        format!("{e:#}")
    } else {
        format!("{e}")
    }
}

// Logs go to stderr, leaving stdout for the samples.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

/// Trigger the interrupt on SIGINT, SIGTERM or SIGHUP.
pub fn handle_interrupts(interrupt: &Interrupt) -> Result<()> {
    let i = interrupt.clone();
    ctrlc::set_handler(move || i.trigger()).context("unable to install the interrupt handler")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn numbering_flags() {
        assert_eq!(NumberingMode::from(NumberingFlags::Bcm), NumberingMode::Bcm);
        assert_eq!(
            NumberingMode::from(NumberingFlags::Board),
            NumberingMode::Board
        );
    }

    #[test]
    fn error_format() {
        let e = anyhow!("device removed").context("failed to read pin 4");
        assert_eq!(format_error(false, &e), "failed to read pin 4");
        assert_eq!(
            format_error(true, &e),
            "failed to read pin 4: device removed"
        );
    }
}
