// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for polling the level of a GPIO input pin.

use anyhow::{Context, Result};
use clap::Parser;
use common::{format_error, NumberingFlags};
use log::info;
use pinpoll::backend::cdev::{chip_path, CdevBackend};
use pinpoll::{Backend, Interrupt, PinId, PinReader, PullBias};
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

mod common;

fn main() -> ExitCode {
    let interrupt = Interrupt::new();
    if let Err(e) = common::handle_interrupts(&interrupt) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }
    let open = |opts: &Opts| CdevBackend::new(chip_path(&opts.chip), &opts.consumer);
    exec(std::env::args_os(), open, &interrupt, io::stdout().lock()).into()
}

#[derive(Debug, Parser)]
#[command(
    name = "pinpoll",
    about = "Continuously report the level of a GPIO input pin with a pull-down bias.",
    version
)]
struct Opts {
    /// The pin to read
    ///
    /// The pin is identified by its number in the selected numbering scheme,
    /// e.g. 17 for GPIO17 in BCM numbering.
    #[arg(value_name = "pin", value_parser = parse_pin)]
    pin: PinId,

    /// The GPIO chip hosting the pin
    ///
    /// The chip may be identified by number, name, or path.
    #[arg(
        short,
        long,
        value_name = "chip",
        env = "PINPOLL_CHIP",
        default_value = "gpiochip0"
    )]
    chip: String,

    /// The scheme used to number the pin
    #[arg(
        short,
        long,
        value_name = "scheme",
        env = "PINPOLL_NUMBERING",
        value_enum,
        ignore_case = true,
        default_value = "bcm"
    )]
    numbering: NumberingFlags,

    /// The consumer label applied to the requested line.
    #[arg(short = 'C', long, value_name = "name", default_value = "pinpoll")]
    consumer: String,

    /// Provide more detailed error messages and debug logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn parse_pin(s: &str) -> pinpoll::Result<PinId> {
    s.parse()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Status {
    Success,
    Failure,
}
impl From<Status> for ExitCode {
    fn from(s: Status) -> Self {
        match s {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

// The backend is only opened once the arguments have been parsed.
fn exec<I, T, B, F, W>(args: I, open: F, interrupt: &Interrupt, out: W) -> Status
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: Backend,
    F: FnOnce(&Opts) -> B,
    W: Write,
{
    let opts = match Opts::try_parse_from(args) {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                Status::Failure
            } else {
                Status::Success
            };
        }
    };
    common::init_logging(opts.verbose);
    match poll(&opts, open(&opts), interrupt, out) {
        Ok(()) => Status::Success,
        Err(e) => {
            eprintln!("{}", format_error(opts.verbose, &e));
            Status::Failure
        }
    }
}

// Reports samples until interrupted, which is the only way it returns Ok.
fn poll<B, W>(opts: &Opts, backend: B, interrupt: &Interrupt, out: W) -> Result<()>
where
    B: Backend,
    W: Write,
{
    let mut reader = PinReader::initialize(backend, opts.numbering.into())?;
    let mut claim = reader.configure_input(opts.pin, PullBias::PullDown)?;
    info!("polling pin {} on {}", opts.pin, opts.chip);
    let res = pinpoll::report(claim.samples(interrupt), out);
    let released = claim.release();
    match res {
        Err(e) if e.is_interrupt() => info!("polling of pin {} interrupted", opts.pin),
        Err(e) => return Err(e.into()),
        Ok(n) => info!("polling of pin {} ended after {} samples", opts.pin, n),
    }
    released.with_context(|| format!("failed to release pin {}", opts.pin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoll::backend::mock::{Call, MockBackend};
    use pinpoll::{Level, NumberingMode};

    fn run(args: &[&str], mock: &MockBackend, interrupt: &Interrupt) -> (Status, String) {
        let mut out: Vec<u8> = Vec::new();
        let args = std::iter::once("pinpoll").chain(args.iter().copied());
        let status = exec(args, |_| mock.clone(), interrupt, &mut out);
        (status, String::from_utf8(out).unwrap())
    }

    fn reads(mock: &MockBackend) -> usize {
        mock.count(|c| matches!(c, Call::Read(_)))
    }

    fn releases(mock: &MockBackend) -> usize {
        mock.count(|c| matches!(c, Call::Release(_)))
    }

    #[test]
    fn parse_args() {
        let opts = Opts::try_parse_from(["pinpoll", "17"]).unwrap();
        assert_eq!(opts.pin, PinId(17));
        assert_eq!(opts.chip, "gpiochip0");
        assert_eq!(NumberingMode::from(opts.numbering), NumberingMode::Bcm);
        assert_eq!(opts.consumer, "pinpoll");
        assert!(!opts.verbose);

        let opts =
            Opts::try_parse_from(["pinpoll", "-c", "1", "-n", "BOARD", "-C", "door", "11"])
                .unwrap();
        assert_eq!(opts.pin, PinId(11));
        assert_eq!(opts.chip, "1");
        assert_eq!(NumberingMode::from(opts.numbering), NumberingMode::Board);
        assert_eq!(opts.consumer, "door");
    }

    #[test]
    fn bad_args_never_reach_backend() {
        let cases: [&[&str]; 5] = [&[], &["abc"], &["-1"], &["1.5"], &["17", "18"]];
        for args in cases {
            let mock = MockBackend::new(28).with_levels([1]);
            let (status, out) = run(args, &mock, &Interrupt::new());
            assert_eq!(status, Status::Failure, "{args:?}");
            assert!(out.is_empty());
            assert!(mock.calls().is_empty(), "{args:?}");
        }
    }

    #[test]
    fn help_succeeds() {
        let mock = MockBackend::new(28);
        let (status, _) = run(&["--help"], &mock, &Interrupt::new());
        assert_eq!(status, Status::Success);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn reports_in_order() {
        let interrupt = Interrupt::new();
        let mock = MockBackend::new(28).with_levels([1, 0, 1, 1, 0]);
        mock.interrupt_when_drained(&interrupt);
        let (status, out) = run(&["17"], &mock, &interrupt);
        assert_eq!(status, Status::Success);
        assert_eq!(out, "1\n0\n1\n1\n0\n");
    }

    #[test]
    fn interrupt_releases_once() {
        let interrupt = Interrupt::new();
        let mock = MockBackend::new(28).with_levels([0, 0, 1]);
        mock.interrupt_when_drained(&interrupt);
        let (status, out) = run(&["17"], &mock, &interrupt);
        assert_eq!(status, Status::Success);
        assert_eq!(out.lines().count(), 3);
        assert_eq!(reads(&mock), 3);
        assert_eq!(releases(&mock), 1);
        assert_eq!(
            mock.calls(),
            vec![
                Call::SetNumberingMode(NumberingMode::Bcm),
                Call::ConfigureInput(PinId(17), PullBias::PullDown),
                Call::Read(PinId(17)),
                Call::Read(PinId(17)),
                Call::Read(PinId(17)),
                Call::Release(PinId(17)),
            ]
        );
    }

    #[test]
    fn read_error_is_fatal() {
        let mock = MockBackend::new(28).with_levels([1, 0, 1]);
        mock.push_fault("device removed");
        mock.push_level(Level::High);
        let (status, out) = run(&["17"], &mock, &Interrupt::new());
        assert_eq!(status, Status::Failure);
        assert_eq!(out, "1\n0\n1\n");
        assert_eq!(reads(&mock), 4);
        assert_eq!(releases(&mock), 1);
    }

    #[test]
    fn interrupted_before_first_read() {
        let interrupt = Interrupt::new();
        interrupt.trigger();
        let mock = MockBackend::new(28).with_levels([1]);
        let (status, out) = run(&["17"], &mock, &interrupt);
        assert_eq!(status, Status::Success);
        assert!(out.is_empty());
        assert_eq!(reads(&mock), 0);
        assert_eq!(releases(&mock), 1);
    }

    #[test]
    fn unavailable_backend() {
        let mock = MockBackend::new(28);
        mock.make_unavailable();
        let (status, _) = run(&["17"], &mock, &Interrupt::new());
        assert_eq!(status, Status::Failure);
        assert_eq!(mock.count(|c| matches!(c, Call::ConfigureInput(..))), 0);
    }

    #[test]
    fn invalid_pin() {
        let mock = MockBackend::new(28).with_levels([1]);
        let (status, out) = run(&["28"], &mock, &Interrupt::new());
        assert_eq!(status, Status::Failure);
        assert!(out.is_empty());
        assert_eq!(reads(&mock), 0);
        assert_eq!(releases(&mock), 0);
    }

    #[test]
    fn busy_pin() {
        let mock = MockBackend::new(28).with_levels([1]);
        mock.claim_elsewhere(PinId(17), "other");
        let (status, _) = run(&["17"], &mock, &Interrupt::new());
        assert_eq!(status, Status::Failure);
        assert_eq!(reads(&mock), 0);
    }

    #[test]
    fn board_numbering() {
        let interrupt = Interrupt::new();
        let mock = MockBackend::new(28).with_levels([1]);
        mock.interrupt_when_drained(&interrupt);
        let (status, out) = run(&["--numbering", "board", "11"], &mock, &interrupt);
        assert_eq!(status, Status::Success);
        assert_eq!(out, "1\n");
        assert_eq!(mock.mode(), Some(NumberingMode::Board));

        // a ground pin
        let mock = MockBackend::new(28).with_levels([1]);
        let (status, _) = run(&["-n", "board", "6"], &mock, &Interrupt::new());
        assert_eq!(status, Status::Failure);
    }
}
