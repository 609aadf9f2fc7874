// SPDX-FileCopyrightText: 2026 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Level, Result};
use std::io::Write;

/// Write each sample to `out` as `0` or `1` on a line of its own.
///
/// Each line is flushed as it is written, so samples are never batched.
///
/// Returns the number of samples written once the samples are exhausted.
/// Stops at the first error, which is returned after the samples preceding
/// it have been written.
pub fn report<I, W>(samples: I, mut out: W) -> Result<u64>
where
    I: IntoIterator<Item = Result<Level>>,
    W: Write,
{
    let mut count = 0;
    for sample in samples {
        let level = sample?;
        writeln!(out, "{}", level)?;
        out.flush()?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, PinId};
    use std::io;

    fn lines(buf: &[u8]) -> Vec<&str> {
        std::str::from_utf8(buf).unwrap().lines().collect()
    }

    #[test]
    fn writes_one_line_per_sample() {
        let samples: [Result<Level>; 5] = [1, 0, 1, 1, 0].map(|v| Ok(Level::from(v == 1)));
        let mut buf: Vec<u8> = Vec::new();
        assert_eq!(report(samples, &mut buf).unwrap(), 5);
        assert_eq!(buf, b"1\n0\n1\n1\n0\n");
    }

    #[test]
    fn stops_at_error() {
        let samples = vec![
            Ok(Level::High),
            Ok(Level::Low),
            Ok(Level::Low),
            Err(Error::Read(PinId(4), "gone".into())),
            Ok(Level::High),
        ];
        let mut buf: Vec<u8> = Vec::new();
        let err = report(samples, &mut buf).unwrap_err();
        assert!(matches!(err, Error::Read(PinId(4), _)));
        assert_eq!(lines(&buf), vec!["1", "0", "0"]);
    }

    #[test]
    fn empty() {
        let mut buf: Vec<u8> = Vec::new();
        assert_eq!(report(Vec::<Result<Level>>::new(), &mut buf).unwrap(), 0);
        assert!(buf.is_empty());
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_failure() {
        let samples: [Result<Level>; 1] = [Ok(Level::High)];
        let err = report(samples, Closed).unwrap_err();
        assert!(matches!(err, Error::Output(e) if e.kind() == io::ErrorKind::BrokenPipe));
    }
}
