use crate::checksum::{checksum, sum};
use crate::record::Record;
use crate::Error;
use core::iter::FusedIterator;

/// A byte stream records are read from. `Ok(None)` marks the end of input.
pub trait Source {
    fn next_byte(&mut self) -> Result<Option<u8>, Error>;
}

impl<'a> Source for &'a [u8] {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        (**self).next_byte()
    }
}

/// Adapts any `std::io::Read` into a `Source`. Wrap files in a
/// `BufReader`, bytes are pulled one at a time.
#[cfg(feature = "std")]
pub struct ReadSource<R> {
    bytes: std::io::Bytes<R>,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        ReadSource {
            bytes: std::io::Read::bytes(reader),
        }
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Source for ReadSource<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        self.bytes
            .next()
            .transpose()
            .map_err(|err| Error::Io(err.kind()))
    }
}

/// Why the decoder stopped yielding records without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// The input ended at a record boundary.
    EndOfInput,
    /// A record boundary held this byte instead of `:`.
    MissingMark(u8),
}

/// Reads records one line at a time from a `Source`.
///
/// Yields `Ok(record)` for every record whose checksum holds, `Err` once on
/// the first malformed record and `None` when no further `:` mark is found.
/// The iterator is fused: after an error or a stop it only yields `None`.
pub struct Decoder<S> {
    source: S,
    line: usize,
    line_open: bool,
    stop: Option<Stop>,
    failed: bool,
}

impl<S: Source> Decoder<S> {
    pub fn new(source: S) -> Self {
        Decoder {
            source,
            line: 1,
            line_open: false,
            stop: None,
            failed: false,
        }
    }

    /// The 1-based line the decoder is on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn stop(&self) -> Option<Stop> {
        self.stop
    }

    fn next_record(&mut self) -> Result<Option<Record>, Error> {
        if self.line_open {
            self.finish_line()?;
        }

        match self.source.next_byte()? {
            None => {
                self.stop = Some(Stop::EndOfInput);
                return Ok(None);
            }
            Some(b':') => {}
            Some(byte) => {
                self.stop = Some(Stop::MissingMark(byte));
                return Ok(None);
            }
        }

        let length = self.read_byte()?;
        let high = self.read_byte()?;
        let low = self.read_byte()?;
        let record_type = self.read_byte()?;

        let mut payload = [0; 0xFF];
        for byte in payload[..length as usize].iter_mut() {
            *byte = self.read_byte()?;
        }
        let payload = &payload[..length as usize];

        let expected = self.read_byte()?;
        let computed = checksum(&[length, high, low, record_type]).wrapping_sub(sum(payload));

        if computed != expected {
            return Err(Error::BadChecksum {
                line: self.line,
                computed,
                expected,
            });
        }

        self.line_open = true;

        Ok(Some(Record::new(
            u16::from_be_bytes([high, low]),
            record_type,
            payload,
            expected,
        )))
    }

    /// Decodes the next two characters as one byte.
    fn read_byte(&mut self) -> Result<u8, Error> {
        let pair = [self.read_char()?, self.read_char()?];
        let mut byte = [0u8; 1];

        hex::decode_to_slice(pair, &mut byte)
            .map_err(|err| Error::from(err).at_line(self.line))?;

        Ok(byte[0])
    }

    fn read_char(&mut self) -> Result<u8, Error> {
        self.source
            .next_byte()?
            .ok_or(Error::UnexpectedEnd { line: self.line })
    }

    /// Discards the rest of the current line, terminator included.
    fn finish_line(&mut self) -> Result<(), Error> {
        loop {
            match self.source.next_byte()? {
                Some(b'\n') => {
                    self.line += 1;
                    self.line_open = false;
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(Error::UnexpectedEnd { line: self.line }),
            }
        }
    }
}

impl<S: Source> Iterator for Decoder<S> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.stop.is_some() {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => {
                log::trace!("line {}: {:?}", self.line, record);
                Some(Ok(record))
            }
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<S: Source> FusedIterator for Decoder<S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    #[test]
    fn multi_line_decoder() {
        let mut decoder = Decoder::new(&b":02000004ABCD82\r\n:0400000512345678E3\r\n"[..]);

        let ela = decoder.next().unwrap().unwrap();
        assert_eq!(ela.record_type(), types::EXTENDED_LINEAR_ADDRESS);
        assert_eq!(ela.payload(), &[0xAB, 0xCD]);

        let sla = decoder.next().unwrap().unwrap();
        assert_eq!(sla.record_type(), types::START_LINEAR_ADDRESS);
        assert_eq!(decoder.line(), 2);

        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.stop(), Some(Stop::EndOfInput));
        assert_eq!(decoder.line(), 3);
    }

    #[test]
    fn stops_on_missing_mark() {
        let mut decoder = Decoder::new(&b"00000001FF\n"[..]);

        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.stop(), Some(Stop::MissingMark(b'0')));
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn blank_line_is_a_stop() {
        let mut decoder = Decoder::new(&b":00000001FF\n\n:00000001FF\n"[..]);

        assert!(decoder.next().unwrap().is_ok());
        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.stop(), Some(Stop::MissingMark(b'\n')));
    }

    #[test]
    fn bad_checksum() {
        let mut decoder = Decoder::new(&b":0200000212FEED\n"[..]);

        assert_eq!(
            decoder.next(),
            Some(Err(Error::BadChecksum {
                line: 1,
                computed: 0xEC,
                expected: 0xED,
            }))
        );
        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.stop(), None);
    }

    #[test]
    fn any_single_byte_mutation_breaks_the_checksum() {
        let line = b":0B0010006164647265737320676170A7";

        // every digit pair after the length byte, checksum included
        for position in (3..line.len()).step_by(2) {
            let mut mutated = *line;
            mutated[position] = if mutated[position] == b'0' { b'1' } else { b'0' };

            let mut decoder = Decoder::new(&mutated[..]);
            match decoder.next() {
                Some(Err(Error::BadChecksum { .. })) => {}
                other => panic!("mutation at {} decoded as {:?}", position, other),
            }
        }
    }

    #[test]
    fn invalid_digit() {
        let mut decoder = Decoder::new(&b":00000001FF\n:0G000001FF\n"[..]);

        assert!(decoder.next().unwrap().is_ok());
        assert_eq!(
            decoder.next(),
            Some(Err(Error::InvalidDigit {
                line: 2,
                digit: 'G'
            }))
        );
    }

    #[test]
    fn input_ends_mid_record() {
        let mut decoder = Decoder::new(&b":0400000012"[..]);

        assert_eq!(decoder.next(), Some(Err(Error::UnexpectedEnd { line: 1 })));
    }

    #[test]
    fn input_ends_before_line_terminator() {
        let mut decoder = Decoder::new(&b":0100000055AA"[..]);

        let record = decoder.next().unwrap().unwrap();
        assert_eq!(record.payload(), &[0x55]);

        assert_eq!(decoder.next(), Some(Err(Error::UnexpectedEnd { line: 1 })));
        assert_eq!(decoder.next(), None);
    }

    #[test]
    fn trailing_garbage_on_a_line_is_discarded() {
        let mut decoder = Decoder::new(&b":00000001FF  ; comment\r\n"[..]);

        assert!(decoder.next().unwrap().is_ok());
        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.stop(), Some(Stop::EndOfInput));
    }

    #[test]
    #[cfg(feature = "std")]
    fn read_source() {
        let reader = std::io::Cursor::new(b":00000001FF\n".to_vec());
        let mut decoder = Decoder::new(ReadSource::new(reader));

        let record = decoder.next().unwrap().unwrap();
        assert_eq!(record.record_type(), types::END_OF_FILE);
        assert_eq!(decoder.next(), None);
        assert_eq!(decoder.stop(), Some(Stop::EndOfInput));
    }

    #[test]
    #[cfg(feature = "std")]
    fn read_errors_are_reported() {
        struct Broken;

        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::PermissionDenied.into())
            }
        }

        let mut decoder = Decoder::new(ReadSource::new(Broken));

        assert_eq!(
            decoder.next(),
            Some(Err(Error::Io(std::io::ErrorKind::PermissionDenied)))
        );
    }
}
