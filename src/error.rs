use core::fmt;

/// Failure while decoding or assembling records. Every variant aborts the
/// parse; nothing is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A single line handed to `Record::from_str` did not start with `:`.
    MissingColon,
    /// A single line handed to `Record::from_str` carried more than a line
    /// terminator after its checksum.
    TrailingCharacters,
    /// A character outside `0-9A-Fa-f` where a hex digit was required.
    InvalidDigit { line: usize, digit: char },
    BadChecksum {
        line: usize,
        computed: u8,
        expected: u8,
    },
    /// The input ended in the middle of a record or before its line
    /// terminator.
    UnexpectedEnd { line: usize },
    /// An addressing record whose payload is not the two bytes it must carry.
    BadLength { record_type: u8, length: u8 },
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingColon => f.write_str("record does not start with ':'"),
            Error::TrailingCharacters => f.write_str("unexpected characters after checksum"),
            Error::InvalidDigit { line, digit } => {
                write!(f, "line {}: invalid hex digit {:?}", line, digit)
            }
            Error::BadChecksum {
                line,
                computed,
                expected,
            } => write!(
                f,
                "line {}: checksum mismatch, computed {:#04x} but record holds {:#04x}",
                line, computed, expected
            ),
            Error::UnexpectedEnd { line } => write!(f, "line {}: unexpected end of input", line),
            Error::BadLength {
                record_type,
                length,
            } => write!(
                f,
                "record type {:#04x} needs a 2 byte payload, found {}",
                record_type, length
            ),
            #[cfg(feature = "std")]
            Error::Io(kind) => write!(f, "read failed: {:?}", kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, .. } => {
                Error::InvalidDigit { line: 0, digit: c }
            }
            _ => Error::UnexpectedEnd { line: 0 },
        }
    }
}

impl Error {
    /// Attaches the line number to variants that carry one.
    pub(crate) fn at_line(self, at: usize) -> Self {
        match self {
            Error::InvalidDigit { digit, .. } => Error::InvalidDigit { line: at, digit },
            Error::BadChecksum {
                computed, expected, ..
            } => Error::BadChecksum {
                line: at,
                computed,
                expected,
            },
            Error::UnexpectedEnd { .. } => Error::UnexpectedEnd { line: at },
            other => other,
        }
    }
}
