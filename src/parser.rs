use crate::assembler::Assembler;
use crate::decoder::{Decoder, Source};
use crate::file::{File, Termination};
use crate::observer::Observer;
use crate::options::Options;
use crate::Error;

#[cfg(feature = "std")]
use crate::decoder::ReadSource;
#[cfg(feature = "std")]
use std::{fmt, fs, io, path::Path};

/// Failure of a path based parse.
#[cfg(feature = "std")]
#[derive(Debug)]
pub enum ParseError {
    /// The input could not be opened for reading.
    Open(io::Error),
    /// No destination `File` was supplied.
    NullDestination,
    Record(Error),
}

#[cfg(feature = "std")]
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Open(err) => write!(f, "cannot open input: {}", err),
            ParseError::NullDestination => f.write_str("no destination file supplied"),
            ParseError::Record(err) => write!(f, "decode failure: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Open(err) => Some(err),
            ParseError::NullDestination => None,
            ParseError::Record(err) => Some(err),
        }
    }
}

#[cfg(feature = "std")]
impl From<Error> for ParseError {
    fn from(err: Error) -> Self {
        ParseError::Record(err)
    }
}

/// Decodes a whole Intel Hex input into a fresh `File`.
///
/// Every parse call builds a new `File`; on failure the sections assembled
/// before the bad record are still handed back.
#[derive(Default)]
pub struct Parser<'o> {
    options: Options,
    observer: Option<&'o mut dyn Observer>,
}

impl<'o> Parser<'o> {
    pub fn new() -> Self {
        Parser {
            options: Options::default(),
            observer: None,
        }
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn observer(mut self, observer: &'o mut dyn Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn parse_bytes(&mut self, input: &[u8]) -> (File, Result<Termination, Error>) {
        self.assemble(input)
    }

    #[cfg(feature = "std")]
    pub fn parse<P: AsRef<Path>>(&mut self, path: P) -> (File, Result<Termination, ParseError>) {
        let mut file = File::new();
        let result = self.parse_into(path, Some(&mut file));

        (file, result)
    }

    /// Parses `path` into `dest`, replacing whatever it held. `dest` receives
    /// the partial result when a record fails to decode.
    #[cfg(feature = "std")]
    pub fn parse_into<P: AsRef<Path>>(
        &mut self,
        path: P,
        dest: Option<&mut File>,
    ) -> Result<Termination, ParseError> {
        let dest = dest.ok_or(ParseError::NullDestination)?;
        let path = path.as_ref();

        // closed on every return path when `input` drops
        let input = fs::File::open(path).map_err(ParseError::Open)?;
        log::debug!("parsing {}", path.display());

        let (file, result) = self.assemble(ReadSource::new(io::BufReader::new(input)));
        *dest = file;

        let termination = result?;
        log::debug!(
            "{}: {} section(s), {:?}",
            path.display(),
            dest.len(),
            termination
        );

        Ok(termination)
    }

    fn assemble<S: Source>(&mut self, source: S) -> (File, Result<Termination, Error>) {
        let mut decoder = Decoder::new(source);
        let mut assembler = Assembler::new(self.options.clone());

        if let Some(observer) = self.observer.as_deref_mut() {
            assembler = assembler.with_observer(observer);
        }

        let result = assembler.run(&mut decoder);
        if let Err(err) = &result {
            log::debug!("stopped at line {}: {}", decoder.line(), err);
        }

        (assembler.into_file(), result)
    }
}
