use crate::decoder::{Decoder, Source, Stop};
use crate::file::{File, Termination};
use crate::observer::Observer;
use crate::options::{LinearBase, Options};
use crate::record::Record;
use crate::types;
use crate::Error;

/// What the caller should do after a record has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    EndOfFile,
}

/// Folds decoded records into the sections of a `File`.
///
/// Tracks the base address set by addressing records and the address the
/// next data byte must land on to extend the current section.
pub struct Assembler<'o> {
    options: Options,
    file: File,
    base_addr: u32,
    addr_expected: u32,
    /// The current section ends at the top of the 32-bit address space.
    at_top: bool,
    observer: Option<&'o mut dyn Observer>,
}

impl<'o> Assembler<'o> {
    pub fn new(options: Options) -> Self {
        Assembler {
            options,
            file: File::new(),
            base_addr: 0,
            addr_expected: 0,
            at_top: false,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: &'o mut dyn Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn base_address(&self) -> u32 {
        self.base_addr
    }

    pub fn expected_address(&self) -> u32 {
        self.addr_expected
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    /// Hands over the sections built so far, complete or not.
    pub fn into_file(self) -> File {
        self.file
    }

    /// Applies every record the decoder yields until an End Of File record,
    /// the end of the records or the first error.
    pub fn run<S: Source>(&mut self, decoder: &mut Decoder<S>) -> Result<Termination, Error> {
        while let Some(record) = decoder.next() {
            let record = record?;

            if let Some(observer) = self.observer.as_mut() {
                observer.record(decoder.line(), &record);
            }

            if self.push(&record)? == Flow::EndOfFile {
                log::debug!("end of file record on line {}", decoder.line());
                return Ok(Termination::EndOfFile);
            }
        }

        let termination = match decoder.stop() {
            Some(Stop::MissingMark(byte)) => Termination::MissingMark(byte),
            _ => Termination::EndOfInput,
        };
        log::debug!("no more records after line {}: {:?}", decoder.line(), termination);

        Ok(termination)
    }

    pub fn push(&mut self, record: &Record) -> Result<Flow, Error> {
        match record.record_type() {
            types::DATA => self.data(record),
            types::END_OF_FILE => return Ok(Flow::EndOfFile),
            types::EXTENDED_SEGMENT_ADDRESS => {
                let segment = record.payload_u16()?;
                self.set_base(u32::from(segment) << 4);
            }
            types::EXTENDED_LINEAR_ADDRESS => {
                let upper = match self.options.linear_base {
                    LinearBase::Payload => record.payload_u16()?,
                    LinearBase::AddressField => record.offset().swap_bytes(),
                };
                let base = u32::from(upper) << 16;

                self.set_base(base);
                if base != self.addr_expected {
                    self.open_section(base);
                }
                self.addr_expected = base;
            }
            other => log::trace!("ignoring record type {:#04x}", other),
        }

        Ok(Flow::Continue)
    }

    fn data(&mut self, record: &Record) {
        let address = self.base_addr.wrapping_add(u32::from(record.offset()));
        let gap = address.wrapping_sub(self.addr_expected);

        if self.file.is_empty()
            || self.at_top
            || address < self.addr_expected
            || !self.options.bridges(gap)
        {
            self.open_section(address);
        } else if gap > 0 {
            log::debug!("bridging {} byte gap at {:#010x}", gap, self.addr_expected);
            if let Some(observer) = self.observer.as_mut() {
                observer.gap(self.addr_expected, gap);
            }
            if let Some(section) = self.file.current_mut() {
                section.skip(gap as usize);
            }
        }

        if let Some(section) = self.file.current_mut() {
            section.append(record.payload());
        }

        match address.checked_add(u32::from(record.length())) {
            Some(end) => self.addr_expected = end,
            None => {
                log::debug!("section reached the end of the address space");
                self.addr_expected = address.wrapping_add(u32::from(record.length()));
                self.at_top = true;
            }
        }
    }

    fn set_base(&mut self, base: u32) {
        log::debug!("base address {:#010x}", base);
        self.base_addr = base;

        if let Some(observer) = self.observer.as_mut() {
            observer.base_address(base);
        }
    }

    fn open_section(&mut self, address: u32) {
        log::debug!("new section at {:#010x}", address);
        self.file.open_section(address);
        self.addr_expected = address;
        self.at_top = false;

        if let Some(observer) = self.observer.as_mut() {
            observer.section_created(address);
        }
    }
}
