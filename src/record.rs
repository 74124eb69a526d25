use crate::checksum::sum;
use crate::decoder::Decoder;
use crate::Error;
use core::fmt;
use core::str::FromStr;

/// One decoded line: `:LLAAAATT<payload>CC`.
///
/// The payload is stored inline so that decoding never allocates.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    length: u8,
    offset: u16,
    record_type: u8,
    bytes: [u8; 0xFF],
    checksum: u8,
}

impl Record {
    pub(crate) fn new(offset: u16, record_type: u8, payload: &[u8], checksum: u8) -> Self {
        let mut bytes = [0; 0xFF];
        bytes[..payload.len()].copy_from_slice(payload);

        Record {
            length: payload.len() as u8,
            offset,
            record_type,
            bytes,
            checksum,
        }
    }

    /// Number of payload bytes.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// The 16-bit address field.
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[..self.length as usize]
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// True when every byte of the record, checksum included, sums to zero
    /// modulo 256.
    pub fn is_valid(&self) -> bool {
        let [high, low] = self.offset.to_be_bytes();
        let header = sum(&[self.length, high, low, self.record_type]);

        header
            .wrapping_add(sum(self.payload()))
            .wrapping_add(self.checksum)
            == 0
    }

    /// The payload read as a big-endian `u16`, for the addressing records
    /// that carry exactly two bytes.
    pub(crate) fn payload_u16(&self) -> Result<u16, Error> {
        match *self.payload() {
            [high, low] => Ok(u16::from_be_bytes([high, low])),
            _ => Err(Error::BadLength {
                record_type: self.record_type,
                length: self.length,
            }),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("length", &self.length)
            .field("offset", &format_args!("{:#06x}", self.offset))
            .field("record_type", &self.record_type)
            .field("payload", &self.payload())
            .field("checksum", &format_args!("{:#04x}", self.checksum))
            .finish()
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.as_bytes();

        let record = match Decoder::new(&mut rest).next() {
            Some(record) => record?,
            None => return Err(Error::MissingColon),
        };

        match rest {
            b"" | b"\n" | b"\r\n" => Ok(record),
            _ => Err(Error::TrailingCharacters),
        }
    }
}
