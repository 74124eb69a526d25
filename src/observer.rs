use crate::record::Record;

#[cfg(test)]
use mockall::automock;

/// Hook for watching the assembler at work. Every method defaults to doing
/// nothing; attach one through `Assembler::with_observer` or
/// `Parser::observer`.
#[cfg_attr(test, automock)]
pub trait Observer {
    /// A record passed its checksum and is about to be applied.
    fn record(&mut self, _line: usize, _record: &Record) {}

    /// An addressing record changed the base address.
    fn base_address(&mut self, _base: u32) {}

    fn section_created(&mut self, _address: u32) {}

    /// `length` zero bytes were inserted at `address` to bridge a jump.
    fn gap(&mut self, _address: u32, _length: u32) {}
}
