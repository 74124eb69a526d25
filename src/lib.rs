//! Intel Hex decoding into contiguous memory sections.
//!
//! Records are read one line at a time by a [`Decoder`], checked against
//! their checksum and folded by an [`Assembler`] into the sections of a
//! [`File`]: each section is a run of bytes with a 32-bit start address.
//! Forward jumps inside a section are zero-filled; backward jumps and
//! Extended Linear Address records that move away from the current end
//! start a new section.
//!
//! ```no_run
//! let (file, result) = ihex_sections::parse("firmware.hex");
//! result?;
//!
//! for section in &file {
//!     println!("{:#010x}: {} bytes", section.address(), section.len());
//! }
//! ihex_sections::release(file);
//! # Ok::<(), ihex_sections::ParseError>(())
//! ```
//!
//! Without the `std` feature only the record decoder is available; `alloc`
//! adds section assembly.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod checksum;
mod decoder;
mod error;
mod record;
pub mod types;

#[cfg(feature = "alloc")]
mod assembler;
#[cfg(feature = "alloc")]
mod file;
#[cfg(feature = "alloc")]
mod observer;
#[cfg(feature = "alloc")]
mod options;
#[cfg(feature = "alloc")]
mod parser;
#[cfg(feature = "alloc")]
mod section;

pub use decoder::{Decoder, Source, Stop};
pub use error::Error;
pub use record::Record;

#[cfg(feature = "std")]
pub use decoder::ReadSource;

#[cfg(feature = "alloc")]
pub use assembler::{Assembler, Flow};
#[cfg(feature = "alloc")]
pub use file::{File, Termination};
#[cfg(feature = "alloc")]
pub use observer::Observer;
#[cfg(feature = "alloc")]
pub use options::{LinearBase, Options};
#[cfg(feature = "alloc")]
pub use parser::Parser;
#[cfg(feature = "alloc")]
pub use section::Section;

#[cfg(feature = "std")]
pub use parser::ParseError;

/// Parses the Intel Hex file at `path` with default options.
///
/// The returned `File` holds whatever was assembled, also when the result is
/// an error.
#[cfg(feature = "std")]
pub fn parse<P: AsRef<std::path::Path>>(path: P) -> (File, Result<Termination, ParseError>) {
    Parser::new().parse(path)
}

/// Releases every section buffer of `file`.
#[cfg(feature = "alloc")]
pub fn release(file: File) {
    log::trace!("releasing {} section(s)", file.len());
    drop(file);
}
