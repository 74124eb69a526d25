use crate::section::Section;
use alloc::vec::Vec;
use core::slice;

/// The decoded image: sections in the order they were created.
///
/// Sections are never merged or sorted, two of them may well end up
/// address-contiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub(crate) sections: Vec<Section>,
}

impl File {
    pub fn new() -> Self {
        File {
            sections: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub(crate) fn open_section(&mut self, address: u32) -> &mut Section {
        self.sections.push(Section::new(address));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Section> {
        self.sections.last_mut()
    }
}

impl IntoIterator for File {
    type Item = Section;
    type IntoIter = alloc::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl<'a> IntoIterator for &'a File {
    type Item = &'a Section;
    type IntoIter = slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

/// How a successful parse came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// An End Of File record was read.
    EndOfFile,
    /// The input ran out at a record boundary.
    EndOfInput,
    /// A record boundary held this byte instead of `:`.
    MissingMark(u8),
}
