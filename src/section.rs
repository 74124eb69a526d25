use alloc::vec::Vec;

const MIN_CAPACITY: usize = 16;

/// A contiguous run of reconstructed bytes starting at `address`.
///
/// The backing buffer is always fully initialised: `buffer.len()` is the
/// capacity, `len` is how much of it has been written. Everything past
/// `len` is zero, so skipping over a gap leaves zeros behind.
#[derive(Clone, PartialEq, Eq)]
pub struct Section {
    address: u32,
    len: usize,
    buffer: Vec<u8>,
}

impl Section {
    pub fn new(address: u32) -> Self {
        Section {
            address,
            len: 0,
            buffer: Vec::new(),
        }
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Address one past the last written byte.
    pub fn end_address(&self) -> u32 {
        self.address.wrapping_add(self.len as u32)
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Makes room for `additional` more bytes. Capacity starts at 16 and
    /// doubles; new capacity is zero-filled.
    pub fn reserve(&mut self, additional: usize) {
        let needed = self.len + additional;
        let mut capacity = self.buffer.len();

        if capacity >= needed {
            return;
        }

        if capacity == 0 {
            capacity = MIN_CAPACITY;
        }
        while capacity < needed {
            capacity *= 2;
        }

        self.buffer.resize(capacity, 0);
    }

    /// Advances the logical length over `gap` zero bytes.
    pub fn skip(&mut self, gap: usize) {
        self.reserve(gap);
        self.len += gap;
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.buffer[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    /// Consumes the section, returning exactly the written bytes.
    pub fn into_data(mut self) -> Vec<u8> {
        self.buffer.truncate(self.len);
        self.buffer
    }
}

impl core::fmt::Debug for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Section")
            .field("address", &format_args!("{:#010x}", self.address))
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tail_is_zero(section: &Section) {
        assert!(section.len() <= section.capacity());
        assert!(section.buffer[section.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn first_growth_is_sixteen_bytes() {
        let mut section = Section::new(0x100);
        assert_eq!(section.capacity(), 0);

        section.append(&[0xAA]);

        assert_eq!(section.capacity(), 16);
        assert_eq!(section.data(), &[0xAA]);
        assert_tail_is_zero(&section);
    }

    #[test]
    fn capacity_doubles_until_it_fits() {
        let mut section = Section::new(0);

        section.append(&[1; 16]);
        assert_eq!(section.capacity(), 16);

        section.append(&[2; 1]);
        assert_eq!(section.capacity(), 32);

        section.append(&[3; 100]);
        assert_eq!(section.capacity(), 128);
        assert_eq!(section.len(), 117);
        assert_tail_is_zero(&section);
    }

    #[test]
    fn large_first_write_starts_from_sixteen() {
        let mut section = Section::new(0);

        section.append(&[0x11; 40]);

        assert_eq!(section.capacity(), 64);
    }

    #[test]
    fn appending_record_by_record_keeps_the_tail_zeroed() {
        let mut section = Section::new(0);

        for length in 0..40u8 {
            let payload: Vec<u8> = (0..length).map(|b| b | 0x80).collect();
            section.append(&payload);
            assert_tail_is_zero(&section);
        }

        assert_eq!(section.len(), (0..40).sum::<usize>());
    }

    #[test]
    fn skipped_gap_reads_as_zero() {
        let mut section = Section::new(0);

        section.append(&[0xFF; 4]);
        section.skip(4);
        section.append(&[0xEE; 4]);

        assert_eq!(section.len(), 12);
        assert_eq!(&section.data()[4..8], &[0; 4]);
        assert_eq!(&section.data()[8..], &[0xEE; 4]);
        assert_tail_is_zero(&section);
    }

    #[test]
    fn end_address_follows_the_data() {
        let mut section = Section::new(0x0800_0000);
        section.append(&[0; 10]);

        assert_eq!(section.end_address(), 0x0800_000A);
    }

    #[test]
    fn into_data_drops_spare_capacity() {
        let mut section = Section::new(0);
        section.append(&[1, 2, 3]);

        assert_eq!(section.into_data(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_append_does_not_allocate() {
        let mut section = Section::new(0);
        section.append(&[]);

        assert_eq!(section.capacity(), 0);
        assert!(section.is_empty());
    }
}
