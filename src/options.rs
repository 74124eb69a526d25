/// Where an Extended Linear Address record keeps the upper 16 address bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinearBase {
    /// The two payload bytes, big-endian. This is how the record type is
    /// defined and what common toolchains emit.
    #[default]
    Payload,
    /// The record's own address field with its bytes swapped. Some older
    /// loaders read the base from here; use it only for images produced
    /// for them.
    AddressField,
}

/// Knobs for the section assembler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub linear_base: LinearBase,
    /// Forward jumps larger than this start a new section instead of being
    /// zero-filled. `None` bridges every forward jump.
    pub max_gap: Option<u32>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linear_base(mut self, linear_base: LinearBase) -> Self {
        self.linear_base = linear_base;
        self
    }

    pub fn max_gap(mut self, max_gap: u32) -> Self {
        self.max_gap = Some(max_gap);
        self
    }

    pub(crate) fn bridges(&self, gap: u32) -> bool {
        self.max_gap.map_or(true, |max| gap <= max)
    }
}
