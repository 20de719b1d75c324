//! A single changed-page descriptor.

/// One changed page: `page_index` in units of the header's `page_size`,
/// `length` the number of bytes of this page carried in the payload
/// (equal to `page_size` except possibly at the final page), and
/// `data_offset` the byte offset into the payload where they start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub page_index: u64,
    pub length: u64,
    pub data_offset: u64,
}

impl Chunk {
    pub(crate) const ENCODED_LEN: usize = 8 + 8 + 8;

    pub(crate) fn to_bytes(self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..8].copy_from_slice(&self.page_index.to_le_bytes());
        out[8..16].copy_from_slice(&self.length.to_le_bytes());
        out[16..24].copy_from_slice(&self.data_offset.to_le_bytes());
        out
    }
}
