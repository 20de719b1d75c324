//! On-the-wire encoding: header, chunk table, payload — all little-endian.

use crate::chunk::Chunk;
use crate::engine::{validate_chunks, DiffResult};
use crate::error::DiffError;
use crate::header::{Header, WIRE_VERSION};

fn read_u32(bytes: &[u8], offset: usize, field: &'static str) -> Result<u32, DiffError> {
    let slice = bytes
        .get(offset..offset + 4)
        .ok_or(DiffError::Truncated {
            field,
            need: offset + 4,
            have: bytes.len(),
        })?;
    Ok(u32::from_le_bytes(slice.try_into().unwrap()))
}

fn read_u64(bytes: &[u8], offset: usize, field: &'static str) -> Result<u64, DiffError> {
    let slice = bytes
        .get(offset..offset + 8)
        .ok_or(DiffError::Truncated {
            field,
            need: offset + 8,
            have: bytes.len(),
        })?;
    Ok(u64::from_le_bytes(slice.try_into().unwrap()))
}

impl DiffResult {
    /// Serializes this diff into the wire format of spec §6: header,
    /// then the chunk table, then the concatenated payload.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            Header::ENCODED_LEN + self.chunks.len() * Chunk::ENCODED_LEN + self.payload.len(),
        );
        out.extend_from_slice(&self.header.to_bytes());
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.to_bytes());
        }
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parses a diff previously produced by [`Self::to_bytes`].
    ///
    /// Validates every chunk against the header before returning, so a
    /// caller can rely on a successfully parsed `DiffResult` being safe
    /// to pass to [`crate::patch`] without a separate validation pass.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DiffError> {
        let version = read_u32(bytes, 0, "version")?;
        if version != WIRE_VERSION {
            return Err(DiffError::UnsupportedVersion(version));
        }
        let page_size = read_u32(bytes, 4, "page_size")?;
        let flags = read_u32(bytes, 8, "flags")?;
        let chunk_count = read_u32(bytes, 12, "chunk_count")?;
        let target_length = read_u64(bytes, 16, "target_length")?;

        let header = Header {
            version,
            page_size,
            flags,
            chunk_count,
            target_length,
        };

        let mut offset = Header::ENCODED_LEN;
        let mut chunks = Vec::with_capacity(chunk_count as usize);
        for _ in 0..chunk_count {
            let page_index = read_u64(bytes, offset, "chunk.page_index")?;
            let length = read_u64(bytes, offset + 8, "chunk.length")?;
            let data_offset = read_u64(bytes, offset + 16, "chunk.data_offset")?;
            chunks.push(Chunk {
                page_index,
                length,
                data_offset,
            });
            offset += Chunk::ENCODED_LEN;
        }

        let payload = bytes[offset..].to_vec();
        validate_chunks(&header, &chunks, payload.len())?;

        Ok(Self {
            header,
            chunks,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::diff_checked;

    #[test]
    fn wire_round_trip_preserves_the_diff() {
        let base = vec![0u8; 512];
        let mut target = base.clone();
        target[100..140].fill(0x5A);
        let result = diff_checked(&base, &target, 64).unwrap();
        let bytes = result.to_bytes();
        let parsed = DiffResult::from_bytes(&bytes).unwrap();
        assert_eq!(result, parsed);
    }

    #[test]
    fn from_bytes_rejects_truncated_header() {
        assert!(DiffResult::from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn from_bytes_rejects_unsupported_version() {
        let mut bytes = vec![0u8; Header::ENCODED_LEN];
        bytes[0..4].copy_from_slice(&99u32.to_le_bytes());
        assert_eq!(DiffResult::from_bytes(&bytes), Err(DiffError::UnsupportedVersion(99)));
    }
}
